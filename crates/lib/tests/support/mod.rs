//! Stub of the remote messages API for integration tests.
//!
//! Records every request it receives. With no canned reply, POST echoes the request body
//! and GET answers with an empty envelope.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    routing::any,
    Router,
};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: Method,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Clone)]
pub struct StubRemote {
    pub seen: Arc<Mutex<Vec<SeenRequest>>>,
    reply: Option<(StatusCode, String)>,
}

impl StubRemote {
    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().expect("stub lock").clone()
    }
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

async fn handle(
    State(stub): State<StubRemote>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let body = String::from_utf8_lossy(&body).to_string();
    stub.seen.lock().expect("stub lock").push(SeenRequest {
        method: method.clone(),
        authorization: header_str(&headers, header::AUTHORIZATION),
        content_type: header_str(&headers, header::CONTENT_TYPE),
        body: body.clone(),
    });
    match &stub.reply {
        Some((status, reply)) => (*status, reply.clone()),
        None if method == Method::POST => (StatusCode::OK, body),
        None => (StatusCode::OK, r#"{"Records":[]}"#.to_string()),
    }
}

/// Serve `router` on an ephemeral loopback port; returns the base url.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local_addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{}", addr)
}

/// Start a stub remote; returns the messages endpoint url and the stub handle.
pub async fn start_remote(reply: Option<(StatusCode, &str)>) -> (String, StubRemote) {
    let stub = StubRemote {
        seen: Arc::new(Mutex::new(Vec::new())),
        reply: reply.map(|(s, b)| (s, b.to_string())),
    };
    let router = Router::new()
        .route("/api/messages", any(handle))
        .with_state(stub.clone());
    let base = serve(router).await;
    (format!("{}/api/messages", base), stub)
}

/// A loopback url nothing is listening on.
pub fn closed_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    let port = listener.local_addr().expect("local_addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}/api/messages", port)
}
