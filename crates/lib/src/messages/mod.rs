//! Message relay: translation between the client-facing message shape and the remote
//! messages API, plus the HTTP client that forwards them.

mod mapping;
mod relay;
mod types;

pub use mapping::{enrich_outbound, envelope_from_client, envelope_to_client, to_client, to_remote};
pub use relay::{MessageRelay, RelayError, RelaySettings};
pub use types::{ClientMessage, RemoteEnvelope, RemoteFields, RemoteRecord};
