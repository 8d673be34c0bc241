use clap::{Parser, Subcommand};
use logproxy::messages::{ClientMessage, MessageRelay};

#[derive(Parser)]
#[command(name = "logproxy")]
#[command(about = "LogProxy CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Write a template configuration file if none exists.
    Init {
        /// Config file path (default: LOGPROXY_CONFIG_PATH or ~/.logproxy/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Run the HTTP gateway that relays /api/messages to the remote messages API.
    Serve {
        /// Config file path (default: LOGPROXY_CONFIG_PATH or ~/.logproxy/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP port (default from config or 15152)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Fetch messages from the remote API and print them as JSON.
    Fetch {
        /// Config file path (default: LOGPROXY_CONFIG_PATH or ~/.logproxy/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Submit one message and print the remote API's response as JSON.
    Post {
        /// Config file path (default: LOGPROXY_CONFIG_PATH or ~/.logproxy/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// Message title (sent as the remote summary).
        #[arg(long)]
        title: Option<String>,

        /// Message body.
        #[arg(long)]
        text: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Version) => {
            println!("logproxy {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(Commands::Init { config }) => run_init(config),
        Some(Commands::Serve { config, port }) => run_serve(config, port).await,
        Some(Commands::Fetch { config }) => run_fetch(config).await,
        Some(Commands::Post {
            config,
            title,
            text,
        }) => run_post(config, title, text).await,
        None => {
            println!("Run with --help for usage");
            Ok(())
        }
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run_init(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(logproxy::config::default_config_path);
    if logproxy::config::init_config(&path)? {
        println!("wrote configuration template to {}", path.display());
    } else {
        println!("configuration already exists at {}", path.display());
    }
    Ok(())
}

async fn run_serve(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let (mut config, _) = logproxy::config::load_config(config_path)?;
    if let Some(p) = port {
        config.gateway.port = p;
    }
    log::info!("starting gateway on {}:{}", config.gateway.bind, config.gateway.port);
    logproxy::gateway::run_gateway(config).await
}

fn relay_from_config(config_path: Option<std::path::PathBuf>) -> anyhow::Result<MessageRelay> {
    let (config, _) = logproxy::config::load_config(config_path)?;
    let settings = logproxy::config::resolve_relay_settings(&config)?;
    Ok(MessageRelay::new(settings)?)
}

async fn run_fetch(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let relay = relay_from_config(config_path)?;
    let messages = relay.fetch_messages().await?;
    println!("{}", serde_json::to_string_pretty(&messages)?);
    Ok(())
}

async fn run_post(
    config_path: Option<std::path::PathBuf>,
    title: Option<String>,
    text: Option<String>,
) -> anyhow::Result<()> {
    let relay = relay_from_config(config_path)?;
    let message = ClientMessage {
        title,
        text,
        ..Default::default()
    };
    let stored = relay.submit_messages(&[message]).await?;
    println!("{}", serde_json::to_string_pretty(&stored)?);
    Ok(())
}
