//! Converse MCP demo server entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tokio_util::sync::CancellationToken;

use converse_mcp::demo::demo_router;
use converse_mcp::logging::init_logging;
use converse_mcp::transport::{shutdown_signal, StreamTransport};

const SERVER_NAME: &str = "converse-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(
    name = "converse-mcp",
    about = "MCP demo server: prompts, resources and tools over stdio or HTTP",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve over stdin/stdout (default).
    Serve,

    /// Serve over HTTP (POST /mcp, GET /_health).
    #[cfg(feature = "http")]
    ServeHttp {
        /// Listen address (host:port). Falls back to CONVERSE_MCP_ADDR, then 127.0.0.1:8080.
        #[arg(long)]
        addr: Option<String>,

        /// Allow cross-origin requests from any origin.
        #[arg(long)]
        cors: bool,
    },

    /// Print server info, capabilities and registered entities as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   converse-mcp completions bash > ~/.local/share/bash-completion/completions/converse-mcp
    ///   converse-mcp completions zsh > ~/.zfunc/_converse-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let shutdown = CancellationToken::new();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let router = demo_router(SERVER_NAME, SERVER_VERSION)?;
            tracing::info!("{SERVER_NAME} v{SERVER_VERSION} on stdio");
            spawn_signal_handler(shutdown.clone());
            StreamTransport::new(router)
                .with_shutdown(shutdown)
                .run_stdio()
                .await?;
        }

        #[cfg(feature = "http")]
        Commands::ServeHttp { addr, cors } => {
            use converse_mcp::config::resolve_http_addr;
            use converse_mcp::transport::HttpTransport;

            let addr = resolve_http_addr(addr.as_deref())?;
            let router = demo_router(SERVER_NAME, SERVER_VERSION)?;
            tracing::info!("{SERVER_NAME} v{SERVER_VERSION} on http://{addr}/mcp");
            if cors {
                tracing::info!("CORS: any origin allowed");
            }
            spawn_signal_handler(shutdown.clone());
            HttpTransport::new(router)
                .with_shutdown(shutdown)
                .with_cors(cors)
                .run(addr)
                .await?;
        }

        Commands::Info => {
            let router = demo_router(SERVER_NAME, SERVER_VERSION)?;
            let info = serde_json::json!({
                "server": router.server_info(),
                "protocol_version": converse_mcp::types::MCP_VERSION,
                "capabilities": router.capabilities(),
                "prompts": router.prompts().map(|p| &p.name).collect::<Vec<_>>(),
                "resources": router.resources().map(|r| &r.uri).collect::<Vec<_>>(),
                "tools": router.tools().map(|t| &t.name).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "converse-mcp", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn spawn_signal_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.cancel();
    });
}
