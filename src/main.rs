use anyhow::{Context, Result};
use clap::Parser;
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing::info;

use placement_assistant::{
    chat, constants, web_server, HtmlListingScraper, ListingSelectors, OllamaResponder,
    QueryDispatcher, ResponseCatalog,
};

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Startup dependencies shared by every subcommand.
#[derive(clap::Args, Debug)]
struct BackendArgs {
    #[arg(long, default_value_t = constants::CATALOG_PATH.clone(), help = "JSON file of predefined query -> reply pairs.")]
    catalog: String,
    #[arg(long, default_value_t = constants::LISTINGS_URL.clone(), help = "Job board page scraped for internship listings.")]
    listings_url: String,
    #[arg(long, default_value_t = constants::OLLAMA_URL.clone(), help = "Base URL of the Ollama server.")]
    ollama_url: String,
    #[arg(long, default_value_t = constants::PLACEMENT_MODEL.clone(), help = "Model used for open-ended queries.")]
    model: String,
    #[arg(long, value_name = "SECS", help = "Timeout for outbound requests (none by default).")]
    request_timeout: Option<u64>,
}

// Define the available subcommands
#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the web server.
    Start {
        #[arg(long, default_value_t = constants::DEFAULT_PORT, help = "Port for the web server.")]
        port: u16,
        #[arg(long, default_value = "templates", help = "Directory holding index.html.")]
        templates: PathBuf,
        #[arg(long, default_value = "static", help = "Directory served under /static.")]
        static_dir: PathBuf,
        #[command(flatten)]
        backend: BackendArgs,
    },
    /// Ask the assistant questions from the terminal.
    ///
    /// One query per line. Type `exit` or `quit` (or send EOF) to leave; those
    /// words are answered instead when the catalog has an entry for them.
    Chat {
        #[command(flatten)]
        backend: BackendArgs,
    },
}

// Loads everything the dispatcher needs. Any failure here aborts startup.
fn build_dispatcher(args: &BackendArgs) -> Result<QueryDispatcher> {
    let timeout = args.request_timeout.map(Duration::from_secs);

    let catalog = ResponseCatalog::load(&args.catalog).context("Failed to load response catalog")?;
    let selectors = ListingSelectors::job_board().context("Invalid listing selectors")?;
    let scraper = HtmlListingScraper::new(args.listings_url.clone(), selectors, timeout)
        .context("Failed to build listings client")?;
    let responder = OllamaResponder::new(args.ollama_url.clone(), args.model.clone(), timeout)
        .context("Failed to build generation client")?;

    info!(
        listings_url = %scraper.url(),
        model = %responder.model(),
        ?timeout,
        "Dependencies initialized"
    );

    Ok(QueryDispatcher::new(
        Arc::new(catalog),
        Arc::new(scraper),
        Arc::new(responder),
    ))
}

// The main entry point of the application, using tokio's async runtime
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Reads log level from RUST_LOG (e.g., RUST_LOG=info,placement_assistant=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    info!("Placement assistant starting with command: {:?}", cli.command);

    match cli.command {
        Commands::Start {
            port,
            templates,
            static_dir,
            backend,
        } => {
            let dispatcher = build_dispatcher(&backend)?;
            info!("Starting web server on port {}...", port);
            web_server::start_web_server(
                web_server::ServerConfig {
                    port,
                    templates_dir: templates,
                    static_dir,
                },
                dispatcher,
            )
            .await?;
        }
        Commands::Chat { backend } => {
            let dispatcher = build_dispatcher(&backend)?;
            chat::run_interactive_chat(&dispatcher)
                .await
                .context("Chat session failed")?;
        }
    }

    Ok(())
}
