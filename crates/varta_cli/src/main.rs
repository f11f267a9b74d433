use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use varta_core::types::Language;
use varta_core::{Error, Result};
use varta_scrapers::{default_plan, HttpFetcher, ScrapeManager};
use varta_storage::MemoryStorage;
use varta_web::{create_app, AppState};

#[derive(Parser)]
#[command(name = "varta", about = "Bilingual news headline aggregator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1:8000")]
        addr: String,
    },
    /// Run the scrape chain once for a language and print the summary
    Scrape {
        /// "english" or "malayalam"
        language: String,
    },
    /// List the configured source plan
    Sources,
}

fn build_manager(store: Arc<MemoryStorage>) -> Result<Arc<ScrapeManager>> {
    let fetcher = Arc::new(HttpFetcher::new()?);
    Ok(Arc::new(ScrapeManager::new(store, fetcher, default_plan())))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let store = Arc::new(MemoryStorage::new());

    match cli.command {
        Commands::Serve { addr } => {
            let manager = build_manager(store.clone())?;
            let state = AppState::new(store.clone(), store.clone(), store, manager);
            let app = create_app(state);

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!(%addr, "listening");
            axum::serve(listener, app).await?;
        }
        Commands::Scrape { language } => {
            let language = Language::from_slug(&language)
                .ok_or_else(|| Error::Parse(format!("unknown language: {}", language)))?;
            let manager = build_manager(store)?;
            let today = chrono::Local::now().date_naive();

            match manager.ensure_fresh(language, today).await? {
                Some(summary) => println!(
                    "scraped {} sources: {} items, {} inserted, {} duplicates, {} failures",
                    summary.sources,
                    summary.items,
                    summary.inserted,
                    summary.duplicates,
                    summary.failures
                ),
                None => println!("records for {} already exist for {}", language.slug(), today),
            }
        }
        Commands::Sources => {
            for spec in default_plan() {
                let category = spec
                    .category
                    .map(|c| c.slug().to_string())
                    .unwrap_or_else(|| "inferred".to_string());
                println!(
                    "{:30} {:10} {:10} {}",
                    spec.name,
                    spec.language.slug(),
                    category,
                    spec.url
                );
            }
        }
    }

    Ok(())
}
