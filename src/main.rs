//! CLI interface for the book recommender

use anyhow::Result;
use book_recommender::{train_engine, AppConfig, Recommendation};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "book-recommender")]
#[command(about = "A collaborative filtering book recommender", long_about = None)]
struct Cli {
    /// Directory holding the trained artifacts. Overrides BOOKREC_ARTIFACTS_DIR.
    #[arg(long)]
    artifacts_dir: Option<PathBuf>,

    /// Directory holding Books.csv and Ratings.csv. Overrides BOOKREC_RAW_DATA_DIR.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the training pipeline and write fresh artifacts
    Train,
    /// Show books similar to a title
    Recommend {
        /// Book title, or a fragment of one
        title: String,
    },
    /// List the known book titles
    Books,
    /// Start the web page and HTTP API
    Serve {
        /// Address to bind to. Overrides BOOKREC_BIND_ADDR.
        #[arg(long)]
        addr: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(dir) = cli.artifacts_dir {
        config = config.with_artifacts_dir(dir);
    }
    if let Some(dir) = cli.data_dir {
        config.raw_data_dir = dir;
    }

    match cli.command {
        Commands::Serve { addr } => {
            if let Some(addr) = addr {
                config.bind_addr = addr;
            }
            book_recommender::server::start(config).await?;
        }
        Commands::Train => {
            let summary = tokio::task::spawn_blocking(move || train_engine(&config)).await??;
            println!(
                "Training Completed! {} books, {} users, {} ratings",
                summary.books, summary.users, summary.ratings
            );
        }
        Commands::Recommend { title } => {
            let service = Recommendation::new(&config)?;
            let recs = service.recommend(&title)?;

            if recs.displayed().is_empty() {
                println!("No recommendations for {}", title);
            } else {
                println!("Books similar to {}:", recs.titles()[0]);
                for (i, book) in recs.displayed().iter().enumerate() {
                    println!(
                        "{}. {} (distance: {:.4}) {}",
                        i + 1,
                        book.title,
                        book.distance,
                        book.poster_url.as_deref().unwrap_or("-")
                    );
                }
            }
        }
        Commands::Books => {
            let names = Recommendation::new(&config)?.book_names()?;
            if names.is_empty() {
                println!("No books in the catalogue");
            } else {
                println!("Books ({} total):", names.len());
                for name in names {
                    println!("  - {}", name);
                }
            }
        }
    }
    Ok(())
}
