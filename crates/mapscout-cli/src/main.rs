use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod scrape;

#[derive(Debug, Parser)]
#[command(name = "mapscout")]
#[command(about = "Extract business listings from map-search result pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape business records for one or more search queries
    Scrape {
        /// Search query; repeat the flag to run several queries in one session
        #[arg(short, long, required = true)]
        search: Vec<String>,

        /// Stop after this many listings per query (unbounded when omitted)
        #[arg(short, long)]
        total: Option<usize>,

        /// Run the browser with a visible window
        #[arg(long)]
        headful: bool,

        /// Directory for CSV artifacts (overrides MAPSCOUT_OUTPUT_DIR)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Concurrent detail extractions (overrides MAPSCOUT_MAX_CONCURRENT_LISTINGS)
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Re-merge previously written per-run artifacts for a query
    Merge {
        /// Search query whose artifacts should be merged
        #[arg(short, long)]
        search: String,

        /// Directory holding the artifacts (overrides MAPSCOUT_OUTPUT_DIR)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = mapscout_core::load_app_config()?;
    init_tracing(&config.log_level);

    let cli = Cli::parse();
    match cli.command {
        Commands::Scrape {
            search,
            total,
            headful,
            output_dir,
            workers,
        } => {
            if headful {
                config.headless = false;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if let Some(workers) = workers {
                config.max_concurrent_listings = workers;
            }
            scrape::run(&config, &search, total).await
        }
        Commands::Merge { search, output_dir } => {
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            let timestamp = mapscout_export::run_timestamp(chrono::Local::now());
            match mapscout_export::merge_runs(&config.output_dir, &timestamp, &search)? {
                Some(path) => println!(
                    "merged artifacts for \"{search}\" into {}",
                    path.display()
                ),
                None => println!(
                    "no artifacts found for \"{search}\" in {}",
                    config.output_dir.display()
                ),
            }
            Ok(())
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
