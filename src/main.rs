pub mod aggregate;
pub mod config;
pub mod fetch;
pub mod server;
pub mod types;

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use crate::types::Dataset;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute hotspots for one dataset and emit them as GeoJSON
    Compute {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
        /// Which geometry source to aggregate
        #[arg(short, long, value_enum)]
        dataset: Dataset,
        /// Write the feature collection here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Serve hotspots over an HTTP API
    Serve {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Compute {
            config,
            dataset,
            output,
        } => {
            let app_config = config::AppConfig::load_from_file(config)?;

            let client = reqwest::Client::new();
            let hotspots = aggregate::compute_hotspots(&client, &app_config, *dataset).await;
            println!("Derived {} hotspots for dataset '{}'", hotspots.len(), dataset);

            let collection = aggregate::to_feature_collection(&hotspots);
            let json = serde_json::to_string_pretty(&collection)?;

            match output {
                Some(path) => {
                    fs::write(path, json)?;
                    println!("Wrote feature collection to {:?}", path);
                }
                None => println!("{}", json),
            }
        }
        Commands::Serve { config } => {
            let app_config = config::AppConfig::load_from_file(config)?;
            server::start_server(app_config).await?;
        }
    }

    Ok(())
}
