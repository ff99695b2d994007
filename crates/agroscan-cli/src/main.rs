mod diagnose;
mod enrich;

use std::path::PathBuf;

use agroscan_core::{GeoPoint, Language};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "agroscan")]
#[command(about = "Crop disease diagnosis and verified dealer lookup")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Diagnose a leaf image and list dealers stocking the recommended product
    Diagnose {
        /// Path to the leaf photo (jpg, png, webp, heic)
        image: PathBuf,
        #[command(flatten)]
        location: LocationArgs,
        /// Display language: ENG, HIN or MAR
        #[arg(long, default_value = "ENG")]
        language: Language,
    },
    /// Verify and rank a dealer list read from a JSON file
    Enrich {
        /// JSON array of dealer records, or `{"dealers": [...]}`
        #[arg(long)]
        dealers: PathBuf,
        #[command(flatten)]
        location: LocationArgs,
        /// Print enriched dealers as JSON instead of cards
        #[arg(long)]
        json: bool,
    },
    /// Print the loaded configuration with secrets redacted
    Config,
}

/// The user's position, when known.
#[derive(Debug, Clone, Copy, Default, Args)]
struct LocationArgs {
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    lat: Option<f64>,
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lng: Option<f64>,
}

impl LocationArgs {
    fn position(self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.lat?, self.lng?))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Help and usage errors must not depend on a valid environment.
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = agroscan_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Diagnose {
            image,
            location,
            language,
        }) => diagnose::run_diagnose(&config, &image, location.position(), language).await?,
        Some(Commands::Enrich {
            dealers,
            location,
            json,
        }) => enrich::run_enrich(&config, &dealers, location.position(), json).await?,
        Some(Commands::Config) => println!("{config:#?}"),
        None => println!("agroscan: run `agroscan --help` for commands"),
    }

    Ok(())
}
