//! response-reader
//!
//! Fetch an HTTP resource and print it as a typed response.
//!
//! ```text
//! response-reader [--config reader.toml] fetch <URL> [--as json|text|bytes|none]
//! response-reader [--config reader.toml] config
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};

use response_reader::config::{load_config, ReaderConfig};
use response_reader::observability::logging::init_logging;
use response_reader::{Client, DecoderRegistry, EntityType, ResponseDecoder, TypedResponse};

#[derive(Parser)]
#[command(name = "response-reader")]
#[command(about = "Fetch an HTTP resource and decode its entity", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a URL (absolute or relative to the configured endpoint)
    Fetch {
        url: String,

        /// Entity type to decode the body as
        #[arg(long = "as", value_enum, default_value_t = EntityKind::Json)]
        kind: EntityKind,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum EntityKind {
    Json,
    Text,
    Bytes,
    None,
}

impl EntityKind {
    fn entity_type(self) -> Option<EntityType> {
        match self {
            EntityKind::Json => Some(EntityType::of::<serde_json::Value>()),
            EntityKind::Text => Some(EntityType::of::<String>()),
            EntityKind::Bytes => Some(EntityType::of::<Vec<u8>>()),
            EntityKind::None => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ReaderConfig::default(),
    };

    init_logging(&config.observability)?;
    tracing::debug!(endpoint = %config.client.endpoint, "Configuration loaded");

    match cli.command {
        Commands::Fetch { url, kind } => {
            let registry = Arc::new(DecoderRegistry::from_config(&config.decoding));
            let client = Client::new(&config.client, registry.clone())?;
            let decoder = ResponseDecoder::new(registry).with_settings(config.decoding.clone());

            let raw = client.fetch(&url).await?;
            let response = decoder.decode_as(raw, kind.entity_type().as_ref())?;
            print_response(&response)?;
        }
        Commands::Config => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn print_response(response: &TypedResponse) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", response.status());
    for (name, value) in response.headers().pairs() {
        println!("{}: {}", name, value);
    }
    println!();

    if let Some(json) = response.entity_as::<serde_json::Value>() {
        println!("{}", serde_json::to_string_pretty(json)?);
    } else if let Some(text) = response.entity_as::<String>() {
        println!("{}", text);
    } else if let Some(bytes) = response.entity_as::<Vec<u8>>() {
        println!("<{} bytes>", bytes.len());
    }
    Ok(())
}
