//! Mediasave CLI: save a local file into the configured media store.
//!
//! Storage is configured through MEDIASAVE_* environment variables (or a
//! `.env` file). The save response is printed as JSON.

use anyhow::Context;
use clap::{Parser, Subcommand};
use mediasave_bridge::{SaveRequest, SaverRegistry};
use mediasave_cli::{init_tracing, split_file_name};
use mediasave_core::Config;
use mediasave_engine::FileSaver;
use serde::Serialize;
use tokio::runtime::Handle;

#[derive(Parser)]
#[command(name = "mediasave", about = "Save files into public media collections")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a file (image, video, audio, or anything else)
    Save {
        /// Path to the file to save
        file: std::path::PathBuf,
        /// Base name to save under (defaults to the file stem)
        #[arg(long)]
        name: Option<String>,
        /// Extension hint (defaults to the file extension)
        #[arg(long)]
        ext: Option<String>,
        /// Mime type hint
        #[arg(long)]
        mime: Option<String>,
        /// Sub-collection inside the category's collection
        #[arg(long)]
        album: Option<String>,
        /// Conflict mode: 0 auto-rename, 1 overwrite, 2 fail, 3 skip (others auto-rename)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        conflict: i32,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Save {
            file,
            name,
            ext,
            mime,
            album,
            conflict,
        } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let (stem, file_ext) = split_file_name(&file);

            let mut request = SaveRequest::new(
                bytes,
                name.unwrap_or(stem),
                ext.unwrap_or(file_ext),
                mime.unwrap_or_default(),
            )
            .with_conflict_mode(conflict);
            if let Some(album) = album {
                request = request.with_sub_collection(album);
            }

            let saver = FileSaver::from_config(&config)
                .await
                .context("Failed to initialize storage")?;
            let registry = SaverRegistry::new(Handle::current());
            let id = registry.init(saver);

            let response = registry.save_bytes(id, request).await;
            registry.dispose(id);

            print_json(&response)?;
            if !response.success {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
