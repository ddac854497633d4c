//! TRACESCOPE CLI
//!
//! Loads a recorded trace and answers the same queries a trace viewer makes.

#![warn(missing_docs)]
#![warn(clippy::all)]

use clap::{Args, Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracescope_core::ContentHash;
use tracescope_index::{Renderer, TraceStorage};
use tracescope_replay::{LoaderConfig, TraceLoader};
use tracescope_storage::FsBlobStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tracescope")]
#[command(about = "TRACESCOPE - index and inspect recorded browser traces", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct TraceArgs {
    /// Trace prefix; logs are read from <PREFIX>-network.trace and <PREFIX>-dom.trace
    #[arg(short, long)]
    prefix: PathBuf,
    /// Directory of hash-named resource bodies
    #[arg(short, long, default_value = "resources")]
    blobs: PathBuf,
    /// Suffix of the network log
    #[arg(long, default_value = "-network.trace")]
    network_suffix: String,
    /// Suffix of the DOM log
    #[arg(long, default_value = "-dom.trace")]
    dom_suffix: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List resources in capture order
    Resources {
        #[command(flatten)]
        trace: TraceArgs,
    },
    /// Show a named snapshot of a page or frame
    Snapshot {
        #[command(flatten)]
        trace: TraceArgs,
        /// Page or frame id
        #[arg(short, long)]
        id: String,
        /// Snapshot name
        #[arg(short, long)]
        name: String,
    },
    /// Write a resource body to stdout
    Content {
        #[command(flatten)]
        trace: TraceArgs,
        /// Content hash of the resource
        #[arg(long)]
        hash: String,
    },
    /// Print index statistics
    Stats {
        #[command(flatten)]
        trace: TraceArgs,
    },
}

async fn open(trace: &TraceArgs) -> Result<TraceStorage> {
    // Blobs are read on demand, so a missing directory only fails `content`.
    let blobs = FsBlobStore::new(&trace.blobs);
    let mut storage = TraceStorage::new(Arc::new(blobs));

    let loader = TraceLoader::new().with_config(LoaderConfig {
        network_suffix: trace.network_suffix.clone(),
        dom_suffix: trace.dom_suffix.clone(),
    });
    loader
        .load(&mut storage, &trace.prefix)
        .await
        .wrap_err_with(|| format!("loading trace {}", trace.prefix.display()))?;
    tracing::debug!(stats = ?storage.stats(), "trace ready");
    Ok(storage)
}

fn print_renderer(renderer: &Renderer) {
    println!("frame:    {}", renderer.frame_id());
    println!("page:     {}", renderer.page_id());
    println!("index:    {}", renderer.index());
    println!("name:     {}", renderer.snapshot_name().unwrap_or("-"));
    println!("urls:     {}", renderer.resources().len());
    for url in renderer.resources().urls() {
        if let Some(reference) = renderer.resource_by_url(url) {
            println!("  {} -> {} ({})", url, reference.resource_id, reference.frame_id);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tracescope=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resources { trace } => {
            let storage = open(&trace).await?;
            for resource in storage.resources() {
                println!(
                    "{}\t{}\t{}\t{}",
                    resource.resource_id, resource.frame_id, resource.content_hash, resource.url
                );
            }
            Ok(())
        }
        Commands::Snapshot { trace, id, name } => {
            let storage = open(&trace).await?;
            let renderer = storage
                .snapshot_by_name(&id, &name)
                .ok_or_else(|| eyre!("snapshot '{}' not found for {}", name, id))?;
            print_renderer(&renderer);
            Ok(())
        }
        Commands::Content { trace, hash } => {
            let storage = open(&trace).await?;
            let hash = ContentHash::from(hash);
            let data = storage
                .resource_content(&hash)
                .wrap_err_with(|| format!("reading blob {}", hash))?;
            std::io::stdout().write_all(&data)?;
            Ok(())
        }
        Commands::Stats { trace } => {
            let storage = open(&trace).await?;
            println!("{}", serde_json::to_string_pretty(&storage.stats())?);
            Ok(())
        }
    }
}
