//! HTTP Server Binary for the graph index
//!
//! Serves one file-backed graph index over REST.
//!
//! Usage:
//!   cargo run --bin http_server -- --host 0.0.0.0 --port 8080 --storage-dir ./data/graphs

use clap::Parser;
use graph_index::{http::start_server, GraphIndex, GraphIndexConfig, LocalStorage, NamespaceTable};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "Graph Index HTTP Server")]
#[command(about = "HTTP API server for the graph index", long_about = None)]
struct Args {
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    #[arg(short, long, default_value = "8080")]
    port: u16,

    #[arg(short, long, default_value = "./data/graphs")]
    storage_dir: PathBuf,

    /// Storage key of the JSON Lines index
    #[arg(long, default_value = graph_index::config::DEFAULT_INDEX_KEY)]
    index_key: String,

    /// JSON file of extra `"prefix": "namespace"` pairs
    #[arg(long)]
    namespaces: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut namespaces = NamespaceTable::default();
    if let Some(path) = &args.namespaces {
        for (prefix, namespace) in NamespaceTable::from_json_file(path)?.iter() {
            namespaces = namespaces.with_prefix(prefix, namespace);
        }
    }

    let config = GraphIndexConfig {
        index_key: args.index_key,
        storage_path: args.storage_dir,
        namespaces,
    };

    println!("Initializing storage at: {}", config.storage_path.display());
    let storage = Arc::new(LocalStorage::new(&config.storage_path));
    let index = Arc::new(GraphIndex::new(storage, config)?);

    let stats = index.stats().await?;
    println!("  - Entries: {}", stats.entries);
    println!("  - Triples: {}", stats.triples);
    println!();

    let addr = format!("{}:{}", args.host, args.port);

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        println!();
        println!("Shutdown signal received, stopping server...");
    };

    tokio::select! {
        result = start_server(&addr, index) => {
            if let Err(e) = result {
                eprintln!("Server error: {}", e);
            }
        }
        () = shutdown_signal => {
            println!("Server shut down gracefully");
        }
    }

    Ok(())
}
