//! Graph Index - command-line access to a file-backed graph index
//!
//! Usage:
//!   graph-index query "? type Message" --limit 5
//!   echo "person:john ? ?" | graph-index query
//!   graph-index subjects schema:Person
//!   graph-index list
//!   graph-index ingest data/resources.jsonl

use clap::{Args, Parser, Subcommand};
use graph_index::querying::render_item;
use graph_index::storage::from_json_lines;
use graph_index::{
    parse_graph_query, GraphIndex, GraphIndexConfig, LocalStorage, NamespaceTable, QueryFilter,
    RawTriple, ResourceIdentifier,
};
use serde::Deserialize;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

const EXAMPLE_QUERIES: &str = "Example queries:
  person:john ? ?           # Find all graphs about person:john
  ? foaf:name \"John Doe\"    # Find all people with name \"John Doe\"
  ? ? ?                     # Find all graphs";

#[derive(Parser, Debug)]
#[command(name = "graph-index")]
#[command(about = "Query and populate a graph index of RDF triples")]
struct Cli {
    /// Directory holding the index
    #[arg(short, long, default_value = "data/graphs")]
    storage_path: PathBuf,

    /// Storage key of the JSON Lines index
    #[arg(long, default_value = graph_index::config::DEFAULT_INDEX_KEY)]
    index_key: String,

    /// JSON file of extra `"prefix": "namespace"` pairs
    #[arg(long)]
    namespaces: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Match `<subject> <predicate> <object>`; reads stdin lines when no query is given
    Query {
        line: Option<String>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// List typed subjects, optionally only those of one type
    Subjects { type_filter: Option<String> },
    /// List every indexed identifier
    List,
    /// Add `{identifier, triples}` records from a JSON Lines file
    Ingest { file: PathBuf },
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Keep identifiers starting with this text
    #[arg(long)]
    prefix: Option<String>,

    /// Maximum number of identifiers (0 = unlimited)
    #[arg(long)]
    limit: Option<usize>,

    /// Cumulative token budget
    #[arg(long)]
    max_tokens: Option<u64>,
}

impl From<FilterArgs> for QueryFilter {
    fn from(args: FilterArgs) -> Self {
        QueryFilter { prefix: args.prefix, limit: args.limit, max_tokens: args.max_tokens }
    }
}

#[derive(Debug, Deserialize)]
struct IngestRecord {
    identifier: ResourceIdentifier,
    #[serde(alias = "quads", default)]
    triples: Vec<RawTriple>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut namespaces = NamespaceTable::default();
    if let Some(path) = &cli.namespaces {
        for (prefix, namespace) in NamespaceTable::from_json_file(path)?.iter() {
            namespaces = namespaces.with_prefix(prefix, namespace);
        }
    }
    let config = GraphIndexConfig {
        index_key: cli.index_key,
        storage_path: cli.storage_path,
        namespaces,
    };
    let storage = Arc::new(LocalStorage::new(&config.storage_path));
    let index = GraphIndex::new(storage, config)?;

    match cli.command {
        Command::Query { line, filter } => {
            let filter = QueryFilter::from(filter);
            match line {
                Some(line) => print!("{}", perform_query(&index, &line, &filter).await?),
                None => {
                    for line in std::io::stdin().lock().lines() {
                        let line = line?;
                        if line.trim().is_empty() {
                            continue;
                        }
                        print!("{}", perform_query(&index, &line, &filter).await?);
                    }
                }
            }
        }
        Command::Subjects { type_filter } => {
            let subjects = index.subjects(type_filter.as_deref()).await?;
            if subjects.is_empty() {
                println!("No results");
            }
            for (subject, resource_type) in subjects {
                println!("{}\t{}", subject, resource_type);
            }
        }
        Command::List => {
            for identifier in index.identifiers().await? {
                println!("{}", identifier);
            }
        }
        Command::Ingest { file } => {
            let content = std::fs::read(&file)?;
            let records: Vec<IngestRecord> = from_json_lines(&content)?;
            let total = records.len();
            for record in records {
                index.add_item(record.identifier, record.triples).await?;
            }
            println!("Ingested {} entries from {}", total, file.display());
        }
    }

    Ok(())
}

/// Runs one query line. Parse errors are reported in the output, not returned.
async fn perform_query(
    index: &GraphIndex,
    line: &str,
    filter: &QueryFilter,
) -> graph_index::Result<String> {
    let query = match parse_graph_query(line) {
        Ok(query) => query,
        Err(e) => return Ok(format!("Error: {}\n\n{}\n", e, EXAMPLE_QUERIES)),
    };

    let identifiers = index.query_items(&query.into(), filter).await?;
    if identifiers.is_empty() {
        return Ok("No results\n".to_string());
    }

    let mut output = String::new();
    for (i, identifier) in identifiers.iter().enumerate() {
        let id = identifier.to_string();
        output.push_str(&format!("# {}: {}\n\n", i + 1, id));
        match index.get_item(&id).await? {
            Some(item) if !item.triples.is_empty() => {
                output.push_str(&render_item(&item, index.normalizer()));
                output.push('\n');
            }
            _ => output.push_str("No graph data available.\n\n"),
        }
    }
    Ok(output)
}
