// src/cli.rs
use clap::Parser;

/// Run a fixed tour of queries against the bookstore collection.
///
/// Without flags every parameter keeps its built-in default.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(long)]
    pub mongo_uri: Option<String>,

    #[arg(long)]
    pub db: Option<String>,

    #[arg(long)]
    pub collection: Option<String>,

    /// YAML file overriding any subset of the runner parameters
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long)]
    pub page_size: Option<u64>,

    /// Replace the collection with the sample catalogue before running
    #[arg(long)]
    pub seed: bool,

    /// Replace the collection with the books in this CSV file before running
    #[arg(long, conflicts_with = "seed")]
    pub seed_file: Option<String>,

    /// Print every step's request without connecting
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long)]
    pub debug: bool,
}
