use anyhow::{Context, Result};
use clap::Parser;
use plp_bookstore::cli::Cli;
use plp_bookstore::config::RunnerConfig;
use plp_bookstore::report::Reporter;
use plp_bookstore::runner::{dry_run, run_scoped};
use plp_bookstore::seed::{books_from_csv_file, sample_books};
use tracing_subscriber::EnvFilter;

fn init_tracing(debug: bool) -> Result<()> {
    let default_filter = if debug {
        "plp_queries=debug,plp_bookstore=debug"
    } else {
        "plp_queries=info,plp_bookstore=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .context("Failed to set global tracing subscriber")?;

    Ok(())
}

async fn run(args: &Cli) -> Result<()> {
    let config = RunnerConfig::resolve(args)?;
    let mut reporter = Reporter::new(std::io::stdout());

    if args.dry_run {
        return dry_run(&config, &mut reporter);
    }

    let seed = if let Some(path) = &args.seed_file {
        Some(books_from_csv_file(path)?)
    } else if args.seed {
        Some(sample_books())
    } else {
        None
    };

    tracing::info!(db = %config.db, collection = %config.collection, "starting query run");
    run_scoped(&config, seed, &mut reporter).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug)?;

    if let Err(e) = run(&args).await {
        tracing::error!("Query run aborted: {:?}", e);
        std::process::exit(1);
    }

    if !args.dry_run {
        println!("✅ Completed query run.");
    }
    Ok(())
}
