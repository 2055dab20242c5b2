use clap::Parser;
use color_eyre::eyre::WrapErr;
use indicatif::MultiProgress;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use medgraph_core::{connect, Category, Config, ConfigOverrides, GraphStore, ImportReport, Importer, RelationKind};

mod progress;

use progress::{BarProgress, SuspendingWriter};

#[derive(Parser, Debug)]
#[command(name = "medgraph")]
#[command(about = "Bulk-load a medical knowledge record file into a graph database", long_about = None)]
struct Cli {
    /// Graph database endpoint (bolt://, neo4j://, ws://, http:// or mem://)
    #[arg(long, visible_alias = "website")]
    endpoint: Option<String>,

    /// Database user
    #[arg(short, long, visible_alias = "username")]
    user: Option<String>,

    /// Database password
    #[arg(short, long)]
    password: Option<String>,

    /// Database name
    #[arg(short, long, visible_alias = "dbname")]
    database: Option<String>,

    /// JSON config file (defaults to ./medgraph.json)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            endpoint: self.endpoint.clone(),
            username: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let bars = MultiProgress::new();
    let log_bars = bars.clone();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(move || SuspendingWriter::new(log_bars.clone()))
        .init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?.with_overrides(cli.overrides());
    let settings = config.connection()?;
    let batch_width = config.batch_width()?;

    tracing::info!(endpoint = %settings.endpoint, database = %settings.database, "connecting");
    let store = connect(&settings)
        .await
        .wrap_err_with(|| format!("could not connect to {}", settings.endpoint))?;

    let progress = BarProgress::new(bars);
    let report = Importer::new(store.as_ref(), batch_width)
        .with_progress(&progress)
        .run(&config.input)
        .await?;

    print_summary(store.as_ref(), &config, &report).await;
    Ok(())
}

/// Print what was parsed and loaded, alongside what the store now holds.
async fn print_summary(store: &dyn GraphStore, config: &Config, report: &ImportReport) {
    let parse = &report.parse;
    println!("Imported {}", config.input.display());
    println!(
        "  Records: {} of {} lines ({} short, {} malformed)",
        parse.records, parse.lines, parse.skipped_short, parse.malformed
    );

    println!("  Entities:");
    for (category, loaded) in &report.load.entities {
        println!("    {:<14} {:>8} loaded  {:>8} stored", category.label(), loaded, stored_nodes(store, *category).await);
    }

    println!("  Relations:");
    for (signature, loaded) in &report.load.relations {
        println!(
            "    {:<24} {:>8} loaded  {:>8} stored",
            signature.kind.label(),
            loaded,
            stored_edges(store, signature.kind).await
        );
    }

    println!("  Batches: {}", report.load.batches);
    for warning in &report.load.constraint_warnings {
        println!("  Warning: constraint not created for {}", warning);
    }
}

async fn stored_nodes(store: &dyn GraphStore, category: Category) -> String {
    match store.count_nodes(category).await {
        Ok(n) => n.to_string(),
        Err(e) => {
            tracing::warn!(%category, error = %e, "could not count nodes");
            "?".to_string()
        }
    }
}

async fn stored_edges(store: &dyn GraphStore, kind: RelationKind) -> String {
    match store.count_edges(kind).await {
        Ok(n) => n.to_string(),
        Err(e) => {
            tracing::warn!(%kind, error = %e, "could not count edges");
            "?".to_string()
        }
    }
}
