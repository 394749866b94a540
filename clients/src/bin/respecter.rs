//! `respecter` — Turns an RDF serialization of an ontology into a ReSpec styled HTML page.
//!
//! **Outputs:**
//! - the rendered page on stdout, or in `--output <path>`
//! - with `--debug`: `<debug-dir>/sparql_query_file.sparql` and
//!   `<debug-dir>/sparql_enumerations_query.sparql`
//!
//! **Usage:**
//! ```
//! respecter <ONTOLOGY> [--config <path>] [--output <path>] [--debug] [--debug-dir <dir>]
//!           [--format html|json] [--verbose]
//! ```
//!
//! Exits non-zero if the configuration, the ontology, or any query fails.
//! Nothing is written in that case.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use respecter_docs::writer::{write_html, write_text};
use respecter_docs::{render_html, render_json};
use respecter_extract::{fetch_with, Config, Diagnostics, OntologyGraph, QuerySet, ValueFormatter};
use tracing_subscriber::EnvFilter;

/// Output representation.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// ReSpec HTML page.
    Html,
    /// The extracted records as JSON.
    Json,
}

/// Turn an RDF ontology into a ReSpec styled HTML page.
#[derive(Parser)]
#[command(
    name = "respecter",
    version,
    about = "Turns a RDF serialization of an ontology into a ReSpec styled HTML page"
)]
struct Args {
    /// Path to the ontology RDF file.
    ontology: PathBuf,

    /// Path to the YAML (or TOML) configuration file. Defaults to the bundled one.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the output file. If not provided, the output is printed to stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Save the generated SPARQL queries for inspection.
    #[arg(long)]
    debug: bool,

    /// Directory the `--debug` queries are written to.
    #[arg(long, default_value = "debug")]
    debug_dir: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Log pipeline progress to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    let config = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => Config::bundled()?,
    };
    let queries = QuerySet::from_config(&config)?;

    if args.debug {
        for (name, query) in [
            ("sparql_query_file.sparql", queries.concepts.as_str()),
            ("sparql_enumerations_query.sparql", queries.enumerations.as_str()),
        ] {
            let path = args.debug_dir.join(name);
            write_text(&path, query)?;
            eprintln!("SPARQL query saved to file: {}", path.display());
        }
    }

    let base = config.ontology_base();
    let graph = OntologyGraph::load(&args.ontology, Some(&base))?;
    let formatter = ValueFormatter::from_config(&config);
    let mut diagnostics = Diagnostics::new();
    let document = fetch_with(&graph, &queries, &formatter, &mut diagnostics)
        .with_context(|| format!("Failed to extract {}", args.ontology.display()))?
        .into_document();
    tracing::info!(warnings = diagnostics.len(), "extraction finished");

    let rendered = match args.format {
        Format::Html => render_html(&document, &config)?,
        Format::Json => render_json(&document, &config)?,
    };

    match &args.output {
        Some(path) => {
            write_html(path, &rendered)?;
            eprintln!("Page saved to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
