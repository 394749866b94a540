//! ReSpecter document renderer.
//!
//! Lays out the records produced by `respecter-extract` as a single
//! ReSpec-styled HTML specification.
//!
//! # Entry Points
//!
//! ```no_run
//! use std::path::Path;
//! use respecter_docs::{generate, render_html};
//! use respecter_extract::{fetch_ontology, Config, Diagnostics, OntologyGraph};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::bundled()?;
//! let graph = OntologyGraph::load(Path::new("ontology.ttl"), None)?;
//! let document = fetch_ontology(&graph, &config, &mut Diagnostics::new())?.into_document();
//! let html = render_html(&document, &config)?;
//! generate(&html, Path::new("public/index.html"))?;
//! # Ok(())
//! # }
//! ```
//!
//! # Structure
//!
//! ```text
//! <head>   respecConfig (title, publishDate, editors, authors)
//! <body>
//!   #abstract        ← dcterms:abstract (Markdown)
//!   #introduction    ← dcterms:description (Markdown)
//!   #classes         ← one section per class
//!   #properties      ← one section per property
//!   #enumerations    ← one section per enumeration group
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod prefixes;
pub mod renderer;
pub mod writer;

use std::path::Path;

use anyhow::{Context, Result};

use respecter_extract::{Config, Document};

/// Renders `document` and collapses numbered aliases of the configured
/// prefixes in the finished page.
///
/// # Errors
///
/// Returns an error if a prefix repair pattern cannot be compiled.
pub fn render_html(document: &Document, config: &Config) -> Result<String> {
    let html = renderer::render_document(document);
    let repaired = prefixes::repair_prefixes(&html, config.prefixes().keys().map(String::as_str))
        .context("Failed to build prefix repair patterns")?;
    tracing::info!(
        classes = document.classes.len(),
        properties = document.properties.len(),
        groups = document.enumerations.len(),
        "rendered document"
    );
    Ok(repaired)
}

/// Renders `document` as pretty-printed JSON, with the same prefix repair
/// as [`render_html`].
///
/// # Errors
///
/// Returns an error if serialization fails or a prefix repair pattern cannot
/// be compiled.
pub fn render_json(document: &Document, config: &Config) -> Result<String> {
    let json = serde_json::to_string_pretty(document).context("Failed to serialize document")?;
    prefixes::repair_prefixes(&json, config.prefixes().keys().map(String::as_str))
        .context("Failed to build prefix repair patterns")
}

/// Writes a rendered page to `out_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn generate(html: &str, out_path: &Path) -> Result<()> {
    writer::write_html(out_path, html)
}
