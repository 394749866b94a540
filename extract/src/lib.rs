//! ReSpecter extraction pipeline.
//!
//! Turns an RDF ontology described with SHACL shapes into flat records a
//! renderer can lay out: ontology metadata, classes, properties, and
//! enumeration values grouped by their enumeration class.
//!
//! # Entry Points
//!
//! ```no_run
//! use std::path::Path;
//! use respecter_extract::{fetch_ontology, Config, Diagnostics, OntologyGraph};
//!
//! let config = Config::bundled()?;
//! let base = config.ontology_base();
//! let graph = OntologyGraph::load(Path::new("ontology.ttl"), Some(&base))?;
//! let mut diagnostics = Diagnostics::new();
//! let document = fetch_ontology(&graph, &config, &mut diagnostics)?.into_document();
//! println!("{} classes", document.classes.len());
//! # Ok::<(), respecter_extract::Error>(())
//! ```
//!
//! # Pipeline
//!
//! ```text
//! Config ──▶ QuerySet ──▶ QueryEngine::select ──▶ rows
//!                                                  │
//!                    ValueFormatter + Diagnostics ─┤
//!                                                  ▼
//!                              aggregate (classes, properties, enumerations)
//!                                                  │
//!                                                  ▼
//!                                   group_enumerations ──▶ Document
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod aggregate;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod graph;
pub mod grouping;
pub mod model;
pub mod query;
pub mod results;

use std::collections::BTreeMap;

use serde::Serialize;

pub use aggregate::EntityMap;
pub use config::Config;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{ConfigError, Error, FetchError, LoadError, Result};
pub use format::ValueFormatter;
pub use graph::{OntologyGraph, QueryEngine};
pub use model::{
    ClassEntity, ClassRecord, EnumerationEntity, EnumerationRecord, GroupedEnumerations, Ontology,
    PropertyEntity, PropertyRecord,
};
pub use query::QuerySet;
pub use results::{ResultSet, Row, TaggedValue};

/// Everything extracted from one ontology graph.
#[derive(Debug, Clone)]
pub struct Extracted {
    /// Ontology metadata.
    pub ontology: Ontology,
    /// Classes keyed by label.
    pub classes: EntityMap<ClassEntity>,
    /// Properties keyed by label.
    pub properties: EntityMap<PropertyEntity>,
    /// Enumeration values keyed by label.
    pub enumerations: EntityMap<EnumerationEntity>,
}

/// The flat records a renderer consumes.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Ontology metadata.
    pub ontology: Ontology,
    /// Class records in first-seen order.
    pub classes: Vec<ClassRecord>,
    /// Property records in first-seen order.
    pub properties: Vec<PropertyRecord>,
    /// Enumeration groups keyed by group term.
    pub enumerations: BTreeMap<String, GroupedEnumerations>,
}

impl Extracted {
    /// Projects every entity into its display record and groups the
    /// enumeration values.
    pub fn into_document(self) -> Document {
        Document {
            enumerations: grouping::group_enumerations(&self.enumerations),
            classes: self.classes.values().map(ClassEntity::record).collect(),
            properties: self.properties.values().map(PropertyEntity::record).collect(),
            ontology: self.ontology,
        }
    }
}

/// Runs the three extraction queries for `config` against `engine`.
///
/// # Errors
///
/// Returns [`Error::Config`] if the queries cannot be built, or
/// [`Error::Fetch`] if a query fails or the graph has no ontology metadata.
pub fn fetch_ontology<E: QueryEngine + ?Sized>(
    engine: &E,
    config: &Config,
    diagnostics: &mut Diagnostics,
) -> Result<Extracted> {
    let queries = QuerySet::from_config(config)?;
    let formatter = ValueFormatter::from_config(config);
    Ok(fetch_with(engine, &queries, &formatter, diagnostics)?)
}

/// Runs prepared queries. The metadata query runs first so a graph without
/// an `owl:Ontology` node fails before any aggregation.
///
/// # Errors
///
/// Returns a [`FetchError`] if a query fails or yields no metadata row.
pub fn fetch_with<E: QueryEngine + ?Sized>(
    engine: &E,
    queries: &QuerySet,
    formatter: &ValueFormatter,
    diagnostics: &mut Diagnostics,
) -> Result<Extracted, FetchError> {
    let metadata = engine.select(queries.metadata)?;
    let ontology = Ontology::from_metadata(metadata.rows())?;

    let concepts = engine.select(&queries.concepts)?;
    let enumerations = engine.select(&queries.enumerations)?;
    tracing::info!(
        concepts = concepts.rows().len(),
        enumerations = enumerations.rows().len(),
        "queries evaluated"
    );

    Ok(Extracted {
        ontology,
        classes: aggregate::extract_classes(concepts.rows(), formatter, diagnostics),
        properties: aggregate::extract_properties(concepts.rows(), formatter, diagnostics),
        enumerations: aggregate::extract_enumerations(enumerations.rows(), formatter, diagnostics),
    })
}
