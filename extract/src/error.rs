//! Error taxonomy for the extraction pipeline.
//!
//! Configuration, load and fetch failures are fatal and propagate unchanged to
//! the caller. Formatting problems are not errors: they are recorded in
//! [`Diagnostics`](crate::diagnostics::Diagnostics) instead.

use std::path::PathBuf;

/// A configuration document is incomplete or carries malformed values.
///
/// Always raised while the [`Config`](crate::config::Config) is being built,
/// before any query executes.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required key is absent (`type`, `predicate`, `prefix`, `ontology`,
    /// or a nested key such as `ontology.uri_base`).
    #[error("element `{0}` not found in configuration")]
    MissingKey(String),
    /// A semantic type name (`class`, `property`, `enumeration`) is absent.
    #[error("type `{0}` not found in configuration")]
    MissingType(String),
    /// A semantic predicate name (`label`, `definition`, `example`) is absent.
    #[error("predicate `{0}` not found in configuration")]
    MissingPredicate(String),
    /// A value is not a well-formed `<...>` IRI literal.
    #[error("`{field}` is not a well-formed bracketed IRI: `{value}`")]
    MalformedIri {
        /// Dotted path of the offending entry.
        field: String,
        /// The rejected value.
        value: String,
    },
    /// A namespace prefix name contains characters a query cannot declare.
    #[error("prefix name `{0}` is not a valid namespace prefix")]
    MalformedPrefix(String),
    /// A structural prefix is rebound to a namespace other than its standard one.
    #[error("prefix `{prefix}` is reserved for <{expected}>, found <{found}>")]
    ReservedPrefix {
        /// The reserved prefix name.
        prefix: String,
        /// Its standard namespace.
        expected: String,
        /// The namespace the configuration tried to bind.
        found: String,
    },
    /// The configuration file could not be read.
    #[error("failed to read configuration `{path}`: {source}")]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The YAML document is not syntactically valid or has the wrong shape.
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The TOML document is not syntactically valid or has the wrong shape.
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// The ontology graph could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The ontology file could not be opened.
    #[error("failed to read ontology `{path}`: {source}")]
    Io {
        /// Path of the ontology file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file extension does not name a supported RDF syntax.
    #[error("cannot infer RDF syntax of `{path}` from its extension")]
    UnsupportedFormat {
        /// Path of the ontology file.
        path: PathBuf,
    },
    /// The RDF document failed to parse.
    #[error("failed to parse ontology `{path}`: {message}")]
    Parse {
        /// Path (or label) of the parsed source.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
    /// The in-memory store could not be created.
    #[error("failed to create graph store: {0}")]
    Storage(#[from] oxigraph::store::StorageError),
}

/// Query execution or result extraction failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The query engine rejected or failed to evaluate a query.
    #[error("query evaluation failed: {0}")]
    Evaluation(String),
    /// A query returned something other than a solution sequence.
    #[error("query did not return a solution sequence")]
    NotSelect,
    /// The ontology metadata query matched nothing.
    #[error("no ontology metadata found: the graph has no `owl:Ontology` node")]
    MissingOntologyMetadata,
    /// A recorded result document could not be decoded.
    #[error("invalid SPARQL JSON results: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<oxigraph::sparql::EvaluationError> for FetchError {
    fn from(err: oxigraph::sparql::EvaluationError) -> Self {
        Self::Evaluation(err.to_string())
    }
}

/// Any fatal failure of the extraction pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// See [`LoadError`].
    #[error(transparent)]
    Load(#[from] LoadError),
    /// See [`FetchError`].
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
