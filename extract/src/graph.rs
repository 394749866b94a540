//! Graph loading and query execution.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::Term;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;

use crate::error::{FetchError, LoadError};
use crate::results::{ResultSet, Row, TaggedValue};

/// Executes SELECT queries and returns their solutions in result order.
pub trait QueryEngine {
    /// Runs `query`, which embeds its own `PREFIX` declarations.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the query cannot be evaluated or is not a
    /// SELECT query.
    fn select(&self, query: &str) -> Result<ResultSet, FetchError>;
}

/// An in-memory RDF graph backed by an `oxigraph` store.
pub struct OntologyGraph {
    store: Store,
}

impl OntologyGraph {
    /// Creates an empty graph.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Storage`] if the store cannot be created.
    pub fn new() -> Result<Self, LoadError> {
        Ok(Self {
            store: Store::new()?,
        })
    }

    /// Loads an ontology file, picking the RDF syntax from its extension.
    /// Relative IRIs resolve against `base_iri` when one is given.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] carrying `path` if the file cannot be opened,
    /// its syntax is unknown, or it does not parse.
    pub fn load(path: &Path, base_iri: Option<&str>) -> Result<Self, LoadError> {
        let format = format_for_path(path)?;
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let graph = Self::new()?;
        graph.load_reader(BufReader::new(file), format, base_iri, path)?;
        tracing::debug!(path = %path.display(), triples = graph.len(), "loaded ontology graph");
        Ok(graph)
    }

    /// Loads a graph from an in-memory document. `label` names the source in
    /// error messages.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] if the document does not parse.
    pub fn from_document(
        data: &str,
        format: RdfFormat,
        base_iri: Option<&str>,
        label: &str,
    ) -> Result<Self, LoadError> {
        let graph = Self::new()?;
        graph.load_reader(data.as_bytes(), format, base_iri, Path::new(label))?;
        Ok(graph)
    }

    fn load_reader(
        &self,
        reader: impl Read,
        format: RdfFormat,
        base_iri: Option<&str>,
        path: &Path,
    ) -> Result<(), LoadError> {
        let parse_error = |message: String| LoadError::Parse {
            path: PathBuf::from(path),
            message,
        };
        let mut parser = RdfParser::from_format(format);
        if let Some(base) = base_iri {
            parser = parser
                .with_base_iri(base)
                .map_err(|e| parse_error(format!("invalid base IRI `{base}`: {e}")))?;
        }
        self.store
            .load_from_reader(parser, reader)
            .map_err(|e| parse_error(e.to_string()))
    }

    /// Number of triples in the default graph.
    pub fn len(&self) -> usize {
        self.store.len().unwrap_or(0)
    }

    /// Returns true if the graph holds no triples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl QueryEngine for OntologyGraph {
    fn select(&self, query: &str) -> Result<ResultSet, FetchError> {
        let QueryResults::Solutions(solutions) = self.store.query(query)? else {
            return Err(FetchError::NotSelect);
        };
        let vars = solutions
            .variables()
            .iter()
            .map(|v| v.as_str().to_string())
            .collect();
        let mut rows = Vec::new();
        for solution in solutions {
            let solution = solution?;
            let mut row = Row::new();
            for (variable, term) in solution.iter() {
                row.bind(variable.as_str(), tag_term(term));
            }
            rows.push(row);
        }
        Ok(ResultSet::new(vars, rows))
    }
}

impl QueryEngine for ResultSet {
    /// Replays a recorded result set regardless of the query text.
    fn select(&self, _query: &str) -> Result<ResultSet, FetchError> {
        Ok(self.clone())
    }
}

/// Literals keep only their lexical form.
fn tag_term(term: &Term) -> TaggedValue {
    match term {
        Term::NamedNode(node) => TaggedValue::Uri(node.as_str().to_string()),
        Term::Literal(literal) => TaggedValue::Literal(literal.value().to_string()),
        Term::BlankNode(node) => TaggedValue::Unrecognized {
            kind: "bnode".to_string(),
            value: node.as_str().to_string(),
        },
        #[allow(unreachable_patterns)]
        other => TaggedValue::Unrecognized {
            kind: "triple".to_string(),
            value: other.to_string(),
        },
    }
}

/// Maps a file extension to its RDF syntax.
///
/// # Errors
///
/// Returns [`LoadError::UnsupportedFormat`] for unknown extensions.
pub fn format_for_path(path: &Path) -> Result<RdfFormat, LoadError> {
    let unsupported = || LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
    };
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(unsupported)?
        .to_ascii_lowercase();
    match extension.as_str() {
        "owl" | "xml" => Ok(RdfFormat::RdfXml),
        other => RdfFormat::from_extension(other).ok_or_else(unsupported),
    }
}
