//! Validated configuration: which RDF types and predicates denote classes,
//! properties, enumerations, labels, definitions and examples, plus the
//! namespace prefixes used for query headers and display labels.
//!
//! A [`Config`] can only be obtained through validation, so every value a
//! query template receives is a well-formed bracketed IRI.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::query::STRUCTURAL_PREFIXES;

/// The configuration bundled with the crate, used when none is supplied.
pub const BUNDLED_CONFIG: &str = include_str!("../data/config.yaml");

/// Semantic type names every configuration must define.
pub const REQUIRED_TYPES: [&str; 3] = ["class", "property", "enumeration"];

/// Semantic predicate names every configuration must define.
pub const REQUIRED_PREDICATES: [&str; 3] = ["label", "definition", "example"];

/// An absolute IRI taken from a `<...>` literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IriRef(String);

impl IriRef {
    /// Parses a bracketed IRI literal such as `<http://www.w3.org/2000/01/rdf-schema#label>`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedIri`] if the brackets are missing, the
    /// IRI is not absolute, or it contains characters a SPARQL `IRIREF`
    /// forbids.
    pub fn parse_bracketed(field: &str, literal: &str) -> Result<Self, ConfigError> {
        let malformed = || ConfigError::MalformedIri {
            field: field.to_string(),
            value: literal.to_string(),
        };
        let inner = literal
            .trim()
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .ok_or_else(malformed)?;
        let forbidden = |c: char| {
            c.is_whitespace()
                || c.is_control()
                || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
        };
        if inner.is_empty() || inner.chars().any(forbidden) || !inner.contains(':') {
            return Err(malformed());
        }
        Ok(Self(inner.to_string()))
    }

    /// The IRI without its brackets.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IriRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// Where the documented ontology lives, used to turn its own IRIs into
/// in-page anchors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OntologySettings {
    /// Namespace IRI of the ontology, without the trailing separator.
    pub uri_base: String,
    /// Character(s) separating `uri_base` from local names (`/` or `#`).
    pub separator: String,
}

/// A validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    types: BTreeMap<String, IriRef>,
    predicates: BTreeMap<String, IriRef>,
    prefixes: BTreeMap<String, IriRef>,
    ontology: OntologySettings,
}

#[derive(Deserialize)]
struct RawConfig {
    #[serde(rename = "type")]
    types: Option<BTreeMap<String, String>>,
    #[serde(rename = "predicate")]
    predicates: Option<BTreeMap<String, String>>,
    #[serde(rename = "prefix")]
    prefixes: Option<BTreeMap<String, String>>,
    ontology: Option<RawOntology>,
}

#[derive(Deserialize)]
struct RawOntology {
    uri_base: Option<String>,
    separator: Option<String>,
}

impl Config {
    /// Loads the configuration bundled with the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled document itself is invalid.
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_yaml_str(BUNDLED_CONFIG)
    }

    /// Reads and validates a configuration file. `.toml` files are parsed as
    /// TOML, everything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or any
    /// validation error raised by [`Config::from_yaml_str`] /
    /// [`Config::from_toml_str`].
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);
        if is_toml {
            Self::from_toml_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    /// Parses and validates a YAML configuration document.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first missing key or malformed value.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_yaml::from_str(text)?;
        Self::validate(raw)
    }

    /// Parses and validates a TOML configuration document.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first missing key or malformed value.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> Result<Self, ConfigError> {
        let raw_types = raw.types.ok_or_else(|| missing("type"))?;
        let raw_predicates = raw.predicates.ok_or_else(|| missing("predicate"))?;
        let raw_prefixes = raw.prefixes.ok_or_else(|| missing("prefix"))?;
        let raw_ontology = raw.ontology.ok_or_else(|| missing("ontology"))?;

        let types = parse_iri_map("type", raw_types)?;
        if let Some(name) = REQUIRED_TYPES.iter().find(|name| !types.contains_key(**name)) {
            return Err(ConfigError::MissingType((*name).to_string()));
        }

        let predicates = parse_iri_map("predicate", raw_predicates)?;
        if let Some(name) = REQUIRED_PREDICATES
            .iter()
            .find(|name| !predicates.contains_key(**name))
        {
            return Err(ConfigError::MissingPredicate((*name).to_string()));
        }

        let prefixes = parse_iri_map("prefix", raw_prefixes)?;
        for (name, iri) in &prefixes {
            validate_prefix_name(name)?;
            if let Some((_, expected)) = STRUCTURAL_PREFIXES.iter().find(|(p, _)| *p == name.as_str()) {
                if iri.as_str() != *expected {
                    return Err(ConfigError::ReservedPrefix {
                        prefix: name.clone(),
                        expected: (*expected).to_string(),
                        found: iri.as_str().to_string(),
                    });
                }
            }
        }

        let uri_base = raw_ontology
            .uri_base
            .ok_or_else(|| missing("ontology.uri_base"))?;
        let separator = raw_ontology
            .separator
            .ok_or_else(|| missing("ontology.separator"))?;

        Ok(Self {
            types,
            predicates,
            prefixes,
            ontology: OntologySettings {
                uri_base,
                separator,
            },
        })
    }

    /// Returns the RDF type configured under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingType`] if the name is not configured.
    /// The required names are checked at load time, so this only fails for
    /// optional ones.
    pub fn get_type(&self, name: &str) -> Result<&IriRef, ConfigError> {
        self.types
            .get(name)
            .ok_or_else(|| ConfigError::MissingType(name.to_string()))
    }

    /// Returns the RDF predicate configured under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingPredicate`] if the name is not configured.
    pub fn get_predicate(&self, name: &str) -> Result<&IriRef, ConfigError> {
        self.predicates
            .get(name)
            .ok_or_else(|| ConfigError::MissingPredicate(name.to_string()))
    }

    /// Configured namespace prefixes, keyed by prefix name.
    pub fn prefixes(&self) -> &BTreeMap<String, IriRef> {
        &self.prefixes
    }

    /// Ontology location settings.
    pub fn ontology(&self) -> &OntologySettings {
        &self.ontology
    }

    /// `uri_base` followed by the separator: IRIs starting with this are
    /// rendered as local `#fragment` links.
    pub fn ontology_base(&self) -> String {
        format!("{}{}", self.ontology.uri_base, self.ontology.separator)
    }
}

fn missing(key: &str) -> ConfigError {
    ConfigError::MissingKey(key.to_string())
}

fn parse_iri_map(
    section: &str,
    raw: BTreeMap<String, String>,
) -> Result<BTreeMap<String, IriRef>, ConfigError> {
    raw.into_iter()
        .map(|(name, value)| {
            let iri = IriRef::parse_bracketed(&format!("{section}.{name}"), &value)?;
            Ok((name, iri))
        })
        .collect()
}

fn validate_prefix_name(name: &str) -> Result<(), ConfigError> {
    let mut chars = name.chars();
    let starts_with_letter = chars.next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false);
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if starts_with_letter && rest_ok && !name.ends_with('.') {
        Ok(())
    } else {
        Err(ConfigError::MalformedPrefix(name.to_string()))
    }
}
