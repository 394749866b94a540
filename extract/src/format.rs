//! Turning result cells into display strings.
//!
//! Literals pass through verbatim. IRIs become hyperlinks whose text is the
//! compact `prefix:local` form when a namespace is registered, and whose
//! target is a local `#fragment` when the IRI belongs to the documented
//! ontology.

use crate::config::Config;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::results::{Row, TaggedValue};

/// Vocabularies registered after the configured prefixes.
pub const WELL_KNOWN_PREFIXES: [(&str, &str); 16] = [
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("xml", "http://www.w3.org/XML/1998/namespace"),
    ("sh", "http://www.w3.org/ns/shacl#"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("dcat", "http://www.w3.org/ns/dcat#"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("prov", "http://www.w3.org/ns/prov#"),
    ("schema", "https://schema.org/"),
    ("vann", "http://purl.org/vocab/vann/"),
    ("void", "http://rdfs.org/ns/void#"),
    ("time", "http://www.w3.org/2006/time#"),
];

/// Namespace bindings used to compact IRIs.
#[derive(Debug, Clone, Default)]
pub struct PrefixRegistry {
    bindings: Vec<(String, String)>,
}

impl PrefixRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configured prefixes first, then [`WELL_KNOWN_PREFIXES`].
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::new();
        for (name, iri) in config.prefixes() {
            registry.bind(name, iri.as_str());
        }
        for (name, namespace) in WELL_KNOWN_PREFIXES {
            registry.bind(name, namespace);
        }
        registry
    }

    /// Binds `namespace` under `name` and returns the name actually used.
    ///
    /// A namespace that is already bound keeps its existing name. A name
    /// already taken by another namespace gets the first free numeric suffix
    /// (`schema` becomes `schema1`).
    pub fn bind(&mut self, name: &str, namespace: &str) -> String {
        if let Some((existing, _)) = self.bindings.iter().find(|(_, ns)| ns == namespace) {
            return existing.clone();
        }
        let mut candidate = name.to_string();
        let mut suffix = 1;
        while self.namespace(&candidate).is_some() {
            candidate = format!("{name}{suffix}");
            suffix += 1;
        }
        self.bindings.push((candidate.clone(), namespace.to_string()));
        candidate
    }

    /// The namespace bound to `name`.
    pub fn namespace(&self, name: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ns)| ns.as_str())
    }

    /// Compacts `iri` with the longest matching namespace. The local part
    /// must be non-empty and contain no `/` or `#`.
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.bindings
            .iter()
            .filter_map(|(name, ns)| {
                let local = iri.strip_prefix(ns.as_str())?;
                let valid = !local.is_empty() && !local.contains(['/', '#']);
                valid.then_some((ns.len(), name, local))
            })
            .max_by_key(|(len, _, _)| *len)
            .map(|(_, name, local)| format!("{name}:{local}"))
    }
}

/// Formats cells against one ontology base and prefix registry.
#[derive(Debug, Clone)]
pub struct ValueFormatter {
    base: String,
    separator: String,
    prefixes: PrefixRegistry,
}

impl ValueFormatter {
    /// Creates a formatter. IRIs starting with `base` link to `#local`;
    /// fragment identifiers are cut at `separator`.
    pub fn new(base: impl Into<String>, separator: impl Into<String>, prefixes: PrefixRegistry) -> Self {
        Self {
            base: base.into(),
            separator: separator.into(),
            prefixes,
        }
    }

    /// Formatter for the configured ontology base and prefixes.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.ontology_base(),
            config.ontology().separator.clone(),
            PrefixRegistry::from_config(config),
        )
    }

    /// Formats one cell. Unbound and unrecognized cells become "" and are
    /// recorded against `column`.
    pub fn format(&self, value: &TaggedValue, column: &str, diagnostics: &mut Diagnostics) -> String {
        match value {
            TaggedValue::Literal(text) => text.clone(),
            TaggedValue::Uri(iri) => self.hyperlink(iri),
            TaggedValue::Unbound => {
                diagnostics.warn(DiagnosticKind::Unbound, column, "missing value encountered");
                String::new()
            }
            TaggedValue::Unrecognized { kind, value } => {
                diagnostics.warn(
                    DiagnosticKind::UnrecognizedTerm,
                    column,
                    format!("unknown type `{kind}` for value `{value}`"),
                );
                String::new()
            }
        }
    }

    /// Formats the cell `column` of `row`.
    pub fn format_cell(&self, row: &Row, column: &str, diagnostics: &mut Diagnostics) -> String {
        self.format(row.get(column), column, diagnostics)
    }

    /// Like [`ValueFormatter::format_cell`], but `None` for cells that
    /// degraded to "" (still recorded as diagnostics).
    pub fn present_cell(
        &self,
        row: &Row,
        column: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<String> {
        let value = row.get(column);
        let formatted = self.format(value, column, diagnostics);
        matches!(value, TaggedValue::Uri(_) | TaggedValue::Literal(_)).then_some(formatted)
    }

    /// `<a href="target">label</a>` for an IRI.
    pub fn hyperlink(&self, iri: &str) -> String {
        format!(
            r#"<a href="{}">{}</a>"#,
            escape_html(&self.link_target(iri)),
            escape_html(&self.display_label(iri))
        )
    }

    /// `#local` for IRIs of the documented ontology, the IRI otherwise.
    pub fn link_target(&self, iri: &str) -> String {
        match iri.strip_prefix(self.base.as_str()) {
            Some(local) if !self.base.is_empty() => format!("#{local}"),
            _ => iri.to_string(),
        }
    }

    /// Compact `prefix:local` form, or the full IRI.
    pub fn display_label(&self, iri: &str) -> String {
        self.prefixes.compact(iri).unwrap_or_else(|| iri.to_string())
    }

    /// [`extract_fragment`] with the configured separator.
    pub fn fragment(&self, iri: &str) -> String {
        extract_fragment(iri, &self.separator)
    }
}

/// The part of `uri` after the last `separator`, or "" if it has none.
/// An empty separator falls back to `#`.
pub fn extract_fragment(uri: &str, separator: &str) -> String {
    let separator = if separator.is_empty() { "#" } else { separator };
    uri.rsplit_once(separator)
        .map(|(_, fragment)| fragment.to_string())
        .unwrap_or_default()
}

/// Escapes text for use in element content and double- or single-quoted
/// attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn formatter(base: &str) -> ValueFormatter {
        let mut prefixes = PrefixRegistry::new();
        prefixes.bind("xsd", "http://www.w3.org/2001/XMLSchema#");
        prefixes.bind("ex", "https://example.com/");
        ValueFormatter::new(base, "/", prefixes)
    }

    #[test]
    fn escaping_covers_both_quote_styles() {
        assert_eq!(
            escape_html(r#"<a title="x" alt='y'>&</a>"#),
            "&lt;a title=&quot;x&quot; alt=&#39;y&#39;&gt;&amp;&lt;/a&gt;"
        );
    }

    #[test]
    fn literals_pass_through() {
        let mut diagnostics = Diagnostics::new();
        for text in ["Respecter", "", "<b>bold</b>", "a, b"] {
            let value = TaggedValue::Literal(text.to_string());
            assert_eq!(formatter("https://x.org/").format(&value, "c", &mut diagnostics), text);
        }
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn ontology_iris_become_local_fragments() {
        let f = ValueFormatter::new("https://example.com/", "/", PrefixRegistry::new());
        let value = TaggedValue::Uri("https://example.com/respecter".to_string());
        assert_eq!(
            f.format(&value, "property", &mut Diagnostics::new()),
            r##"<a href="#respecter">https://example.com/respecter</a>"##
        );
        assert_eq!(f.link_target("https://example.com/a/b"), "#a/b");
    }

    #[test]
    fn foreign_iris_keep_their_target() {
        let f = ValueFormatter::new("https://my-other-example.com/", "/", PrefixRegistry::new());
        let value = TaggedValue::Uri("https://example.com/respecter".to_string());
        assert_eq!(
            f.format(&value, "property", &mut Diagnostics::new()),
            r#"<a href="https://example.com/respecter">https://example.com/respecter</a>"#
        );
    }

    #[test]
    fn registered_prefixes_shorten_labels() {
        let f = formatter("https://example.com/");
        assert_eq!(
            f.hyperlink("http://www.w3.org/2001/XMLSchema#string"),
            r#"<a href="http://www.w3.org/2001/XMLSchema#string">xsd:string</a>"#
        );
        assert_eq!(
            f.hyperlink("https://example.com/Person"),
            r##"<a href="#Person">ex:Person</a>"##
        );
        assert_eq!(f.display_label("https://example.com/a/b"), "https://example.com/a/b");
    }

    #[test]
    fn unbound_and_unknown_degrade_to_empty() {
        let f = formatter("https://example.com/");
        let mut diagnostics = Diagnostics::new();
        assert_eq!(f.format(&TaggedValue::Unbound, "range", &mut diagnostics), "");
        let bnode = TaggedValue::Unrecognized {
            kind: "bnode".to_string(),
            value: "b1".to_string(),
        };
        assert_eq!(f.format(&bnode, "domain", &mut diagnostics), "");
        assert_eq!(diagnostics.count(DiagnosticKind::Unbound), 1);
        assert_eq!(diagnostics.count(DiagnosticKind::UnrecognizedTerm), 1);
        assert_eq!(diagnostics.entries()[1].column, "domain");

        let row = Row::new().with("label", TaggedValue::Literal(String::new()));
        assert_eq!(f.present_cell(&row, "label", &mut diagnostics).as_deref(), Some(""));
        assert_eq!(f.present_cell(&row, "range", &mut diagnostics), None);
        assert_eq!(diagnostics.count(DiagnosticKind::Unbound), 2);
    }

    #[test]
    fn fragments() {
        assert_eq!(extract_fragment("https://example.com/respecter", "/"), "respecter");
        assert_eq!(extract_fragment("https://example.com#respecter", "#"), "respecter");
        assert_eq!(extract_fragment("no-separator-here", "#"), "");
        assert_eq!(extract_fragment("https://example.com/a#b", ""), "b");
    }

    #[test]
    fn longest_namespace_wins() {
        let mut prefixes = PrefixRegistry::new();
        prefixes.bind("ex", "https://example.com/");
        prefixes.bind("exv", "https://example.com/vocab#");
        assert_eq!(
            prefixes.compact("https://example.com/vocab#Term").as_deref(),
            Some("exv:Term")
        );
    }

    #[test]
    fn colliding_names_get_numeric_suffixes() {
        let mut prefixes = PrefixRegistry::new();
        assert_eq!(prefixes.bind("schema", "http://schema.org/"), "schema");
        assert_eq!(prefixes.bind("schema", "https://schema.org/"), "schema1");
        assert_eq!(prefixes.bind("other", "http://schema.org/"), "schema");
        assert_eq!(
            prefixes.compact("https://schema.org/Person").as_deref(),
            Some("schema1:Person")
        );
    }

    #[test]
    fn link_attributes_are_escaped() {
        let f = formatter("https://example.com/");
        assert_eq!(
            f.hyperlink("https://other.org/search?a=1&b=2"),
            r#"<a href="https://other.org/search?a=1&amp;b=2">https://other.org/search?a=1&amp;b=2</a>"#
        );
    }
}
