//! SPARQL query assembly.
//!
//! Each query is a fixed template whose slots (prefix block, configured
//! types and predicates) are filled from a validated [`Config`]. Slot values
//! are [`IriRef`]s, which cannot contain characters that would escape an
//! `IRIREF` token.

use crate::config::{Config, IriRef};
use crate::error::ConfigError;

/// Prefixes the templates rely on. A configuration may repeat them but not
/// rebind them.
pub const STRUCTURAL_PREFIXES: [(&str, &str); 3] = [
    ("sh", "http://www.w3.org/ns/shacl#"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
];

/// The fixed ontology metadata query. Yields at most one row per
/// `owl:Ontology` node.
pub const ONTOLOGY_METADATA_QUERY: &str = include_str!("../data/ontology_metadata.rq");

/// Values filling the template slots.
struct Slots<'a> {
    prefixes: String,
    property_type: &'a IriRef,
    enumeration_type: &'a IriRef,
    label: &'a IriRef,
    definition: &'a IriRef,
    example: &'a IriRef,
}

impl<'a> Slots<'a> {
    fn from_config(config: &'a Config) -> Result<Self, ConfigError> {
        // Checked at load time; `class` is required there but no template
        // restricts the type of a node shape's target.
        config.get_type("class")?;
        Ok(Self {
            prefixes: prefix_block(config),
            property_type: config.get_type("property")?,
            enumeration_type: config.get_type("enumeration")?,
            label: config.get_predicate("label")?,
            definition: config.get_predicate("definition")?,
            example: config.get_predicate("example")?,
        })
    }
}

/// The three queries one run executes.
#[derive(Debug, Clone)]
pub struct QuerySet {
    /// Classes (node shape domains) joined with their constrained properties.
    pub concepts: String,
    /// Enumeration values grouped by the class a property shape restricts to.
    pub enumerations: String,
    /// Ontology-level metadata.
    pub metadata: &'static str,
}

impl QuerySet {
    /// Builds the parametrized queries for `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required type or predicate is missing.
    /// A `Config` built through validation always has them.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let slots = Slots::from_config(config)?;
        Ok(Self {
            concepts: concepts_query(&slots),
            enumerations: enumerations_query(&slots),
            metadata: ONTOLOGY_METADATA_QUERY,
        })
    }
}

/// Renders the `PREFIX` header: structural prefixes first, then configured
/// ones that do not repeat them.
fn prefix_block(config: &Config) -> String {
    let mut block = String::new();
    for (name, iri) in STRUCTURAL_PREFIXES {
        block.push_str(&format!("PREFIX {name}: <{iri}>\n"));
    }
    for (name, iri) in config.prefixes() {
        if STRUCTURAL_PREFIXES.iter().any(|(p, _)| *p == name.as_str()) {
            continue;
        }
        block.push_str(&format!("PREFIX {name}: {iri}\n"));
    }
    block
}

/// Range precedence: an option listed inside `sh:or`, then a class
/// restriction, then a datatype.
fn concepts_query(slots: &Slots<'_>) -> String {
    format!(
        r#"{prefixes}
SELECT ?domain ?classLabel ?classDefinition ?property ?propertyLabel ?propertyDefinition ?range ?example
WHERE {{
    ?nodeShape sh:property ?propertyShape .
    ?propertyShape sh:path ?property .
    ?property a {property_type} .
    ?property {label} ?propertyLabel .
    OPTIONAL {{ ?property {definition} ?propertyDefinition }}
    OPTIONAL {{ ?property {example} ?example }}
    OPTIONAL {{ ?propertyShape sh:datatype ?datatype }}
    OPTIONAL {{ ?propertyShape sh:class ?classRestriction }}
    OPTIONAL {{
        ?propertyShape sh:or/rdf:rest*/rdf:first ?alternative .
        ?alternative (sh:class|sh:datatype|sh:node|sh:hasValue) ?alternativeRange .
    }}
    OPTIONAL {{ ?nodeShape sh:targetClass ?targetClass }}
    BIND(COALESCE(?targetClass, ?nodeShape) AS ?domain)
    BIND(COALESCE(?alternativeRange, ?classRestriction, ?datatype) AS ?range)
    ?domain {label} ?classLabel .
    OPTIONAL {{ ?domain {definition} ?classDefinition }}
}}
"#,
        prefixes = slots.prefixes,
        property_type = slots.property_type,
        label = slots.label,
        definition = slots.definition,
        example = slots.example,
    )
}

/// Both the direct `sh:class` branch and the `sh:or` list branch are
/// evaluated and unioned.
fn enumerations_query(slots: &Slots<'_>) -> String {
    format!(
        r#"{prefixes}
SELECT DISTINCT ?enumerationValue ?enumerationLabel ?enumerationDefinition ?property ?propertyLabel ?group ?groupLabel ?groupDefinition
WHERE {{
    ?propertyShape sh:path ?property .
    {{
        ?propertyShape sh:class ?group .
    }}
    UNION
    {{
        ?propertyShape sh:or/rdf:rest*/rdf:first/sh:class ?group .
    }}
    ?group rdfs:subClassOf+ {enumeration_type} .
    ?enumerationValue a ?group .
    OPTIONAL {{ ?property {label} ?propertyLabel }}
    OPTIONAL {{ ?group {label} ?groupLabel }}
    OPTIONAL {{ ?group {definition} ?groupDefinition }}
    OPTIONAL {{ ?enumerationValue {label} ?enumerationLabel }}
    OPTIONAL {{ ?enumerationValue {definition} ?enumerationDefinition }}
}}
"#,
        prefixes = slots.prefixes,
        enumeration_type = slots.enumeration_type,
        label = slots.label,
        definition = slots.definition,
    )
}
