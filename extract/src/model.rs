//! Domain entities produced by aggregation and the flat records handed to
//! the renderer.
//!
//! Entities keep their multi-valued fields as ordered sets. Records are the
//! display projection: every set is joined with `", "` and field names follow
//! the keys the document templates read (`Label`, `Definition`, ...).

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::error::FetchError;
use crate::results::Row;

/// Ontology-level metadata, built once from the metadata query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ontology {
    /// `dcterms:title`.
    pub title: String,
    /// `dcterms:description`, rendered as the introduction.
    pub introduction: String,
    /// `dcterms:abstract`.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// `dcterms:modified`.
    pub publish_date: String,
    /// Contributor names.
    pub contributors: Vec<String>,
    /// Creator names.
    pub creators: Vec<String>,
}

impl Ontology {
    /// Builds the record from the first metadata row.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingOntologyMetadata`] if `rows` is empty.
    pub fn from_metadata(rows: &[Row]) -> Result<Self, FetchError> {
        let row = rows.first().ok_or(FetchError::MissingOntologyMetadata)?;
        if rows.len() > 1 {
            let nodes = ontology_nodes(rows);
            if nodes > 1 {
                tracing::warn!(count = nodes, "several owl:Ontology nodes found, using the first");
            } else {
                tracing::warn!(
                    rows = rows.len(),
                    "ontology metadata has several values for a single-valued field, using the first"
                );
            }
        }
        let text = |column: &str| row.get(column).raw().to_string();
        Ok(Self {
            title: text("title"),
            introduction: text("description"),
            abstract_text: text("abstract"),
            publish_date: text("modified"),
            contributors: split_names(row.get("contributors").raw()),
            creators: split_names(row.get("creators").raw()),
        })
    }
}

/// Distinct `ontology` nodes among the metadata rows.
fn ontology_nodes(rows: &[Row]) -> usize {
    rows.iter()
        .map(|row| row.get("ontology").raw())
        .collect::<BTreeSet<_>>()
        .len()
}

fn split_names(joined: &str) -> Vec<String> {
    joined
        .split('\n')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// A property, merged across every row that carries its label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyEntity {
    /// Display label; the aggregation key.
    pub label: String,
    /// Formatted definition.
    pub definition: String,
    /// Formatted property IRI.
    pub property: String,
    /// In-page anchor name.
    pub fragment_identifier: String,
    /// Formatted classes the property is attached to.
    pub domains: BTreeSet<String>,
    /// Formatted permitted value types.
    pub ranges: BTreeSet<String>,
    /// Usage examples.
    pub examples: BTreeSet<String>,
}

impl PropertyEntity {
    /// The flat display projection.
    pub fn record(&self) -> PropertyRecord {
        PropertyRecord {
            label: self.label.clone(),
            definition: self.definition.clone(),
            property: self.property.clone(),
            domain: join(&self.domains),
            range: join(&self.ranges),
            example: join(&self.examples),
            fragment_identifier: self.fragment_identifier.clone(),
        }
    }
}

/// A class (node shape domain), merged across rows that carry its label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassEntity {
    /// Display label; the aggregation key.
    pub label: String,
    /// Formatted definition.
    pub definition: String,
    /// Formatted class IRI.
    pub term: String,
    /// In-page anchor name.
    pub fragment_identifier: String,
    /// Formatted properties constrained on the class.
    pub properties: BTreeSet<String>,
}

impl ClassEntity {
    /// The flat display projection.
    pub fn record(&self) -> ClassRecord {
        ClassRecord {
            label: self.label.clone(),
            definition: self.definition.clone(),
            term: self.term.clone(),
            property: join(&self.properties),
            fragment_identifier: self.fragment_identifier.clone(),
        }
    }
}

/// A class whose instances form a closed value set.
///
/// Equality, hashing and ordering look at `term` only; the other fields ride
/// along with whichever copy was stored first.
#[derive(Debug, Clone, Default)]
pub struct EnumerationGroup {
    /// Formatted group IRI; the group identity.
    pub term: String,
    /// Group label.
    pub label: String,
    /// In-page anchor name.
    pub fragment_identifier: String,
    /// Group definition.
    pub definition: String,
}

impl PartialEq for EnumerationGroup {
    fn eq(&self, other: &Self) -> bool {
        self.term == other.term
    }
}

impl Eq for EnumerationGroup {}

impl Hash for EnumerationGroup {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.term.hash(state);
    }
}

impl PartialOrd for EnumerationGroup {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EnumerationGroup {
    fn cmp(&self, other: &Self) -> Ordering {
        self.term.cmp(&other.term)
    }
}

/// One permissible value of an enumeration, merged across rows that carry
/// its label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumerationEntity {
    /// Display label; the aggregation key.
    pub label: String,
    /// Formatted definition.
    pub definition: String,
    /// Formatted value IRI.
    pub term: String,
    /// In-page anchor name.
    pub fragment_identifier: String,
    /// Formatted properties whose range admits this value.
    pub properties: BTreeSet<String>,
    /// Groups the value belongs to.
    pub groups: BTreeSet<EnumerationGroup>,
}

impl EnumerationEntity {
    /// The flat display projection.
    pub fn record(&self) -> EnumerationRecord {
        EnumerationRecord {
            label: self.label.clone(),
            definition: self.definition.clone(),
            term: self.term.clone(),
            groups: self
                .groups
                .iter()
                .map(|g| g.term.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            property: join(&self.properties),
            fragment_identifier: self.fragment_identifier.clone(),
        }
    }
}

/// Orders enumeration values by label, ordinally.
pub fn by_label(a: &EnumerationEntity, b: &EnumerationEntity) -> Ordering {
    a.label.cmp(&b.label)
}

/// Display projection of a [`PropertyEntity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PropertyRecord {
    /// Label.
    pub label: String,
    /// Definition.
    pub definition: String,
    /// Property hyperlink.
    pub property: String,
    /// Joined domains.
    pub domain: String,
    /// Joined ranges.
    pub range: String,
    /// Joined examples.
    pub example: String,
    /// Anchor name.
    pub fragment_identifier: String,
}

/// Display projection of a [`ClassEntity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClassRecord {
    /// Label.
    pub label: String,
    /// Definition.
    pub definition: String,
    /// Class hyperlink.
    pub term: String,
    /// Joined properties.
    pub property: String,
    /// Anchor name.
    pub fragment_identifier: String,
}

/// Display projection of an [`EnumerationEntity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnumerationRecord {
    /// Label.
    pub label: String,
    /// Definition.
    pub definition: String,
    /// Value hyperlink.
    pub term: String,
    /// Joined group terms.
    pub groups: String,
    /// Joined properties.
    pub property: String,
    /// Anchor name.
    pub fragment_identifier: String,
}

/// One enumeration group with its members sorted by label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupedEnumerations {
    /// Group hyperlink; the grouping key.
    pub term: String,
    /// Group label.
    pub label: String,
    /// Anchor name.
    pub fragment_identifier: String,
    /// Group definition.
    pub definition: String,
    /// Member records, labels non-decreasing.
    pub enumerations: Vec<EnumerationRecord>,
}

fn join(values: &BTreeSet<String>) -> String {
    values.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
