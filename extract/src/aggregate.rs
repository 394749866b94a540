//! Folding query rows into deduplicated entities.
//!
//! Rows are grouped by their label column. Each label owns a builder that
//! absorbs every row carrying that label: scalar fields take the latest bound
//! value, set fields take the union of all formatted values. Once every row
//! has been seen the builders are frozen into entities.

use std::collections::{BTreeSet, HashMap};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::format::ValueFormatter;
use crate::model::{ClassEntity, EnumerationEntity, EnumerationGroup, PropertyEntity};
use crate::results::{Row, TaggedValue};

/// A map that iterates in first-insertion order.
#[derive(Debug, Clone)]
pub struct EntityMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for EntityMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> EntityMap<V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The value under `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Values in first-insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Applies `f` to every value, keeping keys and order.
    pub fn map<W>(self, mut f: impl FnMut(V) -> W) -> EntityMap<W> {
        EntityMap {
            entries: self.entries.into_iter().map(|(k, v)| (k, f(v))).collect(),
            index: self.index,
        }
    }
}

impl<V: Default> EntityMap<V> {
    /// The value under `key`, inserting a default one at the end if absent.
    pub fn entry(&mut self, key: &str) -> &mut V {
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => {
                self.entries.push((key.to_string(), V::default()));
                self.index.insert(key.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[i].1
    }
}

/// Reads formatted cells of one row.
pub struct RowReader<'a> {
    row: &'a Row,
    formatter: &'a ValueFormatter,
    diagnostics: &'a mut Diagnostics,
}

impl RowReader<'_> {
    /// Overwrites `target` with the formatted cell when it is bound.
    pub fn scalar(&mut self, column: &str, target: &mut String) {
        if let Some(value) = self.formatter.present_cell(self.row, column, self.diagnostics) {
            *target = value;
        }
    }

    /// Adds the formatted cell to `target` when it is bound.
    pub fn insert(&mut self, column: &str, target: &mut BTreeSet<String>) {
        if let Some(value) = self.formatter.present_cell(self.row, column, self.diagnostics) {
            target.insert(value);
        }
    }

    /// Overwrites `target` with the fragment identifier of an IRI cell.
    pub fn fragment(&mut self, column: &str, target: &mut String) {
        if let TaggedValue::Uri(iri) = self.row.get(column) {
            *target = self.formatter.fragment(iri);
        }
    }

    /// The formatted cell, "" if it degraded.
    pub fn text(&mut self, column: &str) -> String {
        self.formatter.format_cell(self.row, column, self.diagnostics)
    }

    /// Returns true if `column` holds an IRI or literal.
    pub fn has(&self, column: &str) -> bool {
        matches!(
            self.row.get(column),
            TaggedValue::Uri(_) | TaggedValue::Literal(_)
        )
    }
}

/// Accumulates the rows of one label into an entity.
pub trait EntityBuilder: Default {
    /// The frozen entity.
    type Entity;

    /// Column holding the aggregation key.
    const LABEL: &'static str;

    /// Column holding the IRI the entity describes, used to detect
    /// distinct resources sharing a label.
    const SOURCE: &'static str;

    /// Folds one row into the builder.
    fn absorb(&mut self, label: &str, row: &mut RowReader<'_>);

    /// Freezes the builder.
    fn build(self) -> Self::Entity;
}

/// Groups `rows` by `B::LABEL` and folds each group with `B`.
///
/// Rows without a label share the "" entry. Rows sharing a label but naming
/// different `B::SOURCE` IRIs are merged with a label-collision warning.
pub fn aggregate<B: EntityBuilder>(
    rows: &[Row],
    formatter: &ValueFormatter,
    diagnostics: &mut Diagnostics,
) -> EntityMap<B::Entity> {
    let mut builders: EntityMap<B> = EntityMap::new();
    let mut sources: EntityMap<BTreeSet<String>> = EntityMap::new();

    for row in rows {
        let label = match row.get(B::LABEL) {
            TaggedValue::Unbound => {
                diagnostics.warn(
                    DiagnosticKind::MissingLabel,
                    B::LABEL,
                    "row has no label, merged into the unlabeled entry",
                );
                String::new()
            }
            value => value.raw().to_string(),
        };

        if let TaggedValue::Uri(source) = row.get(B::SOURCE) {
            let seen = sources.entry(&label);
            if !seen.is_empty() && seen.insert(source.clone()) {
                diagnostics.warn(
                    DiagnosticKind::LabelCollision,
                    B::LABEL,
                    format!("`{label}` also labels <{source}>; merging"),
                );
            } else {
                seen.insert(source.clone());
            }
        }

        let mut reader = RowReader {
            row,
            formatter,
            diagnostics: &mut *diagnostics,
        };
        builders.entry(&label).absorb(&label, &mut reader);
    }

    tracing::debug!(
        rows = rows.len(),
        entities = builders.len(),
        column = B::LABEL,
        "aggregated rows"
    );
    builders.map(B::build)
}

/// Builds [`PropertyEntity`] values from concepts rows.
#[derive(Debug, Default)]
pub struct PropertyBuilder(PropertyEntity);

impl EntityBuilder for PropertyBuilder {
    type Entity = PropertyEntity;
    const LABEL: &'static str = "propertyLabel";
    const SOURCE: &'static str = "property";

    fn absorb(&mut self, label: &str, row: &mut RowReader<'_>) {
        let p = &mut self.0;
        p.label = label.to_string();
        row.scalar("propertyDefinition", &mut p.definition);
        row.scalar("property", &mut p.property);
        row.fragment("property", &mut p.fragment_identifier);
        row.insert("domain", &mut p.domains);
        row.insert("range", &mut p.ranges);
        row.insert("example", &mut p.examples);
    }

    fn build(self) -> PropertyEntity {
        self.0
    }
}

/// Builds [`ClassEntity`] values from concepts rows.
#[derive(Debug, Default)]
pub struct ClassBuilder(ClassEntity);

impl EntityBuilder for ClassBuilder {
    type Entity = ClassEntity;
    const LABEL: &'static str = "classLabel";
    const SOURCE: &'static str = "domain";

    fn absorb(&mut self, label: &str, row: &mut RowReader<'_>) {
        let c = &mut self.0;
        c.label = label.to_string();
        row.scalar("classDefinition", &mut c.definition);
        row.scalar("domain", &mut c.term);
        row.fragment("domain", &mut c.fragment_identifier);
        row.insert("property", &mut c.properties);
    }

    fn build(self) -> ClassEntity {
        self.0
    }
}

/// Builds [`EnumerationEntity`] values from enumerations rows.
#[derive(Debug, Default)]
pub struct EnumerationBuilder(EnumerationEntity);

impl EntityBuilder for EnumerationBuilder {
    type Entity = EnumerationEntity;
    const LABEL: &'static str = "enumerationLabel";
    const SOURCE: &'static str = "enumerationValue";

    fn absorb(&mut self, label: &str, row: &mut RowReader<'_>) {
        let e = &mut self.0;
        e.label = label.to_string();
        row.scalar("enumerationDefinition", &mut e.definition);
        row.scalar("enumerationValue", &mut e.term);
        row.fragment("enumerationValue", &mut e.fragment_identifier);
        row.insert("property", &mut e.properties);

        if row.has("group") {
            let mut group = EnumerationGroup {
                term: row.text("group"),
                label: row.text("groupLabel"),
                definition: row.text("groupDefinition"),
                ..Default::default()
            };
            row.fragment("group", &mut group.fragment_identifier);
            e.groups.insert(group);
        } else {
            // Still recorded as a diagnostic.
            row.text("group");
        }
    }

    fn build(self) -> EnumerationEntity {
        self.0
    }
}

/// Properties from concepts rows, keyed by label.
pub fn extract_properties(
    rows: &[Row],
    formatter: &ValueFormatter,
    diagnostics: &mut Diagnostics,
) -> EntityMap<PropertyEntity> {
    aggregate::<PropertyBuilder>(rows, formatter, diagnostics)
}

/// Classes from concepts rows, keyed by label.
pub fn extract_classes(
    rows: &[Row],
    formatter: &ValueFormatter,
    diagnostics: &mut Diagnostics,
) -> EntityMap<ClassEntity> {
    aggregate::<ClassBuilder>(rows, formatter, diagnostics)
}

/// Enumeration values from enumerations rows, keyed by label.
pub fn extract_enumerations(
    rows: &[Row],
    formatter: &ValueFormatter,
    diagnostics: &mut Diagnostics,
) -> EntityMap<EnumerationEntity> {
    aggregate::<EnumerationBuilder>(rows, formatter, diagnostics)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::format::PrefixRegistry;

    const EX: &str = "https://example.com/";

    fn formatter() -> ValueFormatter {
        let mut prefixes = PrefixRegistry::new();
        prefixes.bind("xsd", "http://www.w3.org/2001/XMLSchema#");
        prefixes.bind("schema", "https://schema.org/");
        ValueFormatter::new(EX, "/", prefixes)
    }

    fn uri(local: &str) -> TaggedValue {
        TaggedValue::Uri(format!("{EX}{local}"))
    }

    fn literal(text: &str) -> TaggedValue {
        TaggedValue::Literal(text.to_string())
    }

    fn concept(domain: &str, property: &str, range: TaggedValue) -> Row {
        Row::new()
            .with("domain", uri(domain))
            .with("classLabel", literal(domain))
            .with("property", uri(property))
            .with("propertyLabel", literal(property))
            .with("propertyDefinition", literal("A property."))
            .with("range", range)
    }

    #[test]
    fn properties_merge_domains_and_ranges() {
        let rows = vec![
            concept(
                "Person",
                "name",
                TaggedValue::Uri("http://www.w3.org/2001/XMLSchema#string".into()),
            ),
            concept("Organization", "name", TaggedValue::Uri("https://schema.org/Text".into())),
        ];
        let mut diagnostics = Diagnostics::new();
        let properties = extract_properties(&rows, &formatter(), &mut diagnostics);

        assert_eq!(properties.len(), 1);
        let name = properties.get("name").unwrap();
        assert_eq!(name.fragment_identifier, "name");
        assert_eq!(name.property, r##"<a href="#name">https://example.com/name</a>"##);
        assert_eq!(name.domains.len(), 2);
        assert!(name.ranges.contains(
            r#"<a href="http://www.w3.org/2001/XMLSchema#string">xsd:string</a>"#
        ));
        assert!(name.ranges.contains(r#"<a href="https://schema.org/Text">schema:Text</a>"#));
        // No example column.
        assert_eq!(diagnostics.count(DiagnosticKind::Unbound), 2);
    }

    #[test]
    fn classes_collect_their_properties() {
        let rows = vec![
            concept("Person", "name", TaggedValue::Unbound),
            concept("Person", "age", TaggedValue::Unbound),
            concept("Person", "name", TaggedValue::Unbound),
        ];
        let classes = extract_classes(&rows, &formatter(), &mut Diagnostics::new());
        let person = classes.get("Person").unwrap();
        assert_eq!(person.term, r##"<a href="#Person">https://example.com/Person</a>"##);
        assert_eq!(person.properties.len(), 2);
        assert_eq!(person.definition, "");
    }

    #[test]
    fn aggregation_is_idempotent() {
        let row = concept("Person", "name", literal("text"));
        let mut diagnostics = Diagnostics::new();
        let once = extract_properties(&[row.clone()], &formatter(), &mut diagnostics);
        let twice = extract_properties(&[row.clone(), row], &formatter(), &mut diagnostics);
        assert_eq!(once.get("name"), twice.get("name"));
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn unbound_scalars_do_not_erase_earlier_values() {
        let first = concept("Person", "name", TaggedValue::Unbound);
        let mut second = concept("Person", "name", TaggedValue::Unbound);
        second.bind("propertyDefinition", TaggedValue::Unbound);
        let properties = extract_properties(&[first, second], &formatter(), &mut Diagnostics::new());
        assert_eq!(properties.get("name").unwrap().definition, "A property.");
    }

    #[test]
    fn unlabeled_rows_share_the_empty_entry() {
        let mut a = concept("Person", "name", TaggedValue::Unbound);
        a.bind("propertyLabel", TaggedValue::Unbound);
        let mut b = concept("Person", "age", TaggedValue::Unbound);
        b.bind("propertyLabel", TaggedValue::Unbound);
        let mut diagnostics = Diagnostics::new();
        let properties = extract_properties(&[a, b], &formatter(), &mut diagnostics);
        assert_eq!(properties.len(), 1);
        assert_eq!(properties.get("").unwrap().label, "");
        assert_eq!(diagnostics.count(DiagnosticKind::MissingLabel), 2);
    }

    #[test]
    fn shared_labels_from_distinct_iris_are_flagged() {
        let a = concept("Person", "name", TaggedValue::Unbound);
        let b = concept("Person", "name", TaggedValue::Unbound).with("property", uri("other/name"));
        let mut diagnostics = Diagnostics::new();
        let properties = extract_properties(&[a.clone(), b, a], &formatter(), &mut diagnostics);
        assert_eq!(properties.len(), 1);
        assert_eq!(diagnostics.count(DiagnosticKind::LabelCollision), 1);
    }

    #[test]
    fn first_seen_order_is_kept() {
        let rows = ["zeta", "alpha", "mid", "alpha"]
            .map(|p| concept("Person", p, TaggedValue::Unbound));
        let properties = extract_properties(&rows, &formatter(), &mut Diagnostics::new());
        let labels: Vec<_> = properties.iter().map(|(k, _)| k).collect();
        assert_eq!(labels, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn enumerations_collect_groups_once_per_term() {
        let value = |group_label: &str| {
            Row::new()
                .with("enumerationValue", uri("Red"))
                .with("enumerationLabel", literal("Red"))
                .with("property", uri("color"))
                .with("group", uri("Color"))
                .with("groupLabel", literal(group_label))
        };
        let rows = vec![value("Color"), value("Colour")];
        let enumerations = extract_enumerations(&rows, &formatter(), &mut Diagnostics::new());
        let red = enumerations.get("Red").unwrap();
        assert_eq!(red.groups.len(), 1);
        let group = red.groups.iter().next().unwrap();
        assert_eq!(group.label, "Color");
        assert_eq!(group.fragment_identifier, "Color");
        assert_eq!(red.properties.len(), 1);
    }
}
