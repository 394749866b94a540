//! Partitioning enumeration values by the group they belong to.

use std::collections::BTreeMap;

use crate::aggregate::EntityMap;
use crate::model::{by_label, EnumerationEntity, EnumerationGroup, GroupedEnumerations};

/// Inverts the value-to-group relation.
///
/// Each value appears once under every group term it declares. Within a group
/// the values are sorted by label.
pub fn group_enumerations(
    enumerations: &EntityMap<EnumerationEntity>,
) -> BTreeMap<String, GroupedEnumerations> {
    let mut buckets: BTreeMap<&str, (&EnumerationGroup, Vec<&EnumerationEntity>)> =
        BTreeMap::new();
    for enumeration in enumerations.values() {
        for group in &enumeration.groups {
            buckets
                .entry(group.term.as_str())
                .or_insert_with(|| (group, Vec::new()))
                .1
                .push(enumeration);
        }
    }

    buckets
        .into_iter()
        .map(|(term, (group, mut members))| {
            members.sort_by(|a, b| by_label(a, b));
            let grouped = GroupedEnumerations {
                term: term.to_string(),
                label: group.label.clone(),
                fragment_identifier: group.fragment_identifier.clone(),
                definition: group.definition.clone(),
                enumerations: members.into_iter().map(EnumerationEntity::record).collect(),
            };
            (term.to_string(), grouped)
        })
        .collect()
}
