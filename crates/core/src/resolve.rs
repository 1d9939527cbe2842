#![forbid(unsafe_code)]

use crate::ids::RecordId;
use crate::record::{Draft, FieldSource, FieldValue, Record};
use crate::schema::{EntityKind, FieldRef, GroupSpec, Projection, ReferenceSpec};
use std::collections::BTreeMap;

/// Collections other controllers own, looked up by entity.
pub trait ReferenceLookup {
    fn collection(&self, kind: EntityKind) -> &[Record];
}

impl ReferenceLookup for BTreeMap<EntityKind, Vec<Record>> {
    fn collection(&self, kind: EntityKind) -> &[Record] {
        self.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

pub fn resolve_by_id<'a>(collection: &'a [Record], id: &str) -> Option<&'a Record> {
    let id = id.trim();
    collection.iter().find(|record| record.id().as_str() == id)
}

/// First record whose `field` renders to `value`. Ambiguous natural keys resolve to the
/// earliest match.
pub fn resolve_by_natural_key<'a>(
    collection: &'a [Record],
    field: FieldRef,
    value: &str,
) -> Option<&'a Record> {
    collection
        .iter()
        .find(|record| field.render(*record) == value)
}

pub fn project(
    source: &impl FieldSource,
    projections: &[Projection],
) -> Vec<(&'static str, FieldValue)> {
    projections
        .iter()
        .map(|projection| {
            (
                projection.to,
                FieldValue::text(projection.from.render(source)),
            )
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Dependent fields were overwritten from the source record.
    Projected { fields: Vec<&'static str> },
    /// The id matched nothing; dependent fields were left alone.
    Unresolved,
}

/// Copies dependent fields into `draft` from the record the reference field points at.
/// The reference field itself is expected to already hold the new id.
pub fn apply_reference(
    draft: &mut Draft,
    spec: &ReferenceSpec,
    tables: &impl ReferenceLookup,
) -> ResolveOutcome {
    let id = draft.field_text(spec.field).unwrap_or("").to_string();
    let Some(source) = resolve_by_id(tables.collection(spec.source), &id) else {
        return ResolveOutcome::Unresolved;
    };

    let mut written = Vec::new();
    for (name, value) in project(source, spec.projections) {
        draft.set(name, value);
        written.push(name);
    }

    if let Some(follow) = spec.follow {
        let next = source.text(follow.via);
        if let Some(second) = resolve_by_id(tables.collection(follow.source), next) {
            for (name, value) in project(second, follow.projections) {
                draft.set(name, value);
                written.push(name);
            }
        }
    }

    ResolveOutcome::Projected { fields: written }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupMember {
    pub id: RecordId,
    /// `None` when the id no longer matches any record.
    pub label: Option<String>,
}

pub fn dereference_group(
    record: &impl FieldSource,
    group: &GroupSpec,
    targets: &[Record],
) -> Vec<GroupMember> {
    let ids = record
        .field(group.field)
        .and_then(FieldValue::as_id_set)
        .unwrap_or(&[]);
    ids.iter()
        .map(|id| GroupMember {
            id: id.clone(),
            label: resolve_by_id(targets, id.as_str())
                .map(|target| group.target_label.render(target)),
        })
        .collect()
}
