#![forbid(unsafe_code)]

use crate::ids::RecordId;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    IdSet(Vec<RecordId>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::IdSet(_) => None,
        }
    }

    pub fn as_id_set(&self) -> Option<&[RecordId]> {
        match self {
            Self::Text(_) => None,
            Self::IdSet(ids) => Some(ids),
        }
    }

    /// Absent-equivalent: whitespace-only text or an empty id set.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(value) => value.trim().is_empty(),
            Self::IdSet(ids) => ids.is_empty(),
        }
    }
}

pub type Fields = BTreeMap<String, FieldValue>;

/// Read access shared by persisted records and pending drafts.
pub trait FieldSource {
    fn field(&self, name: &str) -> Option<&FieldValue>;

    fn field_text(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(FieldValue::as_text)
    }
}

/// Pending, not yet persisted field values of a record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Draft {
    fields: Fields,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: Fields) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn set_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.set(name, FieldValue::text(value));
    }

    pub fn id_set(&self, name: &str) -> &[RecordId] {
        self.fields
            .get(name)
            .and_then(FieldValue::as_id_set)
            .unwrap_or(&[])
    }

    /// Adds `id` to the set stored under `name`, or removes it when already present.
    /// Returns whether the id is a member afterwards.
    pub fn toggle_member(&mut self, name: &str, id: RecordId) -> bool {
        let entry = self
            .fields
            .entry(name.to_string())
            .or_insert_with(|| FieldValue::IdSet(Vec::new()));
        if let FieldValue::Text(_) = entry {
            *entry = FieldValue::IdSet(Vec::new());
        }
        let FieldValue::IdSet(ids) = entry else {
            return false;
        };
        if let Some(pos) = ids.iter().position(|existing| existing == &id) {
            ids.remove(pos);
            false
        } else {
            ids.push(id);
            true
        }
    }
}

impl FieldSource for Draft {
    fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// A persisted record: its identifier plus field values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    id: RecordId,
    fields: Fields,
}

impl Record {
    pub fn new(id: RecordId, fields: Fields) -> Self {
        Self { id, fields }
    }

    pub fn from_draft(id: RecordId, draft: Draft) -> Self {
        Self {
            id,
            fields: draft.into_fields(),
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn text(&self, name: &str) -> &str {
        self.field_text(name).unwrap_or("")
    }

    pub fn to_draft(&self) -> Draft {
        Draft::from_fields(self.fields.clone())
    }
}

impl FieldSource for Record {
    fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}
