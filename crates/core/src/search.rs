#![forbid(unsafe_code)]

use crate::record::{FieldSource, Record};
use crate::schema::{EntitySchema, SortOrder};

/// Exact-match filter on one field, applied after the search term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: String,
    pub value: String,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Parses `field=value`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (field, value) = raw.split_once('=')?;
        let field = field.trim();
        if field.is_empty() {
            return None;
        }
        Some(Self::new(field, value.trim()))
    }

    pub fn matches(&self, record: &impl FieldSource) -> bool {
        record.field_text(&self.field).unwrap_or("").trim() == self.value
    }
}

/// Case-insensitive substring match over the schema's searchable keys. The term is used
/// as typed; only the empty term matches everything.
pub fn matches_term(schema: &EntitySchema, record: &Record, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    schema
        .searchable
        .iter()
        .any(|key| key.render(record).to_lowercase().contains(&needle))
}

pub fn search<'a>(
    schema: &EntitySchema,
    records: &'a [Record],
    term: &str,
    filter: Option<&FieldFilter>,
) -> Vec<&'a Record> {
    let mut hits = records
        .iter()
        .filter(|record| matches_term(schema, record, term))
        .filter(|record| filter.is_none_or(|filter| filter.matches(*record)))
        .collect::<Vec<_>>();
    sort_records(schema.sort, &mut hits);
    hits
}

/// Stable; records with equal keys keep insertion order. Dates and times are compared as
/// text, which orders correctly for `YYYY-MM-DD` and `HH:MM`.
pub fn sort_records(order: SortOrder, records: &mut [&Record]) {
    match order {
        SortOrder::Insertion => {}
        SortOrder::DateTimeAscending { date, time } => records.sort_by(|a, b| {
            a.text(date)
                .cmp(b.text(date))
                .then_with(|| a.text(time).cmp(b.text(time)))
        }),
        SortOrder::DateDescending(date) => records.sort_by(|a, b| b.text(date).cmp(a.text(date))),
    }
}
