#![forbid(unsafe_code)]

mod checks;
mod errors;
mod masks;
mod national_id;

pub use checks::*;
pub use errors::*;
pub use masks::*;
pub use national_id::*;

use crate::record::{Draft, FieldSource};
use crate::schema::{EntitySchema, FieldKind, FieldSpec};

pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Flags every named field that is absent or blank after trimming.
pub fn required_fields(draft: &Draft, names: &[&str]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for name in names {
        let missing = draft.get(name).is_none_or(|value| value.is_blank());
        if missing {
            errors.insert(*name, REQUIRED_MESSAGE);
        }
    }
    errors
}

/// Every synchronous check the schema declares. The external national-id lookup is not
/// part of this; callers layer its verdict on top with [`apply_national_id_verdict`].
pub fn validate_draft(schema: &EntitySchema, draft: &Draft) -> ValidationErrors {
    let required = schema
        .fields
        .iter()
        .filter(|field| field.required && field.kind != FieldKind::IdSet)
        .map(|field| field.name)
        .collect::<Vec<_>>();
    let mut errors = required_fields(draft, &required);

    for field in schema.fields {
        if let Some(message) = check_field(field, draft) {
            errors.insert(field.name, message);
        }
    }

    if let Some(group) = schema.group {
        if draft.id_set(group.field).len() < group.min_selected {
            errors.insert(group.error_key, group.error_message);
        }
    }

    errors
}

fn check_field(field: &FieldSpec, draft: &Draft) -> Option<String> {
    let value = draft.field_text(field.name)?;
    if value.trim().is_empty() {
        return None;
    }
    let ok = match field.kind {
        FieldKind::Text | FieldKind::Reference | FieldKind::IdSet => true,
        FieldKind::PersonName => has_no_digits(value),
        FieldKind::Integer => is_integer(value),
        FieldKind::Decimal => is_decimal(value),
        FieldKind::Date => is_iso_date(value),
        FieldKind::Time => is_clock_time(value),
        FieldKind::Phone => phone_ok(value),
        FieldKind::PostalCode => postal_code_ok(value),
        FieldKind::Email => email_ok(value),
        FieldKind::NationalId => national_id_format_ok(value),
        FieldKind::Choice(options) => options.contains(&value.trim()),
    };
    if ok {
        return None;
    }
    Some(match field.kind {
        FieldKind::Choice(options) => format!("Must be one of: {}.", options.join(", ")),
        kind => kind_message(kind).to_string(),
    })
}

fn kind_message(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::PersonName => "Must not contain digits.",
        FieldKind::Integer => "Must be a whole number.",
        FieldKind::Decimal => "Must be a number.",
        FieldKind::Date => "Must be a date (YYYY-MM-DD).",
        FieldKind::Time => "Must be a time (HH:MM).",
        FieldKind::Phone => "Phone number is invalid.",
        FieldKind::PostalCode => "Postal code (CEP) is invalid.",
        FieldKind::Email => "Email is invalid.",
        FieldKind::NationalId => NATIONAL_ID_INVALID_MESSAGE,
        FieldKind::Text | FieldKind::Reference | FieldKind::IdSet | FieldKind::Choice(_) => {
            "Invalid value."
        }
    }
}

#[cfg(test)]
mod tests;
