#![forbid(unsafe_code)]

use serde_json::{Value, json};
use vc_core::resolve::GroupMember;
use vc_core::schema::{FieldDefault, FieldKind};
use vc_core::summary::{FinanceSummary, StockLevel};
use vc_core::validate::ValidationErrors;
use std::path::Path;
use vc_core::{ClinicInfo, EntityKind, EntitySchema, Record};
use vc_storage::{CollectionRow, encode_clinic_info, encode_collection};

pub fn records_json(schema: &EntitySchema, records: &[Record]) -> Value {
    encode_collection(schema, records)
}

pub fn record_json(schema: &EntitySchema, record: &Record) -> Value {
    match encode_collection(schema, std::slice::from_ref(record)) {
        Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
        _ => Value::Null,
    }
}

pub fn members_json(members: &[GroupMember]) -> Value {
    Value::Array(
        members
            .iter()
            .map(|member| {
                json!({
                    "id": member.id.as_str(),
                    "label": member.label,
                    "missing": member.label.is_none(),
                })
            })
            .collect(),
    )
}

pub fn errors_json(errors: &ValidationErrors) -> Value {
    Value::Object(
        errors
            .iter()
            .map(|(field, message)| (field.to_string(), Value::String(message.to_string())))
            .collect(),
    )
}

pub fn entities_json() -> Value {
    Value::Array(
        EntityKind::ALL
            .into_iter()
            .map(|kind| schema_json(kind.schema()))
            .collect(),
    )
}

fn schema_json(schema: &EntitySchema) -> Value {
    let fields = schema
        .fields
        .iter()
        .map(|field| {
            let mut entry = json!({
                "name": field.name,
                "kind": kind_name(field.kind),
                "required": field.required,
                "read_only": schema.is_projected(field.name),
            });
            if let FieldKind::Choice(options) = field.kind {
                entry["options"] = json!(options);
            }
            if let FieldDefault::Literal(value) = field.default {
                entry["default"] = json!(value);
            }
            entry
        })
        .collect::<Vec<_>>();
    let references = schema
        .references
        .iter()
        .map(|reference| {
            json!({
                "field": reference.field,
                "source": reference.source.as_str(),
            })
        })
        .collect::<Vec<_>>();
    json!({
        "entity": schema.kind.as_str(),
        "name": schema.singular,
        "collection": schema.collection_key,
        "id_field": schema.id_field,
        "fields": fields,
        "references": references,
        "group": schema.group.map(|group| json!({
            "field": group.field,
            "target": group.target.as_str(),
            "min_selected": group.min_selected,
        })),
    })
}

fn kind_name(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text => "text",
        FieldKind::PersonName => "person_name",
        FieldKind::Integer => "integer",
        FieldKind::Decimal => "decimal",
        FieldKind::Date => "date",
        FieldKind::Time => "time",
        FieldKind::Phone => "phone",
        FieldKind::PostalCode => "postal_code",
        FieldKind::Email => "email",
        FieldKind::NationalId => "national_id",
        FieldKind::Choice(_) => "choice",
        FieldKind::Reference => "reference",
        FieldKind::IdSet => "id_set",
    }
}

pub fn finance_json(summary: &FinanceSummary) -> Value {
    json!({
        "income": summary.income,
        "expenses": summary.expenses,
        "balance": summary.balance(),
        "skipped": summary.skipped,
    })
}

pub fn stock_json(rows: &[(Record, Option<StockLevel>)]) -> Value {
    Value::Array(
        rows.iter()
            .map(|(product, level)| {
                json!({
                    "id": product.id().as_str(),
                    "nome": product.text("nome"),
                    "quantidade": product.text("quantidade"),
                    "quantidade_minima": product.text("quantidade_minima"),
                    "level": level.map(StockLevel::as_str),
                })
            })
            .collect(),
    )
}

pub fn clinic_info_json(info: &ClinicInfo) -> Value {
    encode_clinic_info(info)
}

pub fn storage_json(db_path: &Path, rows: &[CollectionRow]) -> Value {
    json!({
        "database": db_path.display().to_string(),
        "collections": rows
            .iter()
            .map(|row| {
                json!({
                    "key": row.key,
                    "revision": row.revision,
                    "records": row.record_count,
                    "updated_at_ms": row.updated_at_ms,
                })
            })
            .collect::<Vec<_>>(),
    })
}
