#![forbid(unsafe_code)]

use serde_json::{Map, Value};
use std::collections::BTreeSet;
use vc_core::settings::CLINIC_INFO_FIELDS;
use vc_core::{ClinicInfo, EntitySchema, FieldValue, Fields, Record, RecordId};

/// Parses a persisted collection. Numbers (legacy millisecond ids, ages, amounts) become
/// text; arrays become id sets; `null` becomes empty text. The error is a human readable
/// detail for [`super::StoreError::CorruptCollection`].
pub fn decode_collection(schema: &EntitySchema, raw: &str) -> Result<Vec<Record>, String> {
    let value: Value = serde_json::from_str(raw).map_err(|err| format!("invalid json: {err}"))?;
    let Value::Array(items) = value else {
        return Err("expected a JSON array of records".to_string());
    };

    let mut seen = BTreeSet::new();
    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let Value::Object(object) = item else {
            return Err(format!("element {index} is not an object"));
        };
        let record = decode_record(schema, object)
            .map_err(|detail| format!("element {index}: {detail}"))?;
        if !seen.insert(record.id().clone()) {
            return Err(format!("element {index}: duplicate id {}", record.id()));
        }
        records.push(record);
    }
    Ok(records)
}

fn decode_record(schema: &EntitySchema, object: Map<String, Value>) -> Result<Record, String> {
    let mut id = None;
    let mut fields = Fields::new();
    for (name, value) in object {
        if name == schema.id_field {
            let raw = scalar_text(&value).ok_or_else(|| format!("{name} is not a scalar"))?;
            let parsed =
                RecordId::try_new(raw).map_err(|err| format!("{name}: {}", err.message()))?;
            id = Some(parsed);
            continue;
        }
        let decoded = match value {
            Value::Array(items) => {
                let ids = items
                    .iter()
                    .map(|item| {
                        scalar_text(item)
                            .and_then(|raw| RecordId::try_new(raw).ok())
                            .ok_or_else(|| format!("{name} holds a non-id element"))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                FieldValue::IdSet(ids)
            }
            Value::Object(_) => return Err(format!("{name} has an unsupported nested object")),
            other => FieldValue::text(scalar_text(&other).unwrap_or_default()),
        };
        fields.insert(name, decoded);
    }
    let id = id.ok_or_else(|| format!("missing {}", schema.id_field))?;
    Ok(Record::new(id, fields))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

pub fn encode_collection(schema: &EntitySchema, records: &[Record]) -> Value {
    Value::Array(
        records
            .iter()
            .map(|record| {
                let mut object = Map::new();
                for (name, value) in record.fields() {
                    let encoded = match value {
                        FieldValue::Text(text) => Value::String(text.clone()),
                        FieldValue::IdSet(ids) => Value::Array(
                            ids.iter()
                                .map(|id| Value::String(id.to_string()))
                                .collect(),
                        ),
                    };
                    object.insert(name.clone(), encoded);
                }
                object.insert(
                    schema.id_field.to_string(),
                    Value::String(record.id().to_string()),
                );
                Value::Object(object)
            })
            .collect(),
    )
}

/// Parses the clinic settings document. Known fields that are absent or `null` come back
/// empty; unknown keys are ignored.
pub fn decode_clinic_info(raw: &str) -> Result<ClinicInfo, String> {
    let value: Value = serde_json::from_str(raw).map_err(|err| format!("invalid json: {err}"))?;
    let Value::Object(object) = value else {
        return Err("expected a JSON object".to_string());
    };
    let mut info = ClinicInfo::blank();
    for name in CLINIC_INFO_FIELDS {
        let Some(value) = object.get(name) else {
            continue;
        };
        let text = scalar_text(value).ok_or_else(|| format!("{name} is not a scalar"))?;
        info.set(name, text).map_err(|err| err.message())?;
    }
    Ok(info)
}

pub fn encode_clinic_info(info: &ClinicInfo) -> Value {
    Value::Object(
        info.entries()
            .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
            .collect(),
    )
}
