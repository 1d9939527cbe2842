#![forbid(unsafe_code)]

use std::fmt;

const MAX_RECORD_ID_LEN: usize = 128;

/// Identifier assigned to a record when it is first persisted. Never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn generate() -> Self {
        Self(ulid::Ulid::new().to_string().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn try_new(value: impl Into<String>) -> Result<Self, RecordIdError> {
        let value = value.into();
        validate_record_id(&value)?;
        Ok(Self(value.trim().to_string()))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordIdError {
    Empty,
    TooLong,
    ContainsControl,
}

impl RecordIdError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "record id must not be empty",
            Self::TooLong => "record id is too long",
            Self::ContainsControl => "record id contains control characters",
        }
    }
}

fn validate_record_id(value: &str) -> Result<(), RecordIdError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RecordIdError::Empty);
    }
    if trimmed.len() > MAX_RECORD_ID_LEN {
        return Err(RecordIdError::TooLong);
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(RecordIdError::ContainsControl);
    }
    Ok(())
}
