#![forbid(unsafe_code)]

use std::collections::BTreeMap;

/// Field name -> human readable message. Empty means valid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    by_field: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or overwrites) the message for `field`.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.by_field.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.by_field.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.by_field.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_field.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_field
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }
}
