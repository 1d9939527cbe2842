#![forbid(unsafe_code)]

use thiserror::Error;
use vc_core::validate::ValidationErrors;
use vc_storage::StoreError;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("no record is being edited")]
    NotComposing,
    #[error("no {entity} with id {id}")]
    UnknownRecord { entity: &'static str, id: String },
    #[error("{entity} has no field `{field}`")]
    UnknownField { entity: &'static str, field: String },
    #[error("field `{0}` is filled from the referenced record and cannot be edited")]
    ReadOnlyField(String),
    #[error("field `{0}` holds a selection; toggle members instead")]
    GroupField(String),
    #[error("{0} records have no member selection")]
    NotAGroup(&'static str),
    #[error("a save is already in progress")]
    SaveInFlight,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("unknown entity `{0}` (see `vc_console entities`)")]
    UnknownEntity(String),
    #[error("invalid record id: {0}")]
    InvalidId(&'static str),
    #[error("{0}")]
    UnknownSetting(String),
    #[error("expected field=value, got `{0}`")]
    InvalidAssignment(String),
    #[error("validation failed")]
    Rejected(ValidationErrors),
    #[error("save was cancelled")]
    Cancelled,
    #[error(transparent)]
    Controller(#[from] ControllerError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
