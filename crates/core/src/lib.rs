#![forbid(unsafe_code)]

pub mod catalog;
pub mod ids;
pub mod record;
pub mod resolve;
pub mod schema;
pub mod search;
pub mod settings;
pub mod summary;
pub mod validate;

pub use ids::{RecordId, RecordIdError};
pub use record::{Draft, FieldSource, FieldValue, Fields, Record};
pub use schema::{EntityKind, EntitySchema, FieldKind, FieldRef};
pub use settings::{ClinicInfo, ClinicInfoError};
