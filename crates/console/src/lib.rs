#![forbid(unsafe_code)]

pub mod clinic;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod notice;
pub mod output;
pub mod record_store;
pub mod verifier;

pub use clinic::{Clinic, LookupTables};
pub use config::ConsoleConfig;
pub use controller::{Composition, Controller, ControllerState, SaveOutcome};
pub use error::{ConsoleError, ControllerError};
pub use notice::{Notice, NoticeAction};
pub use record_store::{CollectionSnapshot, CorruptPolicy, RecordStore, SharedStore};
pub use verifier::{HttpVerifier, NationalIdVerifier, OfflineVerifier};
