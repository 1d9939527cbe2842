#![forbid(unsafe_code)]

mod store;

pub use store::{
    CollectionRow, SqliteStore, StoreError, decode_clinic_info, decode_collection,
    encode_clinic_info, encode_collection,
};
