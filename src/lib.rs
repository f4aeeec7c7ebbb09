//! # Realty - real-estate record keeping
//!
//! Form-backed records for a small real-estate office.
//!
//! Realty provides:
//! - A SQLite schema of nine tables (addresses, persons, owner/agent/client
//!   roles, locations, properties, contracts, payments) with enforced
//!   foreign keys
//! - A repository layer: typed inserts, a fixed per-kind `create`
//!   dispatcher, and denormalized `list_with_relations` joins
//! - Destructive setup and fixture seeding
//! - An HTML-over-HTTP front end with one listing and one create route per
//!   entity

pub mod entity;
pub mod model;
pub mod record;
pub mod storage;
pub mod setup;
pub mod server;
pub mod output;
pub mod config;
pub mod ui;


// Re-exports for convenient access
pub use entity::EntityKind;
pub use model::{Fields, NewRecord, RoleDetails};
pub use record::{Listing, Record, RefOption, Value};
pub use storage::SqliteStore;

/// Result type alias for Realty operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Realty operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A foreign key or NOT NULL constraint was rejected by the store
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The store could not be opened or reached
    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    #[error("Missing required field '{field}' for {entity}")]
    MissingField { entity: EntityKind, field: &'static str },

    #[error("Invalid value for {entity}.{field}: {reason}")]
    InvalidField {
        entity: EntityKind,
        field: &'static str,
        reason: String,
    },

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Storage error: {0}")]
    Storage(#[source] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ErrorCode;

        match &err {
            rusqlite::Error::SqliteFailure(code, message)
                if code.code == ErrorCode::ConstraintViolation =>
            {
                Error::ConstraintViolation(message.clone().unwrap_or_else(|| code.to_string()))
            }
            rusqlite::Error::SqliteFailure(code, message)
                if matches!(
                    code.code,
                    ErrorCode::CannotOpen
                        | ErrorCode::NotADatabase
                        | ErrorCode::PermissionDenied
                        | ErrorCode::DatabaseBusy
                        | ErrorCode::DatabaseLocked
                ) =>
            {
                Error::ConnectionFailure(message.clone().unwrap_or_else(|| code.to_string()))
            }
            _ => Error::Storage(err),
        }
    }
}
