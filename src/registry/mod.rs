//! Durable name → attendance record map consumed by the clock state machine.

use derive_more::{Display, From};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use crate::model::attendance::AttendanceRecord;

#[cfg(test)]
pub mod memory;
pub mod sqlite;

#[derive(Debug, Display, From)]
pub enum RegistryError {
    #[display(fmt = "database error: {}", _0)]
    #[from]
    Database(sqlx::Error),

    /// A versioned write lost a race against another writer for the same name.
    #[display(fmt = "concurrent update of {}", _0)]
    Conflict(String),

    #[display(fmt = "corrupt record for {}: {}", name, reason)]
    Corrupt { name: String, reason: String },

    #[display(fmt = "snapshot failed: {}", _0)]
    #[from]
    Io(std::io::Error),
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::Database(e) => Some(e),
            RegistryError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// A record together with the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stored {
    pub record: AttendanceRecord,
    pub version: i64,
}

pub trait ClockRegistry: Send + Sync {
    fn get(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Stored>, RegistryError>> + Send;

    /// `expected_version = None` inserts a new name; `Some(v)` updates only if
    /// the stored version is still `v`. Either way a lost race is
    /// `RegistryError::Conflict`. Returns the version now stored.
    fn upsert(
        &self,
        record: &AttendanceRecord,
        expected_version: Option<i64>,
    ) -> impl Future<Output = Result<i64, RegistryError>> + Send;

    /// All readable records, sorted by name. Rows that fail to decode are
    /// logged and left out.
    fn list_all(&self) -> impl Future<Output = Result<Vec<AttendanceRecord>, RegistryError>> + Send;
}

/// Consistent point-in-time copy of the whole registry.
pub trait Snapshot: Send + Sync {
    fn snapshot(&self, dest: &Path) -> impl Future<Output = Result<(), RegistryError>> + Send;
}

impl<R: ClockRegistry> ClockRegistry for Arc<R> {
    fn get(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Stored>, RegistryError>> + Send {
        (**self).get(name)
    }

    fn upsert(
        &self,
        record: &AttendanceRecord,
        expected_version: Option<i64>,
    ) -> impl Future<Output = Result<i64, RegistryError>> + Send {
        (**self).upsert(record, expected_version)
    }

    fn list_all(&self) -> impl Future<Output = Result<Vec<AttendanceRecord>, RegistryError>> + Send {
        (**self).list_all()
    }
}
