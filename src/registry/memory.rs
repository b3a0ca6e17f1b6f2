use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ClockRegistry, RegistryError, Stored};
use crate::model::attendance::AttendanceRecord;

/// In-process registry for tests. Every call yields once so concurrent
/// callers interleave between the read and the write.
#[derive(Default)]
pub struct MemoryRegistry {
    records: Mutex<HashMap<String, Stored>>,
    reads: AtomicUsize,
    fail_writes: bool,
}

impl MemoryRegistry {
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn peek(&self, name: &str) -> Option<Stored> {
        self.records
            .lock()
            .expect("registry poisoned")
            .get(name)
            .cloned()
    }

    pub fn seed(&self, record: AttendanceRecord) {
        self.records.lock().expect("registry poisoned").insert(
            record.name().to_string(),
            Stored {
                record,
                version: 1,
            },
        );
    }
}

impl ClockRegistry for MemoryRegistry {
    async fn get(&self, name: &str) -> Result<Option<Stored>, RegistryError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(self.peek(name))
    }

    async fn upsert(
        &self,
        record: &AttendanceRecord,
        expected_version: Option<i64>,
    ) -> Result<i64, RegistryError> {
        tokio::task::yield_now().await;
        if self.fail_writes {
            return Err(RegistryError::Io(std::io::Error::other("disk full")));
        }

        let mut records = self.records.lock().expect("registry poisoned");
        let current = records.get(record.name()).map(|s| s.version);
        if current != expected_version {
            return Err(RegistryError::Conflict(record.name().to_string()));
        }

        let version = expected_version.unwrap_or(0) + 1;
        records.insert(
            record.name().to_string(),
            Stored {
                record: record.clone(),
                version,
            },
        );
        Ok(version)
    }

    async fn list_all(&self) -> Result<Vec<AttendanceRecord>, RegistryError> {
        let mut all: Vec<_> = self
            .records
            .lock()
            .expect("registry poisoned")
            .values()
            .map(|s| s.record.clone())
            .collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(all)
    }
}
