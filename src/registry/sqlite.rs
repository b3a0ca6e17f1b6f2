use chrono::FixedOffset;
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

use super::{ClockRegistry, RegistryError, Snapshot, Stored};
use crate::model::attendance::{AttendanceRecord, RecordStatus, Timestamp};
use crate::utils::time::{parse_stored, to_stored};

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    name: String,
    status: Option<String>,
    in_time: Option<String>,
    out_time: Option<String>,
    last_clock_in_time: Option<String>,
    last_clock_out_time: Option<String>,
    version: i64,
}

/// `employees` table backed registry. Naive timestamps from older rows are
/// read in `offset`; everything written carries an explicit offset.
#[derive(Clone)]
pub struct SqliteRegistry {
    pool: SqlitePool,
    offset: FixedOffset,
}

impl SqliteRegistry {
    pub fn new(pool: SqlitePool, offset: FixedOffset) -> Self {
        Self { pool, offset }
    }

    fn decode(&self, row: EmployeeRow) -> Result<Stored, RegistryError> {
        let corrupt = |name: &str, reason: &str| RegistryError::Corrupt {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let status = row
            .status
            .as_deref()
            .and_then(|s| RecordStatus::from_str(s).ok())
            .ok_or_else(|| corrupt(&row.name, "unknown status"))?;

        let ts = |field: &Option<String>| -> Result<Option<Timestamp>, RegistryError> {
            match field {
                None => Ok(None),
                Some(raw) => parse_stored(raw, self.offset)
                    .map(Some)
                    .ok_or_else(|| corrupt(&row.name, "unparseable timestamp")),
            }
        };

        let in_time = ts(&row.in_time)?;
        let out_time = ts(&row.out_time)?;
        let last_in = ts(&row.last_clock_in_time)?;
        let last_out = ts(&row.last_clock_out_time)?;

        let record = AttendanceRecord::from_parts(
            row.name.clone(),
            status,
            in_time,
            out_time,
            last_in,
            last_out,
        )
        .map_err(|reason| corrupt(&row.name, reason))?;

        Ok(Stored {
            record,
            version: row.version,
        })
    }
}

impl ClockRegistry for SqliteRegistry {
    async fn get(&self, name: &str) -> Result<Option<Stored>, RegistryError> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT name, status, in_time, out_time, last_clock_in_time, last_clock_out_time, version
            FROM employees
            WHERE name = ?
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| self.decode(r)).transpose()
    }

    async fn upsert(
        &self,
        record: &AttendanceRecord,
        expected_version: Option<i64>,
    ) -> Result<i64, RegistryError> {
        let status = record.status().as_ref().to_string();
        let in_time = to_stored(&record.in_time());
        let out_time = record.out_time().map(|t| to_stored(&t));
        let last_in = to_stored(&record.last_clock_in_time());
        let last_out = record.last_clock_out_time().map(|t| to_stored(&t));

        let (result, new_version) = match expected_version {
            None => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO employees
                        (name, status, in_time, out_time, last_clock_in_time, last_clock_out_time, version)
                    VALUES (?, ?, ?, ?, ?, ?, 1)
                    ON CONFLICT(name) DO NOTHING
                    "#,
                )
                .bind(record.name())
                .bind(status)
                .bind(in_time)
                .bind(out_time)
                .bind(last_in)
                .bind(last_out)
                .execute(&self.pool)
                .await?;
                (result, 1)
            }
            Some(version) => {
                let result = sqlx::query(
                    r#"
                    UPDATE employees SET
                        status = ?,
                        in_time = ?,
                        out_time = ?,
                        last_clock_in_time = ?,
                        last_clock_out_time = ?,
                        version = version + 1
                    WHERE name = ? AND version = ?
                    "#,
                )
                .bind(status)
                .bind(in_time)
                .bind(out_time)
                .bind(last_in)
                .bind(last_out)
                .bind(record.name())
                .bind(version)
                .execute(&self.pool)
                .await?;
                (result, version + 1)
            }
        };

        if result.rows_affected() == 0 {
            return Err(RegistryError::Conflict(record.name().to_string()));
        }

        debug!(name = record.name(), version = new_version, "record written");
        Ok(new_version)
    }

    async fn list_all(&self) -> Result<Vec<AttendanceRecord>, RegistryError> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT name, status, in_time, out_time, last_clock_in_time, last_clock_out_time, version
            FROM employees
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match self.decode(row) {
                Ok(stored) => records.push(stored.record),
                Err(RegistryError::Corrupt { name, reason }) => {
                    warn!(%name, %reason, "skipping corrupt attendance row");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(records)
    }
}

impl Snapshot for SqliteRegistry {
    /// `VACUUM INTO` copies a transactionally consistent image without
    /// holding writers for longer than the copy itself.
    async fn snapshot(&self, dest: &Path) -> Result<(), RegistryError> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let target = dest.to_string_lossy().replace('\'', "''");
        sqlx::query(&format!("VACUUM INTO '{}'", target))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
