use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

pub async fn init_db(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("invalid DATABASE_URL {database_url}"))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    init_schema(&pool).await?;
    Ok(pool)
}

/// Creates the `employees` table and upgrades tables created before
/// records were versioned.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            name TEXT PRIMARY KEY,
            status TEXT,
            in_time TEXT,
            out_time TEXT,
            last_clock_in_time TEXT,
            last_clock_out_time TEXT,
            version INTEGER NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create employees table")?;

    let has_version = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM pragma_table_info('employees') WHERE name = 'version'",
    )
    .fetch_one(pool)
    .await
    .context("Failed to inspect employees table")?;

    if has_version == 0 {
        sqlx::query("ALTER TABLE employees ADD COLUMN version INTEGER NOT NULL DEFAULT 1")
            .execute(pool)
            .await
            .context("Failed to add version column")?;
        info!("employees table upgraded with version column");
    }

    Ok(())
}
