//! # Database Migration Management
//!
//! Schema evolution using SQL migrations embedded in the binary at compile time.
//! Each applied migration is recorded in `schema_migrations` together with a
//! checksum of its contents, so drift between the binary and the database can
//! be detected with [`validate_migrations`].

use crate::errors::{Error, Result};
use crate::storage::DbPool;
use serde::{Deserialize, Serialize};
use sqlx::Row;
use tracing::{error, info, warn};

/// Migrations in application order: `(name, sql)`. Names start with a numeric version.
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "20250101000001_create_users_table",
        include_str!("../../migrations/20250101000001_create_users_table.sql"),
    ),
    (
        "20250101000002_create_forms_table",
        include_str!("../../migrations/20250101000002_create_forms_table.sql"),
    ),
];

/// Migration information structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationInfo {
    pub version: i64,
    pub description: String,
    pub installed_on: chrono::DateTime<chrono::Utc>,
    pub execution_time: i64,
    pub checksum: Vec<u8>,
}

/// Run all pending database migrations
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    info!("Starting database migration process");

    create_migration_table(pool).await?;
    let applied = get_applied_migration_versions(pool).await?;

    let mut migrations_run = 0;
    for &(name, sql) in MIGRATIONS {
        let version = extract_version_from_filename(name)?;

        if applied.contains(&version) {
            info!(version = version, "Migration already applied: {}", name);
            continue;
        }

        info!(version = version, "Running migration: {}", name);
        let start_time = std::time::Instant::now();

        let mut tx = pool
            .begin()
            .await
            .map_err(|e| Error::database(e, "Failed to start migration transaction"))?;

        sqlx::raw_sql(sql).execute(&mut *tx).await.map_err(|e| {
            error!(error = %e, migration = name, "Migration failed");
            Error::database(e, format!("Migration failed: {}", name))
        })?;

        let execution_time = start_time.elapsed().as_millis() as i64;

        sqlx::query(
            "INSERT INTO schema_migrations (version, description, checksum, execution_time, installed_on) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(version)
        .bind(name)
        .bind(calculate_checksum(sql))
        .bind(execution_time)
        .bind(chrono::Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, migration = name, "Failed to record migration");
            Error::database(e, format!("Failed to record migration: {}", name))
        })?;

        tx.commit()
            .await
            .map_err(|e| Error::database(e, "Failed to commit migration transaction"))?;

        migrations_run += 1;
        info!(version = version, execution_time_ms = execution_time, "Migration completed: {}", name);
    }

    if migrations_run > 0 {
        info!(count = migrations_run, "Database migrations completed");
    } else {
        info!("No pending migrations");
    }

    Ok(())
}

async fn create_migration_table(pool: &DbPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            checksum BLOB NOT NULL,
            execution_time INTEGER NOT NULL,
            installed_on TEXT NOT NULL
        )
    "#,
    )
    .execute(pool)
    .await
    .map_err(|e| Error::database(e, "Failed to create migration tracking table"))?;

    Ok(())
}

fn is_missing_table(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.message().contains("no such table"))
}

async fn get_applied_migration_versions(pool: &DbPool) -> Result<Vec<i64>> {
    match sqlx::query("SELECT version FROM schema_migrations ORDER BY version")
        .fetch_all(pool)
        .await
    {
        Ok(rows) => Ok(rows.into_iter().map(|row| row.get::<i64, _>("version")).collect()),
        // first run, nothing recorded yet
        Err(e) if is_missing_table(&e) => Ok(Vec::new()),
        Err(e) => Err(Error::database(e, "Failed to get applied migrations")),
    }
}

fn extract_version_from_filename(filename: &str) -> Result<i64> {
    let version_str = filename
        .split('_')
        .next()
        .ok_or_else(|| Error::validation(format!("Invalid migration filename: {}", filename)))?;

    version_str
        .parse::<i64>()
        .map_err(|_| Error::validation(format!("Invalid version in filename: {}", filename)))
}

/// FNV-1a over the migration text; stable across builds and toolchains.
fn calculate_checksum(content: &str) -> Vec<u8> {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in content.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash.to_le_bytes().to_vec()
}

/// Check that exactly the embedded migrations are applied, with matching checksums
pub async fn validate_migrations(pool: &DbPool) -> Result<bool> {
    info!("Validating migration integrity");

    let applied = list_applied_migrations(pool).await?;
    let mut expected = Vec::with_capacity(MIGRATIONS.len());

    for &(name, sql) in MIGRATIONS {
        let version = extract_version_from_filename(name)?;
        expected.push(version);

        match applied.iter().find(|m| m.version == version) {
            None => {
                warn!(version = version, "Missing migration");
                return Ok(false);
            }
            Some(found) if found.checksum != calculate_checksum(sql) => {
                warn!(version = version, "Migration checksum mismatch");
                return Ok(false);
            }
            Some(_) => {}
        }
    }

    if let Some(unexpected) = applied.iter().find(|m| !expected.contains(&m.version)) {
        warn!(version = unexpected.version, "Unexpected migration found");
        return Ok(false);
    }

    info!("Migration validation successful");
    Ok(true)
}

/// Get the current migration version (highest applied)
pub async fn get_migration_version(pool: &DbPool) -> Result<i64> {
    let applied = get_applied_migration_versions(pool).await?;
    Ok(applied.into_iter().max().unwrap_or(0))
}

/// List all applied migrations
pub async fn list_applied_migrations(pool: &DbPool) -> Result<Vec<MigrationInfo>> {
    let rows = sqlx::query(
        "SELECT version, description, checksum, execution_time, installed_on FROM schema_migrations ORDER BY version",
    )
    .fetch_all(pool)
    .await;

    match rows {
        Ok(rows) => rows
            .into_iter()
            .map(|row| {
                Ok(MigrationInfo {
                    version: row.try_get("version")?,
                    description: row.try_get("description")?,
                    installed_on: row.try_get("installed_on")?,
                    execution_time: row.try_get("execution_time")?,
                    checksum: row.try_get("checksum")?,
                })
            })
            .collect::<std::result::Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| Error::database(e, "Failed to decode applied migrations")),
        Err(e) if is_missing_table(&e) => Ok(Vec::new()),
        Err(e) => Err(Error::database(e, "Failed to list applied migrations")),
    }
}
