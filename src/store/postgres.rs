use anyhow::{anyhow, Context, Result};
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, PgPool, Row};

use crate::model::{CanonicalPair, CombinationRecord, InsertOutcome};
use crate::store::traits::{CombinationStore, Store};

const CREATE_COMBINATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS combinations (
        element_a TEXT NOT NULL,
        element_b TEXT NOT NULL,
        result_label TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        PRIMARY KEY (element_a, element_b),
        CHECK (element_a <= element_b COLLATE "C")
    )
"#;

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Create the `combinations` table if it does not exist yet
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(CREATE_COMBINATIONS_TABLE)
            .execute(&self.pool)
            .await
            .context("Failed to create combinations table")?;
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn record_from_row(row: &PgRow) -> Result<CombinationRecord> {
    Ok(CombinationRecord {
        element_a: row.try_get("element_a")?,
        element_b: row.try_get("element_b")?,
        result_label: row.try_get("result_label")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait::async_trait]
impl CombinationStore for PostgresStore {
    async fn get_combination(&self, key: &CanonicalPair) -> Result<Option<CombinationRecord>> {
        let row = sqlx::query(
            "SELECT element_a, element_b, result_label, created_at FROM combinations WHERE element_a = $1 AND element_b = $2",
        )
        .bind(&key.low)
        .bind(&key.high)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch combination")?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn insert_if_absent(&self, record: CombinationRecord) -> Result<InsertOutcome> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO combinations (element_a, element_b, result_label, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (element_a, element_b) DO NOTHING
            RETURNING element_a, element_b, result_label, created_at
            "#,
        )
        .bind(&record.element_a)
        .bind(&record.element_b)
        .bind(&record.result_label)
        .bind(record.created_at)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to insert combination")?;

        if let Some(row) = inserted {
            return Ok(InsertOutcome::Inserted(record_from_row(&row)?));
        }

        // Conflict: a separate statement sees the committed winner.
        let key = record.key();
        let existing = self
            .get_combination(&key)
            .await?
            .ok_or_else(|| anyhow!("combination {} conflicted on insert but is not readable", key))?;
        Ok(InsertOutcome::AlreadyPresent(existing))
    }

    async fn list_combinations(&self, limit: Option<usize>) -> Result<Vec<CombinationRecord>> {
        let limit = limit.map(|l| l.min(i64::MAX as usize) as i64);
        let rows = sqlx::query(
            r#"
            SELECT element_a, element_b, result_label, created_at
            FROM combinations
            ORDER BY element_a COLLATE "C", element_b COLLATE "C"
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list combinations")?;

        rows.iter().map(record_from_row).collect()
    }

    async fn count_combinations(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM combinations")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count combinations")?;

        Ok(count.max(0) as u64)
    }
}

impl Store for PostgresStore {}
