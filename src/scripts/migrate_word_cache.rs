//! Copy rows from the legacy unordered `word_cache` table into `combinations`.
//!
//! Usage: `DATABASE_URL=... migrate-word-cache`

use anyhow::{Context, Result};
use sqlx::{PgPool, Row};

use chemcraft::config::AppConfig;
use chemcraft::store::{convert_legacy_row, CombinationStore, LegacyRow, PostgresStore};
use chemcraft::ResultValidator;

async fn load_legacy_rows(pool: &PgPool) -> Result<Vec<LegacyRow>> {
    let rows = sqlx::query("SELECT first_word, second_word, result FROM word_cache ORDER BY id")
        .fetch_all(pool)
        .await
        .context("Failed to read word_cache (does the legacy table exist?)")?;

    rows.iter()
        .map(|row| -> Result<LegacyRow> {
            Ok(LegacyRow {
                first_word: row.try_get("first_word")?,
                second_word: row.try_get("second_word")?,
                result: row.try_get("result")?,
            })
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    chemcraft::init_logging();

    let config = AppConfig::load()?;
    let store = PostgresStore::new(
        &config.database_url(),
        config.database.max_connections.unwrap_or(10),
    )
    .await?;
    store.migrate().await?;

    let validator = ResultValidator::new(config.sentinels.clone());

    log::info!("Reading legacy word_cache rows...");
    let rows = load_legacy_rows(store.pool()).await?;
    let total = rows.len();
    log::info!("Found {} legacy rows", total);

    let (mut imported, mut existing, mut skipped) = (0usize, 0usize, 0usize);
    for (i, row) in rows.iter().enumerate() {
        let Some(record) = convert_legacy_row(row, &validator) else {
            log::warn!("Skipping legacy row with a blank element: {:?}", row);
            skipped += 1;
            continue;
        };

        if store.insert_if_absent(record).await?.was_inserted() {
            imported += 1;
        } else {
            existing += 1;
        }

        if (i + 1) % 100 == 0 || i + 1 == total {
            log::info!("Processed {}/{} rows", i + 1, total);
        }
    }

    log::info!(
        "Legacy import complete: {} imported, {} already present, {} skipped",
        imported,
        existing,
        skipped
    );

    Ok(())
}
