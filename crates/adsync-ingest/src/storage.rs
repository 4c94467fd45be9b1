// Storage layer for campaign records
//
// One transaction per batch: every record of a sync run is inserted inside
// the same transaction, and a failure on any record rolls back all of them.
// The pool holds a single connection, so a run never uses more than one
// database session.

use crate::config::DatabaseConfig;
use crate::error::{IngestError, PersistStage, Result};
use adsync_common::CampaignRecord;
use sqlx::migrate::Migrator;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Embedded schema; `create_tables` applies it.
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const INSERT_ADVERT: &str = r#"
    INSERT INTO adverts (advertId, "type", status, changeTime)
    VALUES (?1, ?2, ?3, ?4)
"#;

const SELECT_ADVERT: &str = r#"
    SELECT advertId, "type", status, changeTime
    FROM adverts
    WHERE advertId = ?1
"#;

/// Result of a committed batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertSummary {
    pub inserted: usize,
}

/// Row shape of the `adverts` table
///
/// Columns other than the key are nullable in the schema; this writer never
/// stores NULL, so reads map NULL to the field's default.
#[derive(Debug, sqlx::FromRow)]
struct AdvertRow {
    #[sqlx(rename = "advertId")]
    advert_id: i64,
    #[sqlx(rename = "type")]
    kind: Option<i64>,
    status: Option<i64>,
    #[sqlx(rename = "changeTime")]
    change_time: Option<String>,
}

impl From<AdvertRow> for CampaignRecord {
    fn from(row: AdvertRow) -> Self {
        CampaignRecord {
            advert_id: row.advert_id,
            kind: row.kind.unwrap_or_default(),
            status: row.status.unwrap_or_default(),
            change_time: row.change_time.unwrap_or_default(),
        }
    }
}

fn insert_query(record: &CampaignRecord) -> Query<'_, Sqlite, SqliteArguments<'_>> {
    sqlx::query(INSERT_ADVERT)
        .bind(record.advert_id)
        .bind(record.kind)
        .bind(record.status)
        .bind(record.change_time.as_str())
}

/// Storage handler for campaign records
pub struct AdvertStore {
    pool: SqlitePool,
}

impl AdvertStore {
    /// Open the database, creating the SQLite file if it does not exist
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| IngestError::persistence(PersistStage::Connect, e))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_with(options)
            .await
            .map_err(|e| IngestError::persistence(PersistStage::Connect, e))?;

        debug!(url = %config.url, "Database connection established");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the `adverts` table if it does not exist
    ///
    /// Safe to run any number of times, including against a database whose
    /// table was created by another tool.
    pub async fn create_tables(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await?;
        info!("Adverts table is in place");
        Ok(())
    }

    /// Insert a batch of records atomically
    ///
    /// Either every record is committed or none is. On failure the
    /// transaction is rolled back before the error is returned, and the
    /// connection goes back to the pool on every path.
    #[instrument(skip_all, fields(records = records.len()))]
    pub async fn insert_records(&self, records: &[CampaignRecord]) -> Result<InsertSummary> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| IngestError::persistence(PersistStage::Begin, e))?;

        for record in records {
            if let Err(e) = insert_query(record).execute(&mut *tx).await {
                warn!(
                    advert_id = record.advert_id,
                    error = %e,
                    "Insert failed, rolling back batch"
                );
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                return Err(IngestError::staging(record.advert_id, e));
            }
        }

        // A failed commit drops `tx`, which rolls back
        tx.commit()
            .await
            .map_err(|e| IngestError::persistence(PersistStage::Commit, e))?;

        info!(inserted = records.len(), "Committed advert batch");

        Ok(InsertSummary {
            inserted: records.len(),
        })
    }

    /// Look up one record by advert id
    pub async fn get(&self, advert_id: i64) -> Result<Option<CampaignRecord>> {
        let row = sqlx::query_as::<_, AdvertRow>(SELECT_ADVERT)
            .bind(advert_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| IngestError::persistence(PersistStage::Query, e))?;

        Ok(row.map(CampaignRecord::from))
    }

    /// Number of stored records
    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM adverts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| IngestError::persistence(PersistStage::Query, e))
    }

    /// Close the pool, waiting for the connection to be released
    pub async fn close(self) {
        self.pool.close().await;
    }
}
