use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, info};

use super::*;
use crate::leaderboard::{Leaderboard, ScoreStats};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("score store is unavailable: {0}")]
    Database(#[from] sqlx::Error),
    #[error("score {id} has an unreadable timestamp {value:?}: {source}")]
    CorruptTimestamp {
        id: String,
        value: String,
        source: chrono::ParseError,
    },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS game_scores (
    id TEXT PRIMARY KEY,
    player_name TEXT NOT NULL,
    score BIGINT NOT NULL,
    level_reached TEXT NOT NULL,
    \"timestamp\" TEXT NOT NULL
)";

/// Handle to the `game_scores` collection.
///
/// Constructed once at startup and handed to Rocket as managed state;
/// the pool is closed by the shutdown fairing.
#[derive(Clone)]
pub struct ScoreStore {
    pool: DatabasePool,
}

impl ScoreStore {
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        sqlx::any::install_default_drivers();
        let pool = DatabasePool::connect(database_url).await?;
        Ok(Self::with_pool(pool))
    }

    /// Opens a private in-memory SQLite store. Every connection to
    /// `sqlite::memory:` sees its own database, so the pool holds exactly one.
    #[cfg(test)]
    pub async fn in_memory() -> StoreResult<Self> {
        sqlx::any::install_default_drivers();
        let pool = sqlx::any::AnyPoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self::with_pool(pool))
    }

    pub fn with_pool(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Creates the `game_scores` table if it is missing.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Appends one record to the collection.
    pub async fn insert(&self, record: &ScoreRecord) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO game_scores (id, player_name, score, level_reached, \"timestamp\") \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(record.id.inner())
        .bind(record.player_name.as_str())
        .bind(record.score)
        .bind(record.level_reached.as_str())
        .bind(format_timestamp(&record.timestamp))
        .execute(&self.pool)
        .await?;

        debug!(id = %record.id, "score inserted");
        Ok(())
    }

    /// Fetches the `limit` best records, highest score first.
    /// Equal scores are ordered by submission time, earliest first.
    pub async fn top(&self, limit: i64) -> StoreResult<Leaderboard> {
        let rows = sqlx::query(
            "SELECT id, player_name, score, level_reached, \"timestamp\" FROM game_scores \
             ORDER BY score DESC, \"timestamp\" ASC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let records = rows
            .iter()
            .map(decode_record)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(Leaderboard::new(records))
    }

    /// Counts, averages and maximizes over the whole collection.
    pub async fn stats(&self) -> StoreResult<ScoreStats> {
        let total_games = sqlx::query("SELECT COUNT(*) FROM game_scores")
            .fetch_one(&self.pool)
            .await?
            .try_get_unchecked::<i64, usize>(0)?;
        if total_games == 0 {
            return Ok(ScoreStats::empty());
        }

        let row = sqlx::query(
            "SELECT CAST(AVG(score) AS DOUBLE PRECISION), MAX(score) FROM game_scores",
        )
        .fetch_one(&self.pool)
        .await?;
        let average_score = row.try_get_unchecked::<f64, usize>(0)?;
        let highest_score = row.try_get_unchecked::<GameScore, usize>(1)?;

        Ok(ScoreStats::from_aggregate(
            total_games,
            average_score,
            highest_score,
        ))
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("score store closed");
    }
}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(id: &str, value: String) -> StoreResult<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(&value) {
        Ok(timestamp) => Ok(timestamp.with_timezone(&Utc)),
        Err(source) => Err(StoreError::CorruptTimestamp {
            id: id.to_owned(),
            value,
            source,
        }),
    }
}

fn decode_record(row: &AnyRow) -> StoreResult<ScoreRecord> {
    let id = row.try_get::<String, _>("id")?;
    let timestamp = parse_timestamp(&id, row.try_get::<String, _>("timestamp")?)?;
    Ok(ScoreRecord {
        id: RecordId::from(id),
        player_name: row.try_get("player_name")?,
        score: row.try_get("score")?,
        level_reached: row.try_get("level_reached")?,
        timestamp,
    })
}
