use rocket::serde::json::{self, Json};
use rocket::serde::Serialize;
use rocket::*;
use tracing::{debug, info};

use super::*;
use crate::config::Config;
use crate::leaderboard::{Leaderboard, ScoreStats};

pub const DEFAULT_LIMIT: i64 = 10;

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ServiceStatus {
    message: &'static str,
    status: &'static str,
}

#[get("/")]
pub fn index() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        message: "Score Service API",
        status: "online",
    })
}

/// Stores a new score and returns the full record,
/// including the generated id and timestamp.
/// Every call creates a new record, resubmissions included.
#[post("/scores", data = "<submission>")]
pub async fn submit_score(
    submission: Result<Json<ScoreSubmission>, json::Error<'_>>,
    store: &State<ScoreStore>,
) -> RequestResult<Json<ScoreRecord>> {
    let submission = submission
        .map_err(|error| RequestError::Validation(error.to_string()))?
        .into_inner();

    let record = ScoreRecord::new(&submission);
    store.insert(&record).await?;

    info!(
        id = %record.id,
        player = %record.player_name,
        score = record.score,
        level = %record.level_reached,
        "score submitted"
    );
    Ok(Json(record))
}

/// Returns the best `limit` scores, highest first.
/// `limit` defaults to 10 and is clamped to the configured maximum.
#[get("/scores?<limit>")]
pub async fn list_top_scores(
    limit: Option<&str>,
    store: &State<ScoreStore>,
    config: &State<Config>,
) -> RequestResult<Json<Leaderboard>> {
    let limit = effective_limit(limit, config.max_scores_limit)?;
    let leaderboard = store.top(limit).await?;

    debug!(limit, returned = leaderboard.len(), "leaderboard fetched");
    Ok(Json(leaderboard))
}

#[get("/stats")]
pub async fn get_stats(store: &State<ScoreStore>) -> RequestResult<Json<ScoreStats>> {
    let stats = store.stats().await?;
    Ok(Json(stats))
}

fn effective_limit(requested: Option<&str>, max_limit: i64) -> RequestResult<i64> {
    let limit = match requested {
        None => DEFAULT_LIMIT,
        Some(value) => value
            .parse::<i64>()
            .map_err(|_| RequestError::InvalidLimit(value.to_owned()))?,
    };
    if limit < 1 {
        return Err(RequestError::InvalidLimit(limit.to_string()));
    }
    Ok(limit.min(max_limit))
}
