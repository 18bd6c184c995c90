use chrono::{DateTime, SubsecRound, Utc};
use rocket::serde::{Deserialize, Serialize};

use crate::record_id::RecordId;

// Types stored in the `game_scores` table:
// id            TEXT
// player_name   TEXT
// score         BIGINT
// level_reached TEXT
// timestamp     TEXT (RFC 3339)

pub type GameScore = i64;

pub const ANONYMOUS_PLAYER: &str = "Anonymous";

/// Body of a score submission.
///
/// Fields other than the three below are ignored, so older and newer clients
/// can talk to the same server. Do not add `deny_unknown_fields` here.
#[derive(Clone, Deserialize, Serialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct ScoreSubmission {
    #[serde(default)]
    pub player_name: Option<String>,
    pub score: GameScore,
    pub level_reached: String,
}

impl ScoreSubmission {
    /// Player name to store: blank or missing names become [`ANONYMOUS_PLAYER`].
    pub fn player_name(&self) -> &str {
        match self.player_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => ANONYMOUS_PLAYER,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
#[serde(crate = "rocket::serde")]
pub struct ScoreRecord {
    pub id: RecordId,
    pub player_name: String,
    pub score: GameScore,
    pub level_reached: String,
    pub timestamp: DateTime<Utc>,
}

impl ScoreRecord {
    /// Creates a record for the submission, stamped with a fresh id and the current time.
    pub fn new(submission: &ScoreSubmission) -> Self {
        Self {
            id: RecordId::generate(),
            player_name: submission.player_name().to_owned(),
            score: submission.score,
            level_reached: submission.level_reached.clone(),
            // Stored text keeps microseconds, so drop anything finer up front
            timestamp: Utc::now().trunc_subsecs(6),
        }
    }
}
