use rocket::serde::{self, Deserialize, Serialize};

use crate::database::ScoreRecord;

/// Score records ranked best first. Serializes as a plain array.
#[derive(Debug, Default, PartialEq)]
pub struct Leaderboard {
    collection: Vec<ScoreRecord>,
}

impl Leaderboard {
    /// `collection` must already be in rank order.
    pub fn new(collection: Vec<ScoreRecord>) -> Self {
        Self { collection }
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoreRecord> {
        self.collection.iter()
    }
}

impl Serialize for Leaderboard {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.collection.serialize(serializer)
    }
}

/// Aggregate statistics over every stored score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ScoreStats {
    pub total_games: i64,
    pub average_score: f64,
    pub highest_score: i64,
}

impl ScoreStats {
    pub fn empty() -> Self {
        Self {
            total_games: 0,
            average_score: 0.0,
            highest_score: 0,
        }
    }

    /// Builds stats from raw aggregates, rounding the average to two decimals
    /// with ties going to the even digit.
    pub fn from_aggregate(total_games: i64, average_score: f64, highest_score: i64) -> Self {
        if total_games == 0 {
            return Self::empty();
        }
        Self {
            total_games,
            average_score: (average_score * 100.0).round_ties_even() / 100.0,
            highest_score,
        }
    }
}
