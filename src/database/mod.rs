use crate::record_id::RecordId;

mod request_error;
pub mod requests;
mod score;
mod store;

pub use request_error::*;
pub use score::{GameScore, ScoreRecord, ScoreSubmission, ANONYMOUS_PLAYER};
pub use store::{ScoreStore, StoreError};

pub type DatabasePool = sqlx::AnyPool;
