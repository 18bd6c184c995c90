use rocket::http::Status;
use rocket::response::{self, Responder, Response};
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::Request;
use tracing::{error, warn};

use super::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("invalid score submission: {0}")]
    Validation(String),
    #[error("limit must be a positive integer, got {0:?}")]
    InvalidLimit(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RequestError {
    pub fn status(&self) -> Status {
        match self {
            Self::Validation(_) => Status::UnprocessableEntity,
            Self::InvalidLimit(_) => Status::BadRequest,
            Self::Store(_) => Status::InternalServerError,
        }
    }
}

/// JSON body sent with every error response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl<'r> Responder<'r, 'static> for RequestError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status.class().is_server_error() {
            error!(uri = %request.uri(), error = %self, "request failed");
        } else {
            warn!(uri = %request.uri(), error = %self, "rejected request");
        }

        Response::build_from(Json(ErrorBody::new(self.to_string())).respond_to(request)?)
            .status(status)
            .ok()
    }
}

pub type RequestResult<T, E = RequestError> = std::result::Result<T, E>;
