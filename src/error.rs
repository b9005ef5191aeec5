use rocket::{
    http::Status,
    response::{self, Responder},
    serde::json::Json,
    Request,
};
use thiserror::Error;

use crate::model::{api::ValidationReport, store::CommitError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{1}")]
    Status(Status, String),
    /// The batch failed validation; the messages are returned to the caller as-is.
    #[error("Ballot rejected: {}", .0.join("; "))]
    Rejected(Vec<String>),
    #[error("No selections were made")]
    NothingSelected,
    #[error(transparent)]
    Commit(#[from] CommitError),
}

impl Error {
    pub fn not_found(what: String) -> Self {
        Self::Status(Status::NotFound, format!("{what} not found"))
    }

    pub fn status(&self) -> Status {
        match self {
            Self::Status(status, _) => *status,
            Self::Rejected(_) => Status::UnprocessableEntity,
            Self::NothingSelected => Status::BadRequest,
            Self::Commit(CommitError::Conflict { .. }) => Status::Conflict,
            Self::Commit(CommitError::NothingSelected) => Status::BadRequest,
            Self::Commit(_) => Status::UnprocessableEntity,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        debug!("Responding with {status}: {self}");
        match self {
            Self::Rejected(errors) => {
                (status, Json(ValidationReport::rejected(errors))).respond_to(req)
            }
            other => (status, other.to_string()).respond_to(req),
        }
    }
}
