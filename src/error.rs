use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use mongodb::error::Error as DbError;
use rocket::{
    http::{Status, StatusClass},
    response::{self, Responder},
    Request,
};
use thiserror::Error;

use crate::model::election::ElectionError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Election(#[from] ElectionError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Jwt(#[from] JwtError),
    #[error("{1}")]
    Status(Status, String),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        ElectionError::NotFound(what.into()).into()
    }

    /// The HTTP status this error is reported with.
    pub fn status(&self) -> Status {
        match self {
            Self::Election(err) => match err {
                ElectionError::NotFound(_) => Status::NotFound,
                ElectionError::Unauthorized(_) | ElectionError::NotEligible(_) => {
                    Status::Forbidden
                }
                ElectionError::PhaseViolation(_)
                | ElectionError::DuplicateApplication
                | ElectionError::AlreadyReviewed(_)
                | ElectionError::IncompleteReview(_)
                | ElectionError::AlreadyVoted
                | ElectionError::NoCandidates => Status::Conflict,
            },
            Self::Db(_) => Status::InternalServerError,
            Self::Jwt(err) => match err.kind() {
                JwtErrorKind::InvalidKeyFormat | JwtErrorKind::Crypto(_) => {
                    Status::InternalServerError
                }
                _ => Status::Unauthorized,
            },
            Self::Status(status, _) => *status,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        let reason = if status.class() == StatusClass::ServerError {
            error!("{self}");
            // Never leak internals.
            status.reason_lossy().to_string()
        } else {
            debug!("Rejected {} {}: {self}", req.method(), req.uri());
            self.to_string()
        };
        (status, reason).respond_to(req)
    }
}
