use aws_sdk_dynamodb::error::DisplayErrorContext;
use lambda_http::{http::StatusCode, Body, Error, Response};
use serde_json::json;

use crate::response;

/// Failures a request handler turns into an HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Invalid JSON: {0}")]
    MalformedPayload(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Invalid vote choice: {0}")]
    InvalidVote(String),

    #[error("No image found with id {0}")]
    NotFound(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Malformed vote record: {0}")]
    MalformedRecord(String),

    #[error("Storage error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Wraps an AWS SDK failure, keeping the full source chain in the message.
    pub fn store<E: std::error::Error>(err: E) -> Self {
        HandlerError::Store(DisplayErrorContext(&err).to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::MalformedPayload(_)
            | HandlerError::MissingField(_)
            | HandlerError::BadRequest(_)
            | HandlerError::InvalidVote(_) => StatusCode::BAD_REQUEST,
            HandlerError::NotFound(_) => StatusCode::NOT_FOUND,
            HandlerError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            HandlerError::MalformedRecord(_)
            | HandlerError::Store(_)
            | HandlerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_json_response(self) -> Result<Response<Body>, Error> {
        let status = self.status();
        response::json(status, &json!({ "error": self.to_string() }))
    }

    pub fn into_text_response(self) -> Result<Response<Body>, Error> {
        let status = self.status();
        response::text(status, self.to_string())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::MalformedPayload(err.to_string())
    }
}
