use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::prelude::*;
use crate::store::StoreError;

/// Error type for request handlers, wrapping a [`Report`] together with the status code
/// it should be answered with.
#[derive(Debug)]
pub struct ServeError {
    status: StatusCode,
    report: Report,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl ServeError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            report: eyre!(message.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> String {
        self.report.to_string()
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Request failed: {:?}", self.report);
        } else {
            debug!("Request rejected ({}): {}", self.status, self.report);
        }

        let body = ErrorBody {
            message: self.report.to_string(),
        };

        (self.status, Json(body)).into_response()
    }
}

// Lets handlers use `?` on anything that converts into a `Report`.
// Store errors keep their meaning as a status code; everything else is a 500.
impl<E> From<E> for ServeError
where
    E: Into<Report>,
{
    fn from(err: E) -> Self {
        let report = err.into();

        let status = match report.downcast_ref::<StoreError>() {
            Some(StoreError::InvalidName(_)) => StatusCode::BAD_REQUEST,
            Some(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            Some(StoreError::AlreadyExists(_)) => StatusCode::CONFLICT,
            Some(StoreError::Io(_)) | None => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self { status, report }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_status() {
        let cases = [
            (StoreError::InvalidName("..".into()), StatusCode::BAD_REQUEST),
            (StoreError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (StoreError::AlreadyExists("x".into()), StatusCode::CONFLICT),
        ];

        for (err, status) in cases {
            assert_eq!(ServeError::from(err).status(), status);
        }
    }

    #[test]
    fn other_errors_are_internal() {
        let err = ServeError::from(eyre!("boom"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "boom");
    }

    #[test]
    fn bad_request() {
        let err = ServeError::bad_request("missing file");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "missing file");
    }
}
