use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Maps an error onto an HTTP status and a client-facing message.
///
/// The message is the only text that reaches the client, so implementors
/// decide there what detail is safe to expose.
///
/// # Example
///
/// ```ignore
/// use authgate_core::HttpError;
/// use axum::http::StatusCode;
/// use std::borrow::Cow;
///
/// #[derive(Debug)]
/// enum AppError {
///     Locked,
/// }
///
/// impl HttpError for AppError {
///     fn status_code(&self) -> StatusCode {
///         StatusCode::LOCKED
///     }
///
///     fn message(&self) -> Cow<'_, str> {
///         Cow::Borrowed("Account is locked.")
///     }
/// }
/// ```
pub trait HttpError: std::fmt::Debug {
    fn status_code(&self) -> StatusCode;
    fn message(&self) -> Cow<'_, str>;

    fn error_code(&self) -> String {
        status_to_error_code(self.status_code())
    }

    fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.error_code(), self.message())
    }

    fn into_http_response(self) -> Response
    where
        Self: Sized,
    {
        (self.status_code(), axum::Json(self.to_error_response())).into_response()
    }
}

/// Standard JSON error body: `{"code": "...", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status_to_error_code(status), message)
    }
}

/// Convert a status code to an error code string (e.g., "UNAUTHORIZED").
pub fn status_to_error_code(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("ERROR")
        .to_uppercase()
        .replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_to_error_code_common_codes() {
        assert_eq!(status_to_error_code(StatusCode::UNAUTHORIZED), "UNAUTHORIZED");
        assert_eq!(status_to_error_code(StatusCode::FORBIDDEN), "FORBIDDEN");
        assert_eq!(
            status_to_error_code(StatusCode::INTERNAL_SERVER_ERROR),
            "INTERNAL_SERVER_ERROR"
        );
    }

    #[test]
    fn error_response_serializes_code_and_message() {
        let body = ErrorResponse::from_status(StatusCode::UNAUTHORIZED, "nope");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"code": "UNAUTHORIZED", "message": "nope"}));
    }

    #[derive(Debug)]
    struct Teapot(String);

    impl HttpError for Teapot {
        fn status_code(&self) -> StatusCode {
            StatusCode::IM_A_TEAPOT
        }

        fn message(&self) -> Cow<'_, str> {
            Cow::Borrowed(&self.0)
        }
    }

    #[test]
    fn http_error_builds_response() {
        let err = Teapot("short and stout".to_string());
        assert_eq!(err.error_code(), "I'M_A_TEAPOT");
        assert_eq!(err.to_error_response().message, "short and stout");

        let response = err.into_http_response();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }
}
