use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
#[derive(Debug)]
pub enum AppError {
    /// Database-related errors.
    DatabaseError(sqlx::Error),
    /// Lookup by key yielded nothing.
    NotFound(String),
    /// Bad request error (invalid input).
    BadRequest(String),
    /// Well-formed request whose content cannot be processed (e.g. a malformed location).
    Unprocessable(String),
    /// The device fingerprint could not be derived from the request.
    Fingerprint(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message, also used as the public message for
        /// infrastructure failures.
        context: String,
    },
}

impl AppError {
    /// Whether this error comes from infrastructure rather than from the caller's input.
    fn is_infrastructure(&self) -> bool {
        match self {
            AppError::DatabaseError(_) | AppError::Fingerprint(_) => true,
            AppError::WithContext { source, .. } => source.is_infrastructure(),
            _ => false,
        }
    }

    /// The HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) | AppError::Fingerprint(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::WithContext { source, .. } => source.status(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(e) => write!(f, "Database error: {}", e),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unprocessable(msg) => write!(f, "Unprocessable: {}", msg),
            AppError::Fingerprint(msg) => write!(f, "Fingerprint generation error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Maps each variant to a status code and a `{"error": ...}` body.
    ///
    /// Infrastructure failures are logged in full here and answered with a
    /// generic message so no internal detail reaches the caller.
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self {
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {:?}", e);
                "Internal server error".to_string()
            }
            AppError::Fingerprint(msg) => {
                tracing::error!("Fingerprint generation error: {}", msg);
                "Fingerprint generation error".to_string()
            }
            AppError::NotFound(msg) | AppError::BadRequest(msg) | AppError::Unprocessable(msg) => {
                msg
            }
            AppError::WithContext { source, context } => {
                if !source.is_infrastructure() {
                    return (*source).into_response();
                }
                tracing::error!("{} -> {}", context, source);
                context
            }
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err)
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }
}

impl<T> ResultExt<T> for Result<T, sqlx::Error> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(AppError::from).context(context)
    }
}
