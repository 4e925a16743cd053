//! Error types for salesdash-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use salesdash_core::{CoreError, ErrorCode, ErrorDetails};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest { message: String },

    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        source: CoreError,
    },
}

impl ApiError {
    /// Wrap a core failure; validation failures become 400s, the rest keep
    /// `context` as their headline
    pub fn from_core(context: &'static str, err: CoreError) -> Self {
        match err {
            CoreError::InvalidParameter { message } => ApiError::BadRequest { message },
            source => ApiError::Upstream { context, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_details(&self) -> ErrorDetails {
        match self {
            ApiError::BadRequest { message } => {
                ErrorDetails::new(ErrorCode::InvalidParameter, message.clone())
            }
            ApiError::Upstream { context, source } => source.to_details(context),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::debug!("Rejected request: {}", self);
        }
        (status, Json(self.to_details())).into_response()
    }
}

/// Attach a response headline to core results
pub trait WithContext<T> {
    fn context(self, context: &'static str) -> Result<T, ApiError>;
}

impl<T> WithContext<T> for Result<T, CoreError> {
    fn context(self, context: &'static str) -> Result<T, ApiError> {
        self.map_err(|err| ApiError::from_core(context, err))
    }
}
