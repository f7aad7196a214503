use thiserror::Error;

/// Errors surfaced by the systems API
///
/// Every variant maps onto a single HTTP status and a short JSON message.
/// Nothing here is retried; the caller sees the failure immediately.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Any failure reaching, reading or writing the spreadsheet
    #[error("data source error: {0}")]
    DataSource(String),

    /// The composite `<tab>__<row>` identifier could not be parsed
    #[error("invalid system id: {0}")]
    InvalidId(String),

    /// The target field is not present in the tab's header row
    #[error("column '{column}' not found in tab '{tab}'")]
    ColumnNotFound { tab: String, column: String },
}

impl ApiError {
    /// Build a `DataSource` error from anything printable
    pub fn data_source(err: impl std::fmt::Display) -> Self {
        ApiError::DataSource(err.to_string())
    }
}

#[cfg(feature = "web")]
mod response {
    use super::ApiError;
    use axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    };

    impl ApiError {
        /// HTTP status used when this error reaches a handler boundary
        pub fn status(&self) -> StatusCode {
            match self {
                ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
                ApiError::DataSource(_) | ApiError::ColumnNotFound { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        }
    }

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            let body = serde_json::json!({ "error": self.to_string() });
            (self.status(), Json(body)).into_response()
        }
    }
}
