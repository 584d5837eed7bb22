use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use bidwatch_fetch::FetchError;
use bidwatch_store::StoreError;
use bidwatch_tracker::TrackerError;
use tracing::warn;

/// Handler error rendered as `{ "error": message }` with a mapped status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

fn fetch_status(err: &FetchError) -> StatusCode {
    match err {
        FetchError::NoAdapter { .. }
        | FetchError::InvalidUrl { .. }
        | FetchError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        FetchError::NotFound { .. } => StatusCode::NOT_FOUND,
        FetchError::Exhausted { .. } => StatusCode::BAD_GATEWAY,
    }
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::MissingId => StatusCode::BAD_REQUEST,
        StoreError::Io(_) | StoreError::Serde(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        Self {
            status: fetch_status(&err),
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self {
            status: store_status(&err),
            message: err.to_string(),
        }
    }
}

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::Fetch(e) => e.into(),
            TrackerError::Store(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = self.status.as_u16(), error = %self.message, "Request failed");
        }
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}
