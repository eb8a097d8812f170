use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use crate::relay::body::BodyReadError;

/// Marker returned to callers whenever the backend leg fails.
pub const PROXY_FAILED: &str = "Proxy request failed";

/// Marker returned when an inbound body is rejected.
pub const INVALID_BODY: &str = "Invalid request body";

/// Marker returned when an inbound body exceeds `relay.max_body_size`.
pub const BODY_TOO_LARGE: &str = "Request body too large";

/// Terminal failure of a single relayed request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Building, sending or reading the backend request failed.
    #[error("{0}")]
    Upstream(#[from] reqwest::Error),

    /// The backend declared JSON but sent something else.
    #[error("{0}")]
    MalformedJson(#[from] serde_json::Error),

    /// The inbound body could not be read and the policy is `reject`.
    #[error("{0}")]
    BodyRejected(#[source] BodyReadError),

    /// The inbound body ran past the configured limit. Independent of policy.
    #[error("{0}")]
    BodyTooLarge(#[source] BodyReadError),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Upstream(_) | RelayError::MalformedJson(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            RelayError::BodyRejected(_) => StatusCode::BAD_REQUEST,
            RelayError::BodyTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    fn marker(&self) -> &'static str {
        match self {
            RelayError::Upstream(_) | RelayError::MalformedJson(_) => PROXY_FAILED,
            RelayError::BodyRejected(_) => INVALID_BODY,
            RelayError::BodyTooLarge(_) => BODY_TOO_LARGE,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.marker(),
            "detail": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}
