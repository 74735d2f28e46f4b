use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failure of a call to the remote accounting API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// A scoped call was attempted without the entity/ledger it needs.
    #[error("{0}")]
    MissingSelection(&'static str),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { status: 400, .. } => {
                "Invalid request. Please check your input.".to_string()
            }
            ApiError::Http { status: 404, .. } => "Resource not found.".to_string(),
            ApiError::Http { status: 500, .. } => {
                "Server error. Please try again later.".to_string()
            }
            ApiError::Http { status, body } => {
                if body.trim().is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.clone()
                }
            }
            other => {
                let message = other.to_string();
                if message.is_empty() {
                    "An unexpected error occurred.".to_string()
                } else {
                    message
                }
            }
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

/// Failure of a console handler that has no page to fall back to.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Upstream API error: {0}")]
    Api(#[from] ApiError),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Api(err) if err.is_unauthorized() => {
                (StatusCode::UNAUTHORIZED, err.user_message())
            }
            AppError::Api(ApiError::Http { status: 404, .. }) => {
                (StatusCode::NOT_FOUND, "Resource not found.".to_string())
            }
            AppError::Api(ApiError::MissingSelection(msg)) => {
                (StatusCode::BAD_REQUEST, msg.to_string())
            }
            AppError::Api(err) => (StatusCode::BAD_GATEWAY, err.user_message()),
            AppError::InternalError(err) => {
                tracing::error!(error = ?err, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, body: &str) -> ApiError {
        ApiError::Http {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn maps_common_statuses_to_fixed_messages() {
        assert_eq!(
            http(400, "bad field").user_message(),
            "Invalid request. Please check your input."
        );
        assert_eq!(http(404, "").user_message(), "Resource not found.");
        assert_eq!(
            http(500, "traceback").user_message(),
            "Server error. Please try again later."
        );
    }

    #[test]
    fn falls_back_to_raw_body_for_other_statuses() {
        assert_eq!(
            http(409, "ledger already exists").user_message(),
            "ledger already exists"
        );
        assert_eq!(http(418, "  ").user_message(), "HTTP 418");
    }

    #[test]
    fn missing_selection_uses_its_own_text() {
        let err = ApiError::MissingSelection("No entity selected");
        assert_eq!(err.user_message(), "No entity selected");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn unauthorized_detection() {
        assert!(http(401, "").is_unauthorized());
        assert!(http(403, "").is_unauthorized());
        assert!(!http(404, "").is_unauthorized());
    }

    #[test]
    fn upstream_not_found_becomes_404() {
        let response = AppError::from(http(404, "")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::from(http(502, "gateway")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn rejected_token_and_internal_failures_map_to_their_statuses() {
        let response = AppError::from(http(401, "expired")).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AppError::from(anyhow::anyhow!("encoder failed")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
