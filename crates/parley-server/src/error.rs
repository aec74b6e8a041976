use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parley::models::request::ValidationError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {env_var}: {reason}")]
    InvalidValue { env_var: String, reason: String },
    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

// Helper function to format environment variable names
pub fn to_env_var(field_path: &str) -> String {
    format!("PARLEY_{}", field_path.replace('.', "__").to_uppercase())
}

/// Errors returned by route handlers before a stream is started
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "errors": e.issues })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_env_var() {
        assert_eq!(to_env_var("server.port"), "PARLEY_SERVER__PORT");
        assert_eq!(
            to_env_var("stream.channel_capacity"),
            "PARLEY_STREAM__CHANNEL_CAPACITY"
        );
        assert_eq!(to_env_var("agent.type"), "PARLEY_AGENT__TYPE");
    }
}
