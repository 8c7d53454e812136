use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::Answer;
use thiserror::Error;

/// Everything a command can fail with. All of them reach the client as an
/// HTTP 400 carrying an `Err` reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("##Err##: Missing '{0}' parameter!")]
    MissingParam(&'static str),
    #[error("##Err##: Server not ready!")]
    NotReady,
    #[error("##Err##: Invalid session!")]
    InvalidSession,
    #[error("##Err##: Invalid word!")]
    InvalidWord,
    #[error("##Err##: Too many sessions!")]
    Capacity,
    #[error("##Err##: Invalid password for restricted access!")]
    Unauthorized,
    #[error("Unsupported 'cmd' parameter!")]
    UnknownCommand,
}

impl IntoResponse for CommandError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "Command rejected");
        (StatusCode::BAD_REQUEST, Json(Answer::error(self.to_string()))).into_response()
    }
}
