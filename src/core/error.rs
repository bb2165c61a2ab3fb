use thiserror::Error;

use crate::clients::gemini::GeminiError;

/// Gateway-wide error model. Tool handlers never surface it to clients
/// directly; it is folded into tool output text.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Upstream(#[from] GeminiError),
}
