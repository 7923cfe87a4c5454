//! Gateway failure taxonomy

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The request never reached the gateway or no response came back
    #[error("Gateway unreachable: {0}")]
    Network(String),

    /// 4xx with a structured message; `messages` is itemized per field when
    /// the gateway sent a list or field map
    #[error("Gateway rejected request ({status}): {}", .messages.join("; "))]
    Validation { status: u16, messages: Vec<String> },

    /// 404 on a read
    #[error("Not found: {0}")]
    NotFound(String),

    /// 404 on a mutation: the operation has not been deployed on the gateway
    #[error("Operation not deployed: {0}")]
    NotDeployed(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Gateway error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Unexpected gateway response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Transport failures and 5xx answers are worth another attempt on reads
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Network(_) => true,
            GatewayError::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}
