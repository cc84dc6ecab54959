//! Unified gateway error types.

use thiserror::Error;

use crate::shared::ReturnCode;

/// Top-level gateway error.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Node error: {0}")]
    Node(#[from] NodeError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input is empty")]
    InputNull,

    #[error("Input illegal: {0}")]
    Input(String),

    #[error("Function name undefined: {0}")]
    FunctionUndefined(String),

    #[error("Block limit unavailable")]
    BlockLimitUnavailable,

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl GatewayError {
    /// Map onto the shared return-code registry.
    ///
    /// Infrastructure failures collapse to `UNKNOWN_ERROR` so internal detail
    /// never reaches the client.
    pub fn return_code(&self) -> ReturnCode {
        match self {
            GatewayError::InputNull => ReturnCode::INPUT_NULL,
            GatewayError::Input(_) | GatewayError::Serde(_) => ReturnCode::INPUT_ILLEGAL,
            GatewayError::FunctionUndefined(_) => ReturnCode::FUNCTION_NAME_ILLEGAL,
            GatewayError::Service(e) => ReturnCode::new(e.code, e.message.clone()),
            GatewayError::Node(_)
            | GatewayError::Codec(_)
            | GatewayError::Config(_)
            | GatewayError::BlockLimitUnavailable => ReturnCode::UNKNOWN_ERROR,
        }
    }
}

/// Errors talking to the ledger node.
#[derive(Error, Debug)]
pub enum NodeError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Unexpected RPC result, expected {expected}")]
    UnexpectedResult { expected: &'static str },

    #[error("Timeout")]
    Timeout,

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// Byte-level encoding and decoding errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Malformed signature: expected 65 bytes, got {actual}")]
    MalformedSignature { actual: usize },

    #[error("Public key required for sm2 signatures")]
    MissingPublicKey,

    #[error("Invalid hex '{value}'")]
    InvalidHex { value: String },

    #[error("Invalid base64: {0}")]
    InvalidBase64(String),

    #[error("Invalid integer '{value}'")]
    InvalidInteger { value: String },
}

/// A business error raised by a domain service.
///
/// Its code and message are surfaced to the client verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ServiceError {
    pub code: i32,
    pub message: String,
}

impl ServiceError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infrastructure_errors_are_opaque() {
        let err = GatewayError::Codec(CodecError::MalformedSignature { actual: 64 });
        assert_eq!(err.return_code(), ReturnCode::UNKNOWN_ERROR);

        let err = GatewayError::Node(NodeError::Timeout);
        assert_eq!(err.return_code(), ReturnCode::UNKNOWN_ERROR);

        assert_eq!(
            GatewayError::BlockLimitUnavailable.return_code(),
            ReturnCode::UNKNOWN_ERROR
        );
    }

    #[test]
    fn test_service_error_surfaces_verbatim() {
        let err = GatewayError::Service(ServiceError::new(500_123, "asset frozen"));
        let code = err.return_code();
        assert_eq!(code.code, 500_123);
        assert_eq!(code.message, "asset frozen");
    }

    #[test]
    fn test_input_and_function_codes() {
        assert_eq!(
            GatewayError::Input("bad".into()).return_code(),
            ReturnCode::INPUT_ILLEGAL
        );
        assert_eq!(GatewayError::InputNull.return_code(), ReturnCode::INPUT_NULL);
        assert_eq!(
            GatewayError::FunctionUndefined("doSomethingElse".into()).return_code(),
            ReturnCode::FUNCTION_NAME_ILLEGAL
        );
    }
}
