use thiserror::Error;

/// Errors raised while processing a telemetry stream. All are fatal: the
/// stream yields the error once and then fuses.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("sample is missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("sample field {field} has unusable value: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("unrecognized control command: {command}")]
    UnknownCommand { command: String },

    #[error("unrecognized message type: {message_type}")]
    UnknownMessageType { message_type: String },

    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProcessError {
    pub(crate) fn invalid_field(field: &'static str, value: &serde_json::Value) -> Self {
        Self::InvalidField {
            field,
            value: value.to_string(),
        }
    }
}
