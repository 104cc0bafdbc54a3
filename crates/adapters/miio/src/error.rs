//! miIO adapter error types.

use vacbot_domain::command::CommandFailure;
use vacbot_domain::error::VacBotError;

/// Errors specific to the miIO adapter.
#[derive(Debug, thiserror::Error)]
pub enum MiioError {
    /// Socket bind, send or receive failed.
    #[error("socket error")]
    Io(#[from] std::io::Error),

    /// No datagram arrived before the deadline.
    #[error("device did not respond in time")]
    Timeout,

    /// A datagram could not be encoded or decoded as JSON.
    #[error("malformed JSON payload")]
    Json(#[from] serde_json::Error),

    /// The device answered with an error object.
    #[error("device error {code}: {message}")]
    Device {
        /// Error code reported by the device.
        code: i64,
        /// Error message reported by the device.
        message: String,
    },

    /// The configured token is not 32 hex digits.
    #[error("device token must be 32 hex digits")]
    InvalidToken,

    /// A datagram was not sealed with the configured token.
    #[error("datagram checksum mismatch")]
    ChecksumMismatch,

    /// A datagram passed the checksum but its payload did not decrypt.
    #[error("payload could not be decrypted")]
    Decrypt,

    /// A request does not fit into a single datagram.
    #[error("payload of {0} bytes does not fit a datagram")]
    PayloadTooLarge(usize),

    /// The device answered with something that is not a valid reply.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl MiioError {
    /// Normalize into the command result protocol.
    #[must_use]
    pub fn into_failure(self) -> CommandFailure {
        match self {
            Self::Timeout => CommandFailure::Timeout,
            Self::Device { code, message } => CommandFailure::DeviceError { code, message },
            other => CommandFailure::Transport(other.to_string()),
        }
    }
}

impl From<MiioError> for VacBotError {
    fn from(err: MiioError) -> Self {
        VacBotError::Device(Box::new(err))
    }
}

impl From<MiioError> for CommandFailure {
    fn from(err: MiioError) -> Self {
        err.into_failure()
    }
}
