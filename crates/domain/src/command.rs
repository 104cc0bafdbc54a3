//! Command result protocol — normalizes device acknowledgments.
//!
//! Every device operation yields a [`CommandResult`]. Adapters reduce the
//! raw acknowledgment (or the transport failure) to success or a
//! [`CommandFailure`]; nothing above the adapter ever looks at the payload.

use serde_json::Value;

/// The single acknowledgment token meaning "command accepted".
pub const SUCCESS_ACK: &str = "ok";

/// Outcome of one device operation. `T` is `()` for plain commands and the
/// state text for status queries.
pub type CommandResult<T = ()> = Result<T, CommandFailure>;

/// Why a device operation did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandFailure {
    /// The device answered, but not with the success token.
    #[error("device rejected the command")]
    Rejected,

    /// The device answered with an explicit error object.
    #[error("device reported error {code}: {message}")]
    DeviceError { code: i64, message: String },

    /// The device did not answer in time.
    #[error("device did not respond in time")]
    Timeout,

    /// The request never reached the device, or the reply was unreadable.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// A raw acknowledgment as returned by the device transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Ack(Value);

impl Ack {
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Whether the acknowledgment is exactly `["ok"]`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(&self.0, Value::Array(items)
            if items.len() == 1 && items[0].as_str() == Some(SUCCESS_ACK))
    }

    /// Reduce the acknowledgment to a [`CommandResult`].
    ///
    /// # Errors
    ///
    /// Returns [`CommandFailure::Rejected`] for anything but the success token.
    pub fn into_result(self) -> CommandResult {
        if self.is_success() {
            Ok(())
        } else {
            Err(CommandFailure::Rejected)
        }
    }
}
