//! Vacuum port — the device command surface.
//!
//! Implemented by the live adapter (talks to the real device) and by the
//! simulator. Every operation returns a [`CommandResult`]; transport faults
//! and timeouts are folded into [`CommandFailure`](vacbot_domain::command::CommandFailure)
//! by the adapter and never reach the caller as errors.

use std::future::Future;

use vacbot_domain::command::CommandResult;
use vacbot_domain::fan_level::FanLevel;
use vacbot_domain::zone::CleaningRegion;

/// Capability interface of a robotic vacuum cleaner.
pub trait Vacuum: Send + Sync {
    /// Query the device and return its human-readable state.
    fn status(&self) -> impl Future<Output = CommandResult<String>> + Send;

    /// Pause whatever the device is doing.
    fn pause(&self) -> impl Future<Output = CommandResult> + Send;

    /// Stop cleaning and drive back to the dock.
    fn home(&self) -> impl Future<Output = CommandResult> + Send;

    /// Send the numeric parameter of `level`.
    fn set_fan_level(&self, level: FanLevel) -> impl Future<Output = CommandResult> + Send;

    /// Pause, then start a zoned clean over `regions`.
    ///
    /// The device rejects zoned cleaning unless it is idle or paused, so
    /// implementations must always pause first. Only the result of the
    /// zoned-clean command is returned.
    fn start_zone_cleaning(
        &self,
        regions: &[CleaningRegion],
    ) -> impl Future<Output = CommandResult> + Send;
}

impl<T: Vacuum> Vacuum for std::sync::Arc<T> {
    fn status(&self) -> impl Future<Output = CommandResult<String>> + Send {
        (**self).status()
    }

    fn pause(&self) -> impl Future<Output = CommandResult> + Send {
        (**self).pause()
    }

    fn home(&self) -> impl Future<Output = CommandResult> + Send {
        (**self).home()
    }

    fn set_fan_level(&self, level: FanLevel) -> impl Future<Output = CommandResult> + Send {
        (**self).set_fan_level(level)
    }

    fn start_zone_cleaning(
        &self,
        regions: &[CleaningRegion],
    ) -> impl Future<Output = CommandResult> + Send {
        (**self).start_zone_cleaning(regions)
    }
}
