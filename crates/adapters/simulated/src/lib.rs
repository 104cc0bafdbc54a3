//! # vacbot-adapter-simulated
//!
//! Simulated vacuum cleaner for testing and demonstration.
//!
//! ## Behaviour
//!
//! | Command | Simulated state afterwards |
//! |---------|----------------------------|
//! | `status` | unchanged |
//! | `pause` | `Paused` |
//! | `home` | `Returning home` |
//! | `set_fan_level` | unchanged |
//! | `start_zone_cleaning` | `Zoned cleaning` (after an implicit pause) |
//!
//! Every command succeeds, performs no network activity, is logged at
//! `debug` level and recorded as a [`DeviceCall`] for inspection.
//!
//! ## Dependency rule
//!
//! Depends on `vacbot-app` (port traits) and `vacbot-domain` only.

use std::sync::{Mutex, MutexGuard, PoisonError};

use vacbot_app::ports::Vacuum;
use vacbot_domain::command::CommandResult;
use vacbot_domain::fan_level::FanLevel;
use vacbot_domain::zone::CleaningRegion;

/// One command received by the simulator, with its device arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    Status,
    Pause,
    Home,
    SetFanLevel(u8),
    ZonedClean(Vec<[i32; 5]>),
}

/// In-memory stand-in for the real device.
pub struct SimulatedVacuum {
    state: Mutex<&'static str>,
    fan_level: Mutex<FanLevel>,
    calls: Mutex<Vec<DeviceCall>>,
}

impl Default for SimulatedVacuum {
    fn default() -> Self {
        Self {
            state: Mutex::new("Charging"),
            fan_level: Mutex::new(FanLevel::Balanced),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl SimulatedVacuum {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<DeviceCall> {
        lock(&self.calls).clone()
    }

    /// Drain the recorded calls.
    pub fn take_calls(&self) -> Vec<DeviceCall> {
        std::mem::take(&mut *lock(&self.calls))
    }

    /// Fan level most recently set.
    #[must_use]
    pub fn fan_level(&self) -> FanLevel {
        *lock(&self.fan_level)
    }

    fn record(&self, call: DeviceCall) {
        tracing::debug!(?call, "simulated vacuum command");
        lock(&self.calls).push(call);
    }

    fn set_state(&self, state: &'static str) {
        *lock(&self.state) = state;
    }
}

impl Vacuum for SimulatedVacuum {
    async fn status(&self) -> CommandResult<String> {
        self.record(DeviceCall::Status);
        Ok((*lock(&self.state)).to_string())
    }

    async fn pause(&self) -> CommandResult {
        self.record(DeviceCall::Pause);
        self.set_state("Paused");
        Ok(())
    }

    async fn home(&self) -> CommandResult {
        self.record(DeviceCall::Home);
        self.set_state("Returning home");
        Ok(())
    }

    async fn set_fan_level(&self, level: FanLevel) -> CommandResult {
        self.record(DeviceCall::SetFanLevel(level.value()));
        *lock(&self.fan_level) = level;
        Ok(())
    }

    async fn start_zone_cleaning(&self, regions: &[CleaningRegion]) -> CommandResult {
        // pause result is ignored, as on the real device
        let _ = self.pause().await;
        let params = regions.iter().map(CleaningRegion::to_params).collect();
        self.record(DeviceCall::ZonedClean(params));
        self.set_state("Zoned cleaning");
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
