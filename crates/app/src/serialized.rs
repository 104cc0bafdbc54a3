//! Device serialization — at most one command in flight per device.
//!
//! The vacuum accepts a single command stream with no notion of per-client
//! isolation. All sessions share one [`SerializedVacuum`], so commands from
//! different users are applied whole and in some total order. Multi-step
//! operations (pause then zoned clean) hold the lock for their full duration.

use tokio::sync::Mutex;

use vacbot_domain::command::CommandResult;
use vacbot_domain::fan_level::FanLevel;
use vacbot_domain::zone::CleaningRegion;

use crate::ports::Vacuum;

/// Wraps a [`Vacuum`] behind a fair async mutex.
pub struct SerializedVacuum<V> {
    gate: Mutex<()>,
    inner: V,
}

impl<V> SerializedVacuum<V> {
    #[must_use]
    pub fn new(inner: V) -> Self {
        Self {
            gate: Mutex::new(()),
            inner,
        }
    }
}

impl<V: Vacuum> Vacuum for SerializedVacuum<V> {
    async fn status(&self) -> CommandResult<String> {
        let _guard = self.gate.lock().await;
        self.inner.status().await
    }

    async fn pause(&self) -> CommandResult {
        let _guard = self.gate.lock().await;
        self.inner.pause().await
    }

    async fn home(&self) -> CommandResult {
        let _guard = self.gate.lock().await;
        self.inner.home().await
    }

    async fn set_fan_level(&self, level: FanLevel) -> CommandResult {
        let _guard = self.gate.lock().await;
        self.inner.set_fan_level(level).await
    }

    async fn start_zone_cleaning(&self, regions: &[CleaningRegion]) -> CommandResult {
        let _guard = self.gate.lock().await;
        self.inner.start_zone_cleaning(regions).await
    }
}
