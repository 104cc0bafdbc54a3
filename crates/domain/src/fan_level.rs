//! Fan level — named suction-power settings and their device parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Suction power preset understood by the vacuum cleaner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FanLevel {
    Quiet,
    Balanced,
    Turbo,
    Max,
    Mob,
}

impl FanLevel {
    /// Every fan level, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Quiet,
        Self::Balanced,
        Self::Turbo,
        Self::Max,
        Self::Mob,
    ];

    /// Label shown to the user and accepted back as input.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Quiet => "Quiet",
            Self::Balanced => "Balanced",
            Self::Turbo => "Turbo",
            Self::Max => "Max",
            Self::Mob => "Mob",
        }
    }

    /// Numeric parameter sent to the device.
    #[must_use]
    pub fn value(self) -> u8 {
        match self {
            Self::Quiet => 38,
            Self::Balanced => 60,
            Self::Turbo => 75,
            Self::Max => 100,
            Self::Mob => 105,
        }
    }
}

impl fmt::Display for FanLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FanLevel {
    type Err = ValidationError;

    /// Exact, case-sensitive match on the menu label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.name() == s)
            .ok_or_else(|| ValidationError::UnknownFanLevel(s.to_string()))
    }
}
