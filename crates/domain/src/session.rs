//! Session — per-user conversation state.
//!
//! A session only moves forward: `MainMenu → SelectFan → SelectZone`.
//! Terminal outcomes (status, home, cleaning started, cancel) are not states
//! at all; the owner drops the session instead.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::fan_level::FanLevel;

/// Non-terminal conversation states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    MainMenu,
    SelectFan,
    SelectZone,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MainMenu => f.write_str("main_menu"),
            Self::SelectFan => f.write_str("select_fan"),
            Self::SelectZone => f.write_str("select_zone"),
        }
    }
}

/// Buttons of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MainMenuChoice {
    Status,
    Home,
    ZoneCleaning,
}

impl MainMenuChoice {
    /// Every choice, in menu order.
    pub const ALL: [Self; 3] = [Self::Status, Self::Home, Self::ZoneCleaning];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Status => "Status",
            Self::Home => "Home",
            Self::ZoneCleaning => "ZoneCleaning",
        }
    }
}

impl FromStr for MainMenuChoice {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|c| c.label() == s).ok_or(())
    }
}

/// Attempted a transition the state machine does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot move from {from} to {to}")]
pub struct TransitionError {
    pub from: SessionState,
    pub to: SessionState,
}

/// Conversation state for one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    state: SessionState,
    fan_level: Option<FanLevel>,
}

impl Session {
    /// A fresh session sitting at the main menu.
    #[must_use]
    pub fn start() -> Self {
        Self {
            state: SessionState::MainMenu,
            fan_level: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Fan level applied during `SelectFan`, once there is one.
    #[must_use]
    pub fn fan_level(&self) -> Option<FanLevel> {
        self.fan_level
    }

    /// `MainMenu → SelectFan`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] unless the session is at the main menu.
    pub fn begin_zone_cleaning(&mut self) -> Result<(), TransitionError> {
        self.advance(SessionState::MainMenu, SessionState::SelectFan)
    }

    /// `SelectFan → SelectZone`, remembering the level that was applied.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] unless the session is selecting a fan level.
    pub fn apply_fan_level(&mut self, level: FanLevel) -> Result<(), TransitionError> {
        self.advance(SessionState::SelectFan, SessionState::SelectZone)?;
        self.fan_level = Some(level);
        Ok(())
    }

    fn advance(&mut self, from: SessionState, to: SessionState) -> Result<(), TransitionError> {
        if self.state != from {
            return Err(TransitionError {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}
