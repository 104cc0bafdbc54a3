//! # vacbot-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **device port** that adapters must implement:
//!   - `Vacuum` — status, pause, return home, fan level, zone cleaning
//! - Define the **driving use-case**:
//!   - `ConversationService` — access guard + per-identity session state machine
//! - Provide in-process infrastructure that doesn't need IO:
//!   - `SerializedVacuum` — global one-command-at-a-time boundary around a device
//!
//! ## Dependency rule
//! Depends on `vacbot-domain` only (plus `tokio::sync` for locks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod serialized;
pub mod services;
