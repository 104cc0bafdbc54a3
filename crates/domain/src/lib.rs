//! # vacbot-domain
//!
//! Pure domain model for the vacbot vacuum remote control.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, user identities
//! - Define **fan levels** (named suction settings and their device parameters)
//! - Define **zones** (named cleaning regions built from rectangles) and the
//!   immutable **zone registry**
//! - Define the **command result protocol** (acknowledgment normalization)
//! - Define the **access guard** (admin allow-list)
//! - Define the **session state machine** and the menus/replies it produces
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;

pub mod access;
pub mod command;
pub mod fan_level;
pub mod geometry;
pub mod menu;
pub mod session;
pub mod zone;
pub mod zone_registry;
