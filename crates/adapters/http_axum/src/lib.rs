//! # vacbot-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Accept chat updates from a bridge process on `POST /api/updates`
//!   (`{"user_id": 1, "text": "Status"}`) and feed them to the
//!   [`ConversationService`](vacbot_app::services::conversation::ConversationService)
//! - Answer with the reply text, its menu affordance and the sender's next
//!   state, or `204 No Content` when the input matched nothing
//! - Expose `GET /health` for liveness checks
//!
//! ## Dependency rule
//! Depends on `vacbot-app` (for port traits and services) and `vacbot-domain`
//! (for reply types used in response mapping). Never leaks axum types into
//! the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
