//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod updates;

use axum::Router;
use axum::routing::post;

use vacbot_app::ports::Vacuum;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<V>() -> Router<AppState<V>>
where
    V: Vacuum + 'static,
{
    Router::new().route("/updates", post(updates::handle::<V>))
}
