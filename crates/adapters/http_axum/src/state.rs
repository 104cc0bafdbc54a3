//! Shared application state for axum handlers.

use std::sync::Arc;

use vacbot_app::ports::Vacuum;
use vacbot_app::services::conversation::ConversationService;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the vacuum type itself does not need
/// to be `Clone`; only the `Arc` wrapper is cloned.
pub struct AppState<V> {
    /// Session state machine for every chat user.
    pub conversation: Arc<ConversationService<V>>,
}

impl<V> Clone for AppState<V> {
    fn clone(&self) -> Self {
        Self {
            conversation: Arc::clone(&self.conversation),
        }
    }
}

impl<V> AppState<V>
where
    V: Vacuum + 'static,
{
    /// Create a new application state from a service instance.
    pub fn new(conversation: ConversationService<V>) -> Self {
        Self {
            conversation: Arc::new(conversation),
        }
    }
}
