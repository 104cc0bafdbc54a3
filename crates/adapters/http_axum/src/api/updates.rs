//! Chat bridge webhook.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use vacbot_app::ports::Vacuum;
use vacbot_app::services::conversation::{ConversationService, Inbound, Outcome, Turn};
use vacbot_domain::access::UserId;
use vacbot_domain::error::VacBotError;
use vacbot_domain::menu::Reply;
use vacbot_domain::session::SessionState;

use crate::error::ApiError;
use crate::state::AppState;

/// One chat message as forwarded by the bridge.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub user_id: UserId,
    pub text: String,
}

/// What the bridge should send back to the user.
#[derive(Debug, Serialize)]
pub struct UpdateReply {
    pub reply: Reply,
    /// State the sender is left in, `null` once the conversation ended.
    pub next: Option<SessionState>,
}

impl From<Turn> for UpdateReply {
    fn from(turn: Turn) -> Self {
        Self {
            reply: turn.reply,
            next: turn.next,
        }
    }
}

/// Possible responses from the updates endpoint.
pub enum UpdateResponse {
    Ok(Json<UpdateReply>),
    /// The input matched no transition; the bridge stays silent.
    NoContent,
}

impl IntoResponse for UpdateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `POST /api/updates`
pub async fn handle<V>(
    State(state): State<AppState<V>>,
    body: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<UpdateResponse, ApiError>
where
    V: Vacuum + 'static,
{
    let Json(request) = body?;
    let inbound = Inbound {
        user: request.user_id,
        text: request.text,
    };

    match state.conversation.dispatch(&inbound).await {
        Ok(Outcome::Handled(turn)) => Ok(UpdateResponse::Ok(Json(turn.into()))),
        Ok(Outcome::Unmatched) => Ok(UpdateResponse::NoContent),
        Err(err) => Ok(recover(&state.conversation, &inbound, &err).await),
    }
}

/// Answer a failed update with the diagnostic reply. The sender's session
/// is left as it was.
async fn recover<V: Vacuum>(
    conversation: &ConversationService<V>,
    inbound: &Inbound,
    err: &VacBotError,
) -> UpdateResponse {
    let reply = conversation.error_reply(inbound, err);
    let next = conversation.session_state(inbound.user).await;
    UpdateResponse::Ok(Json(UpdateReply { reply, next }))
}
