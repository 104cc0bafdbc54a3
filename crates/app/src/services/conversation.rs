//! Conversation service — turns chat messages into device commands.
//!
//! Every inbound message goes through the access guard (for the entry
//! command) and is then routed to the handler of the sender's current
//! [`SessionState`]. Handlers may call the [`Vacuum`] port and consult the
//! [`ZoneRegistry`], and always produce either a [`Turn`] or
//! [`Outcome::Unmatched`] when the input has no transition.
//!
//! Messages from the same identity are handled one at a time; distinct
//! identities run concurrently. Device serialization is the job of
//! [`SerializedVacuum`](crate::serialized::SerializedVacuum), not of this
//! service.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use vacbot_domain::access::{AccessGuard, UserId};
use vacbot_domain::error::VacBotError;
use vacbot_domain::fan_level::FanLevel;
use vacbot_domain::menu::{Menu, Reply};
use vacbot_domain::session::{MainMenuChoice, Session, SessionState};
use vacbot_domain::zone_registry::ZoneRegistry;

use crate::ports::Vacuum;

/// Entry command.
pub const START_COMMAND: &str = "start";
/// Cancellation command.
pub const CANCEL_COMMAND: &str = "cancel";

pub const MAIN_MENU_TEXT: &str = "Main menu";
pub const SELECT_FAN_TEXT: &str = "Select fan speed!";
pub const SELECT_ZONE_TEXT: &str = "Select zone!";
pub const CANCELED_TEXT: &str = "Canceled...";
pub const ERROR_TEXT: &str = "Error";
pub const HOME_TEXT: &str = "Vacuum cleaner goes back to the dock...";

/// A message delivered by the chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub user: UserId,
    pub text: String,
}

impl fmt::Display for Inbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{user: {}, text: {:?}}}", self.user, self.text)
    }
}

/// The reply to one message and the state the sender is left in.
///
/// `next` is `None` when the sender has no session afterwards (terminal
/// reply, cancellation or access denied).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub reply: Reply,
    pub next: Option<SessionState>,
}

/// Result of routing one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Handled(Turn),
    /// No transition is defined for this input; nothing changed and no
    /// device call was made. The transport decides what to show.
    Unmatched,
}

type Slot = Arc<tokio::sync::Mutex<Option<Session>>>;

/// Per-identity session state machine.
pub struct ConversationService<V> {
    vacuum: V,
    zones: ZoneRegistry,
    guard: AccessGuard,
    main_menu: Menu,
    fan_menu: Menu,
    zone_menu: Menu,
    // Slots are only created for identities that passed the guard, and are
    // dropped again when their conversation ends.
    sessions: Mutex<HashMap<UserId, Slot>>,
}

impl<V: Vacuum> ConversationService<V> {
    /// Create a new service. Menus are derived once from the fixed
    /// enumerations and the registry.
    pub fn new(vacuum: V, zones: ZoneRegistry, guard: AccessGuard) -> Self {
        let main_labels: Vec<&str> = MainMenuChoice::ALL.iter().map(|c| c.label()).collect();
        let fan_labels: Vec<&str> = FanLevel::ALL.iter().map(|l| l.name()).collect();
        let zone_labels: Vec<&str> = zones.names().collect();
        let main_menu = Menu::grid(main_labels.as_slice());
        let fan_menu = Menu::grid(fan_labels.as_slice());
        let zone_menu = Menu::grid(zone_labels.as_slice());

        Self {
            vacuum,
            zones,
            guard,
            main_menu,
            fan_menu,
            zone_menu,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Route one inbound message: `/start` and `/cancel` commands first,
    /// then the handler of the sender's current state.
    ///
    /// # Errors
    ///
    /// Returns [`VacBotError::Transition`] if a handler attempts a
    /// transition the session does not allow.
    #[tracing::instrument(skip(self, inbound), fields(user = %inbound.user))]
    pub async fn dispatch(&self, inbound: &Inbound) -> Result<Outcome, VacBotError> {
        match parse_command(&inbound.text) {
            Some(START_COMMAND) => Ok(Outcome::Handled(self.start(inbound.user).await)),
            Some(CANCEL_COMMAND) => Ok(self.cancel(inbound.user).await),
            _ => self.handle_message(inbound.user, &inbound.text).await,
        }
    }

    /// Entry handler. Admits allow-listed identities and (re)opens their
    /// session at the main menu.
    pub async fn start(&self, user: UserId) -> Turn {
        if let Err(denied) = self.guard.check(user) {
            tracing::warn!(%user, "access denied");
            return Turn {
                reply: Reply::keep(denied.to_string()),
                next: None,
            };
        }

        tracing::info!(%user, "bot command: start");
        let slot = self.slot_or_insert(user);
        let mut session = slot.lock().await;
        *session = Some(Session::start());
        // the slot may have been released while this call waited for it
        self.adopt(user, &slot);

        Turn {
            reply: Reply::with_menu(MAIN_MENU_TEXT, self.main_menu.clone()),
            next: Some(SessionState::MainMenu),
        }
    }

    /// Cancellation handler, valid from any non-terminal state.
    pub async fn cancel(&self, user: UserId) -> Outcome {
        let Some(slot) = self.slot(user) else {
            return Outcome::Unmatched;
        };
        let mut session = slot.lock().await;
        if session.take().is_none() {
            return Outcome::Unmatched;
        }
        self.release(user, &slot);

        tracing::info!(%user, "bot command: cancel");
        Outcome::Handled(finish(CANCELED_TEXT))
    }

    /// Feed free text to the handler of the sender's current state.
    ///
    /// # Errors
    ///
    /// Returns [`VacBotError::Transition`] if the session rejects the
    /// transition the handler attempts.
    pub async fn handle_message(&self, user: UserId, text: &str) -> Result<Outcome, VacBotError> {
        let Some(slot) = self.slot(user) else {
            return Ok(Outcome::Unmatched);
        };
        let mut entry = slot.lock().await;
        let Some(session) = entry.as_mut() else {
            return Ok(Outcome::Unmatched);
        };

        let turn = match session.state() {
            SessionState::MainMenu => {
                let Ok(choice) = text.parse::<MainMenuChoice>() else {
                    return Ok(Outcome::Unmatched);
                };
                self.on_main_menu(session, choice).await?
            }
            SessionState::SelectFan => {
                let Ok(level) = text.parse::<FanLevel>() else {
                    return Ok(Outcome::Unmatched);
                };
                self.on_select_fan(session, level).await?
            }
            SessionState::SelectZone => {
                if self.zones.get(text).is_none() {
                    return Ok(Outcome::Unmatched);
                }
                self.on_select_zone(text).await
            }
        };

        if turn.next.is_none() {
            *entry = None;
            self.release(user, &slot);
        }
        Ok(Outcome::Handled(turn))
    }

    /// Diagnostic reply for a failed update. Re-presents the main menu
    /// without touching the sender's session.
    pub fn error_reply(&self, update: &impl fmt::Display, error: &impl fmt::Display) -> Reply {
        tracing::error!(%update, %error, "update caused error");
        Reply::with_menu(
            format!("Update \"{update}\" caused error \"{error}\"!"),
            self.main_menu.clone(),
        )
    }

    /// Current state of `user`'s session, if any.
    pub async fn session_state(&self, user: UserId) -> Option<SessionState> {
        let slot = self.slot(user)?;
        let session = slot.lock().await;
        session.as_ref().map(Session::state)
    }

    async fn on_main_menu(
        &self,
        session: &mut Session,
        choice: MainMenuChoice,
    ) -> Result<Turn, VacBotError> {
        match choice {
            MainMenuChoice::Status => {
                tracing::info!("bot command: status");
                let text = match self.vacuum.status().await {
                    Ok(state) => format!("State: {state}"),
                    Err(failure) => {
                        tracing::error!(%failure, "status query failed");
                        ERROR_TEXT.to_string()
                    }
                };
                Ok(finish(text))
            }
            MainMenuChoice::Home => {
                tracing::info!("bot command: home");
                let text = match self.vacuum.home().await {
                    Ok(()) => HOME_TEXT,
                    Err(failure) => {
                        tracing::error!(%failure, "return home failed");
                        ERROR_TEXT
                    }
                };
                Ok(finish(text))
            }
            MainMenuChoice::ZoneCleaning => {
                tracing::info!("bot command: select fan");
                session.begin_zone_cleaning()?;
                Ok(Turn {
                    reply: Reply::with_menu(SELECT_FAN_TEXT, self.fan_menu.clone()),
                    next: Some(SessionState::SelectFan),
                })
            }
        }
    }

    async fn on_select_fan(
        &self,
        session: &mut Session,
        level: FanLevel,
    ) -> Result<Turn, VacBotError> {
        tracing::info!(%level, "bot command: select zone");
        if let Err(failure) = self.vacuum.set_fan_level(level).await {
            tracing::error!(%failure, %level, "setting fan level failed");
        }
        session.apply_fan_level(level)?;
        Ok(Turn {
            reply: Reply::with_menu(SELECT_ZONE_TEXT, self.zone_menu.clone()),
            next: Some(SessionState::SelectZone),
        })
    }

    async fn on_select_zone(&self, name: &str) -> Turn {
        tracing::info!(zone = name, "bot command: cleaning");
        let Some(zone) = self.zones.get(name) else {
            return finish(ERROR_TEXT);
        };
        match self.vacuum.start_zone_cleaning(zone.regions()).await {
            Ok(()) => finish(format!("Start cleaning {}...", zone.name())),
            Err(failure) => {
                tracing::error!(%failure, zone = zone.name(), "zone cleaning failed");
                finish(ERROR_TEXT)
            }
        }
    }

    fn slot(&self, user: UserId) -> Option<Slot> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&user)
            .map(Arc::clone)
    }

    fn slot_or_insert(&self, user: UserId) -> Slot {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(sessions.entry(user).or_default())
    }

    fn adopt(&self, user: UserId, slot: &Slot) {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.insert(user, Arc::clone(slot));
    }

    /// Drop `user`'s entry, unless a newer slot already replaced `slot`.
    fn release(&self, user: UserId, slot: &Slot) {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        if sessions
            .get(&user)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            sessions.remove(&user);
        }
    }
}

fn finish(text: impl Into<String>) -> Turn {
    Turn {
        reply: Reply::finish(text),
        next: None,
    }
}

/// Extract the command name from `/name` or `/name@bot`.
fn parse_command(text: &str) -> Option<&str> {
    let command = text.trim().strip_prefix('/')?;
    let command = command.split_whitespace().next()?;
    Some(command.split('@').next().unwrap_or(command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use vacbot_domain::access::AdminAllowList;
    use vacbot_domain::command::{CommandFailure, CommandResult};
    use vacbot_domain::geometry::{Point, Rectangle};
    use vacbot_domain::menu::ReplyMarkup;
    use vacbot_domain::zone::{CleaningRegion, Zone};

    const ADMIN: UserId = UserId::new(110_086_856);
    const OTHER_ADMIN: UserId = UserId::new(829_623_593);
    const STRANGER: UserId = UserId::new(42);

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Status,
        Pause,
        Home,
        SetFanLevel(u8),
        ZonedClean(Vec<[i32; 5]>),
    }

    #[derive(Default)]
    struct RecordingVacuum {
        calls: StdMutex<Vec<Call>>,
        fail: bool,
    }

    impl RecordingVacuum {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn record(&self, call: Call) -> CommandResult {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                Err(CommandFailure::Timeout)
            } else {
                Ok(())
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Vacuum for RecordingVacuum {
        async fn status(&self) -> CommandResult<String> {
            self.record(Call::Status)?;
            Ok("Charging".to_string())
        }

        async fn pause(&self) -> CommandResult {
            self.record(Call::Pause)
        }

        async fn home(&self) -> CommandResult {
            self.record(Call::Home)
        }

        async fn set_fan_level(&self, level: FanLevel) -> CommandResult {
            self.record(Call::SetFanLevel(level.value()))
        }

        async fn start_zone_cleaning(&self, regions: &[CleaningRegion]) -> CommandResult {
            let _ = self.pause().await;
            self.record(Call::ZonedClean(
                regions.iter().map(CleaningRegion::to_params).collect(),
            ))
        }
    }

    fn kitchen_regions() -> Vec<CleaningRegion> {
        vec![
            CleaningRegion::room(
                Rectangle::new(Point::new(25_500, 25_500), Point::new(28_500, 28_000)).unwrap(),
                1,
            )
            .unwrap(),
            CleaningRegion::door(
                Rectangle::new(Point::new(28_500, 26_000), Point::new(28_800, 26_900)).unwrap(),
            ),
        ]
    }

    fn registry() -> ZoneRegistry {
        let hall = CleaningRegion::area(
            Rectangle::new(Point::new(20_000, 20_000), Point::new(21_000, 24_000)).unwrap(),
            2,
        )
        .unwrap();
        ZoneRegistry::builder()
            .zone(Zone::new("Kitchen", kitchen_regions()).unwrap())
            .zone(Zone::new("Hall", vec![hall]).unwrap())
            .build()
            .unwrap()
    }

    fn service_with(vacuum: RecordingVacuum) -> ConversationService<RecordingVacuum> {
        let admins = AdminAllowList::new([ADMIN, OTHER_ADMIN]).unwrap();
        ConversationService::new(vacuum, registry(), AccessGuard::new(admins))
    }

    fn service() -> ConversationService<RecordingVacuum> {
        service_with(RecordingVacuum::default())
    }

    fn msg(user: UserId, text: &str) -> Inbound {
        Inbound {
            user,
            text: text.to_string(),
        }
    }

    async fn send(svc: &ConversationService<RecordingVacuum>, user: UserId, text: &str) -> Turn {
        match svc.dispatch(&msg(user, text)).await.unwrap() {
            Outcome::Handled(turn) => turn,
            Outcome::Unmatched => panic!("{text:?} was not matched"),
        }
    }

    async fn reach(svc: &ConversationService<RecordingVacuum>, state: SessionState) {
        send(svc, ADMIN, "/start").await;
        if matches!(state, SessionState::SelectFan | SessionState::SelectZone) {
            send(svc, ADMIN, "ZoneCleaning").await;
        }
        if state == SessionState::SelectZone {
            send(svc, ADMIN, "Balanced").await;
        }
        assert_eq!(svc.session_state(ADMIN).await, Some(state));
    }

    #[tokio::test]
    async fn should_run_full_zone_cleaning_scenario() {
        let svc = service();

        let turn = send(&svc, ADMIN, "/start").await;
        assert_eq!(turn.reply.text, "Main menu");
        assert_eq!(turn.reply.menu().unwrap().options().count(), 3);
        assert_eq!(turn.next, Some(SessionState::MainMenu));

        let turn = send(&svc, ADMIN, "ZoneCleaning").await;
        assert_eq!(turn.reply.text, "Select fan speed!");
        assert_eq!(turn.reply.menu().unwrap().options().count(), 5);
        assert_eq!(turn.next, Some(SessionState::SelectFan));

        let turn = send(&svc, ADMIN, "Turbo").await;
        assert_eq!(turn.reply.text, "Select zone!");
        assert_eq!(
            turn.reply.menu().unwrap().options().collect::<Vec<_>>(),
            vec!["Kitchen", "Hall"]
        );
        assert_eq!(turn.next, Some(SessionState::SelectZone));
        assert_eq!(svc.vacuum.calls(), vec![Call::SetFanLevel(75)]);

        let turn = send(&svc, ADMIN, "Kitchen").await;
        assert_eq!(turn.reply.text, "Start cleaning Kitchen...");
        assert_eq!(turn.reply.markup, ReplyMarkup::Remove);
        assert_eq!(turn.next, None);
        assert_eq!(
            svc.vacuum.calls(),
            vec![
                Call::SetFanLevel(75),
                Call::Pause,
                Call::ZonedClean(kitchen_regions().iter().map(CleaningRegion::to_params).collect()),
            ]
        );
        assert_eq!(svc.session_state(ADMIN).await, None);
    }

    #[tokio::test]
    async fn should_deny_stranger_without_creating_session() {
        let svc = service();

        let turn = send(&svc, STRANGER, "/start").await;
        assert!(turn.reply.text.contains("Access denied"));
        assert!(turn.reply.text.contains("42"));
        assert_eq!(turn.next, None);
        assert_eq!(svc.session_state(STRANGER).await, None);

        let outcome = svc.dispatch(&msg(STRANGER, "Status")).await.unwrap();
        assert_eq!(outcome, Outcome::Unmatched);
        assert!(svc.vacuum.calls().is_empty());
    }

    #[tokio::test]
    async fn should_admit_every_admin() {
        let svc = service();
        for admin in [ADMIN, OTHER_ADMIN] {
            let turn = send(&svc, admin, "/start").await;
            assert_eq!(turn.next, Some(SessionState::MainMenu));
        }
    }

    #[tokio::test]
    async fn should_reply_with_state_on_status() {
        let svc = service();
        send(&svc, ADMIN, "/start").await;

        let turn = send(&svc, ADMIN, "Status").await;
        assert_eq!(turn.reply.text, "State: Charging");
        assert_eq!(turn.next, None);
        assert_eq!(svc.session_state(ADMIN).await, None);
    }

    #[tokio::test]
    async fn should_reply_error_when_status_fails() {
        let svc = service_with(RecordingVacuum::failing());
        send(&svc, ADMIN, "/start").await;

        let turn = send(&svc, ADMIN, "Status").await;
        assert_eq!(turn.reply.text, "Error");
        assert_eq!(turn.reply.markup, ReplyMarkup::Remove);
        assert_eq!(svc.session_state(ADMIN).await, None);
    }

    #[tokio::test]
    async fn should_send_vacuum_home() {
        let svc = service();
        send(&svc, ADMIN, "/start").await;

        let turn = send(&svc, ADMIN, "Home").await;
        assert_eq!(turn.reply.text, "Vacuum cleaner goes back to the dock...");
        assert_eq!(svc.vacuum.calls(), vec![Call::Home]);
    }

    #[tokio::test]
    async fn should_reply_error_and_end_when_cleaning_fails() {
        let svc = service_with(RecordingVacuum::failing());
        reach(&svc, SessionState::SelectZone).await;

        let turn = send(&svc, ADMIN, "Hall").await;
        assert_eq!(turn.reply.text, "Error");
        assert_eq!(svc.session_state(ADMIN).await, None);
    }

    #[tokio::test]
    async fn should_cancel_from_every_state() {
        for state in [
            SessionState::MainMenu,
            SessionState::SelectFan,
            SessionState::SelectZone,
        ] {
            let svc = service();
            reach(&svc, state).await;

            let turn = send(&svc, ADMIN, "/cancel").await;
            assert_eq!(turn.reply.text, "Canceled...");
            assert_eq!(turn.reply.markup, ReplyMarkup::Remove);
            assert_eq!(svc.session_state(ADMIN).await, None, "{state}");
        }
    }

    #[tokio::test]
    async fn should_not_match_cancel_without_session() {
        let svc = service();
        let outcome = svc.dispatch(&msg(ADMIN, "/cancel")).await.unwrap();
        assert_eq!(outcome, Outcome::Unmatched);
    }

    #[tokio::test]
    async fn should_ignore_unmatched_input_in_every_state() {
        for (state, input) in [
            (SessionState::MainMenu, "Turbo"),
            (SessionState::SelectFan, "Kitchen"),
            (SessionState::SelectFan, "turbo"),
            (SessionState::SelectZone, "Attic"),
            (SessionState::SelectZone, "Status"),
        ] {
            let svc = service();
            reach(&svc, state).await;
            let before = svc.vacuum.calls();

            let outcome = svc.dispatch(&msg(ADMIN, input)).await.unwrap();
            assert_eq!(outcome, Outcome::Unmatched, "{input} in {state}");
            assert_eq!(svc.session_state(ADMIN).await, Some(state));
            assert_eq!(svc.vacuum.calls(), before);
        }
    }

    #[tokio::test]
    async fn should_not_match_messages_without_session() {
        let svc = service();
        let outcome = svc.dispatch(&msg(ADMIN, "Status")).await.unwrap();
        assert_eq!(outcome, Outcome::Unmatched);
        assert!(svc.vacuum.calls().is_empty());
    }

    #[tokio::test]
    async fn should_apply_fan_level_before_zone_menu_even_when_device_fails() {
        let svc = service_with(RecordingVacuum::failing());
        reach(&svc, SessionState::SelectFan).await;

        let turn = send(&svc, ADMIN, "Mob").await;
        assert_eq!(turn.next, Some(SessionState::SelectZone));
        assert_eq!(svc.vacuum.calls(), vec![Call::SetFanLevel(105)]);
    }

    #[tokio::test]
    async fn should_resolve_zone_case_insensitively_and_echo_display_name() {
        let svc = service();
        reach(&svc, SessionState::SelectZone).await;

        let turn = send(&svc, ADMIN, "kitchen").await;
        assert_eq!(turn.reply.text, "Start cleaning Kitchen...");
    }

    #[tokio::test]
    async fn should_restart_session_at_main_menu() {
        let svc = service();
        reach(&svc, SessionState::SelectZone).await;

        let turn = send(&svc, ADMIN, "/start").await;
        assert_eq!(turn.next, Some(SessionState::MainMenu));
        assert_eq!(
            svc.session_state(ADMIN).await,
            Some(SessionState::MainMenu)
        );
    }

    #[tokio::test]
    async fn should_keep_sessions_of_different_users_apart() {
        let svc = service();
        reach(&svc, SessionState::SelectFan).await;
        send(&svc, OTHER_ADMIN, "/start").await;

        assert_eq!(svc.session_state(ADMIN).await, Some(SessionState::SelectFan));
        assert_eq!(
            svc.session_state(OTHER_ADMIN).await,
            Some(SessionState::MainMenu)
        );
    }

    fn open_slots(svc: &ConversationService<RecordingVacuum>) -> usize {
        svc.sessions.lock().unwrap().len()
    }

    #[tokio::test]
    async fn should_forget_users_whose_conversation_ended() {
        let svc = service();

        reach(&svc, SessionState::MainMenu).await;
        send(&svc, ADMIN, "Status").await;
        assert_eq!(open_slots(&svc), 0);

        reach(&svc, SessionState::SelectZone).await;
        send(&svc, ADMIN, "Hall").await;
        assert_eq!(open_slots(&svc), 0);

        reach(&svc, SessionState::SelectFan).await;
        send(&svc, ADMIN, "/cancel").await;
        assert_eq!(open_slots(&svc), 0);

        send(&svc, STRANGER, "/start").await;
        assert_eq!(open_slots(&svc), 0);
    }

    #[tokio::test]
    async fn should_keep_slot_only_for_open_conversations() {
        let svc = service();
        reach(&svc, SessionState::SelectFan).await;
        send(&svc, OTHER_ADMIN, "/start").await;
        send(&svc, OTHER_ADMIN, "Home").await;

        assert_eq!(open_slots(&svc), 1);
        assert_eq!(svc.session_state(ADMIN).await, Some(SessionState::SelectFan));

        send(&svc, OTHER_ADMIN, "/start").await;
        assert_eq!(open_slots(&svc), 2);
    }

    #[tokio::test]
    async fn should_build_error_reply_with_main_menu() {
        let svc = service();
        reach(&svc, SessionState::SelectFan).await;

        let update = msg(ADMIN, "Turbo");
        let reply = svc.error_reply(&update, &"boom");
        assert_eq!(
            reply.text,
            "Update \"{user: 110086856, text: \"Turbo\"}\" caused error \"boom\"!"
        );
        assert_eq!(reply.menu(), Some(&svc.main_menu));
        assert_eq!(svc.session_state(ADMIN).await, Some(SessionState::SelectFan));
    }

    #[test]
    fn should_parse_commands_with_bot_suffix() {
        assert_eq!(parse_command("/start"), Some("start"));
        assert_eq!(parse_command(" /cancel@vacbot "), Some("cancel"));
        assert_eq!(parse_command("/start now"), Some("start"));
        assert_eq!(parse_command("start"), None);
        assert_eq!(parse_command("/"), None);
    }
}
