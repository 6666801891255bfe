//! Top-level coordinator for the console.
//!
//! [`ViewState`] is the single owner of every component. Front ends call its
//! named transitions, drain the queued [`Request`]s, run them, and feed the
//! [`Completion`]s back through [`ViewState::apply`]. Cross-component moves,
//! such as leaving an hour drill-down for an account profile, only happen
//! here.

use std::time::{Duration, Instant};

use crate::config::ConsoleConfig;
use crate::error::{Error, Result};

use super::browser::EntityBrowser;
use super::chat::ChatSession;
use super::drilldown::TimeSeriesDrillDown;
use super::effects::{Completion, Request};
use super::modal::{ClickTarget, ModalStack, Overlay};

/// Which list the sidebar shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    Videos,
    Accounts,
}

impl Section {
    pub fn toggle(self) -> Self {
        match self {
            Section::Videos => Section::Accounts,
            Section::Accounts => Section::Videos,
        }
    }
}

/// Console tunables, usually taken from [`ConsoleConfig`].
#[derive(Debug, Clone)]
pub struct ConsoleSettings {
    pub default_video_id: i64,
    pub risk_page_size: usize,
    pub search_debounce: Duration,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        (&ConsoleConfig::default()).into()
    }
}

impl From<&ConsoleConfig> for ConsoleSettings {
    fn from(config: &ConsoleConfig) -> Self {
        Self {
            default_video_id: config.default_video_id,
            risk_page_size: config.risk_page_size,
            search_debounce: config.search_debounce(),
        }
    }
}

/// A message that must be acknowledged before the console continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

/// Everything the console shows, plus the queue of outgoing requests.
#[derive(Debug)]
pub struct ViewState {
    settings: ConsoleSettings,
    section: Section,
    drill: TimeSeriesDrillDown,
    browser: EntityBrowser,
    modal: ModalStack,
    chat: ChatSession,
    notice: Option<Notice>,
    outbox: Vec<Request>,
}

impl ViewState {
    pub fn new(settings: ConsoleSettings) -> Self {
        Self {
            browser: EntityBrowser::new(settings.risk_page_size, settings.search_debounce),
            settings,
            section: Section::default(),
            drill: TimeSeriesDrillDown::new(),
            modal: ModalStack::new(),
            chat: ChatSession::new(),
            notice: None,
            outbox: Vec::new(),
        }
    }

    // ========== Accessors ==========

    pub fn settings(&self) -> &ConsoleSettings {
        &self.settings
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn drill(&self) -> &TimeSeriesDrillDown {
        &self.drill
    }

    pub fn browser(&self) -> &EntityBrowser {
        &self.browser
    }

    pub fn overlay(&self) -> &Overlay {
        self.modal.overlay()
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Take the requests queued since the last call.
    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    pub fn has_requests(&self) -> bool {
        !self.outbox.is_empty()
    }

    // ========== Lifecycle ==========

    /// Initial load: videos and the unfiltered risk list, independently.
    pub fn bootstrap(&mut self) {
        tracing::info!("Bootstrapping console");
        self.outbox.push(Request::ListVideos);
        let request = self.browser.refresh();
        self.outbox.push(request);
    }

    /// Advance timers (search coalescing).
    pub fn tick(&mut self, now: Instant) {
        if let Some(request) = self.browser.tick(now) {
            self.outbox.push(request);
        }
    }

    // ========== Sections ==========

    pub fn set_section(&mut self, section: Section) {
        self.section = section;
    }

    pub fn toggle_section(&mut self) {
        self.section = self.section.toggle();
    }

    // ========== Videos & drill-down ==========

    /// Switch videos. An open hour drill-down belongs to the old video and
    /// closes with it.
    pub fn select_video(&mut self, id: i64) -> Result<()> {
        let request = self.drill.select_video(id)?;
        if self.modal.hour().is_some() {
            self.close_overlay();
        }
        self.outbox.push(request);
        Ok(())
    }

    pub fn move_chart_cursor(&mut self, delta: isize) {
        self.drill.move_cursor(delta);
    }

    pub fn chart_cursor_to_start(&mut self) {
        self.drill.cursor_to_start();
    }

    pub fn chart_cursor_to_end(&mut self) {
        self.drill.cursor_to_end();
    }

    /// Drill into the hour at chart point `index`, opening its overlay.
    pub fn click_point(&mut self, index: usize) -> Result<()> {
        // The new activity ticket already supersedes any earlier hour, so the
        // previous overlay is dropped without releasing it.
        let selection = self.drill.handle_click(index)?;
        self.modal
            .open_hour(selection.label, selection.bucket, selection.video_title);
        self.outbox.push(selection.request);
        Ok(())
    }

    /// Drill into the hour under the keyboard cursor.
    pub fn drill_at_cursor(&mut self) -> Result<()> {
        self.click_point(self.drill.cursor())
    }

    // ========== Accounts ==========

    /// Change the search query; the list refreshes once typing settles.
    pub fn set_search(&mut self, query: impl Into<String>, now: Instant) {
        if let Some(request) = self.browser.set_search(query.into(), now) {
            self.outbox.push(request);
        }
    }

    pub fn refresh_accounts(&mut self) {
        let request = self.browser.refresh();
        self.outbox.push(request);
    }

    pub fn select_next_account(&mut self) {
        self.browser.select_next();
    }

    pub fn select_previous_account(&mut self) {
        self.browser.select_previous();
    }

    pub fn select_first_account(&mut self) {
        self.browser.select_first();
    }

    pub fn select_last_account(&mut self) {
        self.browser.select_last();
    }

    /// Look up an account; its overlay opens when the detail arrives.
    pub fn select_account(&mut self, username: &str) {
        let request = self.browser.select_entity(username);
        self.outbox.push(request);
    }

    /// Open the account under the list cursor.
    pub fn open_selected_account(&mut self) -> Result<()> {
        let username = self
            .browser
            .selected_user()
            .map(|u| u.username.clone())
            .ok_or(Error::NoSelection("account"))?;
        self.select_account(&username);
        Ok(())
    }

    /// From inside an hour drill-down, jump to one of its accounts.
    ///
    /// The hour overlay closes immediately and its records are dropped.
    pub fn open_account_from_activity(&mut self, username: &str) -> Result<()> {
        if self.modal.hour().is_none() {
            return Err(Error::NoSelection("hour drill-down"));
        }
        self.close_overlay();
        self.select_account(username);
        Ok(())
    }

    /// Jump to the `index`-th account of the open hour drill-down.
    pub fn open_activity_account(&mut self, index: usize) -> Result<()> {
        let username = self
            .modal
            .hour()
            .and_then(|hour| hour.records().get(index))
            .map(|record| record.username.clone())
            .ok_or(Error::NoSelection("activity record"))?;
        self.open_account_from_activity(&username)
    }

    // ========== Overlays ==========

    pub fn open_about(&mut self) {
        let previous = self.modal.open_about();
        self.release_replaced(previous);
    }

    pub fn close_overlay(&mut self) {
        let previous = self.modal.close();
        self.release_replaced(previous);
    }

    /// Route a pointer click while an overlay is open.
    pub fn click_overlay(&mut self, target: ClickTarget) {
        if let Some(previous) = self.modal.click(target) {
            self.release_replaced(previous);
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// A replaced hour drill-down stops accepting activity.
    fn release_replaced(&mut self, previous: Overlay) {
        if let Overlay::HourDrillDown(_) = previous {
            self.drill.release_hour();
        }
    }

    // ========== Chat ==========

    pub fn push_chat_input(&mut self, ch: char) {
        self.chat.push_input(ch);
    }

    pub fn pop_chat_input(&mut self) {
        self.chat.pop_input();
    }

    /// Send the chat input buffer.
    pub fn submit_chat(&mut self) {
        if let Some(request) = self.chat.submit() {
            self.outbox.push(request);
        }
    }

    /// Send `text` to the assistant directly.
    pub fn send_chat(&mut self, text: &str) {
        if let Some(request) = self.chat.send(text) {
            self.outbox.push(request);
        }
    }

    // ========== Completions ==========

    /// Apply the outcome of a request issued earlier.
    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Videos(Ok(videos)) => {
                let preferred = self.settings.default_video_id;
                if let Some(request) = self.drill.on_videos_loaded(videos, preferred) {
                    self.outbox.push(request);
                }
            }
            Completion::Videos(Err(e)) => {
                tracing::warn!(error = %e, "Failed to load videos");
            }
            Completion::LikesSeries {
                ticket,
                video_id,
                result,
            } => {
                self.drill.on_series_loaded(ticket, video_id, result);
            }
            Completion::RiskUsers { ticket, result } => {
                self.browser.on_users_loaded(ticket, result);
            }
            Completion::UserDetail {
                ticket,
                username,
                result,
            } => {
                if !self.browser.accepts_detail(ticket) {
                    tracing::debug!(%ticket, username = %username, "Discarding stale account detail");
                    return;
                }
                match result {
                    Ok(detail) => {
                        let previous = self.modal.open_account(detail);
                        self.release_replaced(previous);
                    }
                    Err(e) => {
                        tracing::warn!(username = %username, error = %e, "Failed to load account detail");
                        let message = if e.is_not_found() {
                            format!("User not found: {}", username)
                        } else {
                            format!("Could not load account {}", username)
                        };
                        self.notice = Some(Notice { message });
                    }
                }
            }
            Completion::HourActivity { ticket, result } => {
                if !self.drill.accepts_activity(ticket) {
                    tracing::debug!(%ticket, "Discarding stale hour activity");
                    return;
                }
                let records = result.unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Failed to load hour activity");
                    Vec::new()
                });
                self.modal.set_activity(records);
            }
            Completion::Chat { ticket, result } => {
                self.chat.on_reply(ticket, result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ticket::Ticket;
    use crate::types::{HourActivityRecord, LikesSeries, RiskUser, UserDetail, Video};

    fn video(id: i64) -> Video {
        Video {
            id,
            title: format!("Video {id}"),
            archetype: "viral".to_string(),
            upload_date: None,
        }
    }

    fn detail(name: &str) -> UserDetail {
        serde_json::from_value(serde_json::json!({
            "username": name,
            "created_at": "2025-12-05T10:00:00",
            "total_likes": 12
        }))
        .unwrap()
    }

    fn record(name: &str) -> HourActivityRecord {
        HourActivityRecord {
            username: name.to_string(),
            risk_label: "Sleeper Pattern".to_string(),
            timestamp: "2025-12-06T14:05:09".to_string(),
            is_bot: true,
            created_at: None,
        }
    }

    /// Console with videos 5 and 20 loaded and video 20's series ready.
    fn ready_console() -> ViewState {
        let mut state = ViewState::new(ConsoleSettings {
            search_debounce: Duration::ZERO,
            ..Default::default()
        });
        state.bootstrap();
        state.take_requests();
        state.apply(Completion::Videos(Ok(vec![video(5), video(20)])));

        let requests = state.take_requests();
        let [Request::LikesSeries { ticket, video_id }] = requests.as_slice() else {
            panic!("expected one series request, got {requests:?}");
        };
        state.apply(Completion::LikesSeries {
            ticket: *ticket,
            video_id: *video_id,
            result: Ok(LikesSeries {
                labels: vec!["2025-12-06 13:00".into(), "2025-12-06 14:00".into()],
                data: vec![3, 250],
            }),
        });
        state
    }

    fn only_request(state: &mut ViewState) -> Request {
        let mut requests = state.take_requests();
        assert_eq!(requests.len(), 1, "expected one request, got {requests:?}");
        requests.remove(0)
    }

    fn ticket_of(request: &Request) -> Ticket {
        match request {
            Request::LikesSeries { ticket, .. }
            | Request::RiskUsers { ticket, .. }
            | Request::UserDetail { ticket, .. }
            | Request::HourActivity { ticket, .. }
            | Request::Chat { ticket, .. } => *ticket,
            Request::ListVideos => panic!("list videos has no ticket"),
        }
    }

    #[test]
    fn test_bootstrap_issues_videos_and_risk_list() {
        let mut state = ViewState::new(ConsoleSettings::default());
        state.bootstrap();
        let requests = state.take_requests();

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], Request::ListVideos);
        assert!(matches!(
            requests[1],
            Request::RiskUsers {
                limit: 50,
                search: None,
                ..
            }
        ));
        assert!(!state.has_requests());
    }

    #[test]
    fn test_bootstrap_selects_designated_video() {
        let state = ready_console();
        assert_eq!(state.drill().selected_id(), Some(20));
    }

    #[test]
    fn test_click_opens_hour_overlay_loading() {
        let mut state = ready_console();
        state.click_point(1).unwrap();

        let request = only_request(&mut state);
        assert!(matches!(&request, Request::HourActivity { video_id: 20, hour, .. } if hour.as_str() == "2025-12-06 14"));

        let Overlay::HourDrillDown(hour) = state.overlay() else {
            panic!("expected hour overlay");
        };
        assert_eq!(hour.label, "2025-12-06 14:00");
        assert!(hour.is_loading());
    }

    #[test]
    fn test_empty_hour_is_distinct_from_loading() {
        let mut state = ready_console();
        state.click_point(0).unwrap();
        let request = only_request(&mut state);

        state.apply(Completion::HourActivity {
            ticket: ticket_of(&request),
            result: Ok(vec![]),
        });
        let Overlay::HourDrillDown(hour) = state.overlay() else {
            panic!("expected hour overlay");
        };
        assert!(!hour.is_loading());
        assert!(hour.is_empty_result());
    }

    #[test]
    fn test_failed_hour_clears_loading_with_empty_list() {
        let mut state = ready_console();
        state.click_point(0).unwrap();
        let request = only_request(&mut state);

        state.apply(Completion::HourActivity {
            ticket: ticket_of(&request),
            result: Err(Error::Gateway("boom".into())),
        });
        let Overlay::HourDrillDown(hour) = state.overlay() else {
            panic!("expected hour overlay");
        };
        assert!(!hour.is_loading());
        assert!(hour.records().is_empty());
    }

    #[test]
    fn test_closed_hour_ignores_late_activity() {
        let mut state = ready_console();
        state.click_point(1).unwrap();
        let request = only_request(&mut state);
        state.close_overlay();

        state.apply(Completion::HourActivity {
            ticket: ticket_of(&request),
            result: Ok(vec![record("late")]),
        });
        assert_eq!(state.overlay(), &Overlay::Closed);

        // Reopening a new hour must not pick up the stale records either.
        state.click_point(0).unwrap();
        state.apply(Completion::HourActivity {
            ticket: ticket_of(&request),
            result: Ok(vec![record("late")]),
        });
        assert!(state.overlay() != &Overlay::Closed);
        if let Overlay::HourDrillDown(hour) = state.overlay() {
            assert!(hour.is_loading());
        }
    }

    #[test]
    fn test_activity_account_replaces_hour_overlay() {
        let mut state = ready_console();
        state.click_point(1).unwrap();
        let request = only_request(&mut state);
        state.apply(Completion::HourActivity {
            ticket: ticket_of(&request),
            result: Ok(vec![record("user_4411"), record("user_9000")]),
        });

        state.open_activity_account(0).unwrap();
        assert_eq!(state.overlay(), &Overlay::Closed);

        let request = only_request(&mut state);
        assert!(matches!(&request, Request::UserDetail { username, .. } if username == "user_4411"));

        state.apply(Completion::UserDetail {
            ticket: ticket_of(&request),
            username: "user_4411".to_string(),
            result: Ok(detail("user_4411")),
        });
        let Overlay::AccountDetail(user) = state.overlay() else {
            panic!("expected account overlay");
        };
        assert_eq!(user.username, "user_4411");
    }

    #[test]
    fn test_account_from_activity_requires_hour_overlay() {
        let mut state = ready_console();
        assert!(state.open_account_from_activity("user_1").is_err());
        assert!(!state.has_requests());
    }

    #[test]
    fn test_detail_opens_over_hour_directly() {
        let mut state = ready_console();
        state.select_account("user_1");
        let detail_request = only_request(&mut state);

        state.click_point(1).unwrap();
        state.take_requests();
        state.apply(Completion::UserDetail {
            ticket: ticket_of(&detail_request),
            username: "user_1".to_string(),
            result: Ok(detail("user_1")),
        });
        assert!(matches!(state.overlay(), Overlay::AccountDetail(_)));
    }

    #[test]
    fn test_missing_account_raises_notice_and_keeps_overlay() {
        let mut state = ready_console();
        state.open_about();
        state.select_account("ghost");
        let request = only_request(&mut state);

        state.apply(Completion::UserDetail {
            ticket: ticket_of(&request),
            username: "ghost".to_string(),
            result: Err(Error::NotFound("user ghost".into())),
        });
        assert_eq!(state.overlay(), &Overlay::About);
        assert_eq!(state.notice().unwrap().message, "User not found: ghost");

        state.dismiss_notice();
        assert!(state.notice().is_none());
    }

    #[test]
    fn test_stale_detail_is_ignored() {
        let mut state = ready_console();
        state.select_account("first");
        let first = only_request(&mut state);
        state.select_account("second");
        let second = only_request(&mut state);

        state.apply(Completion::UserDetail {
            ticket: ticket_of(&second),
            username: "second".to_string(),
            result: Ok(detail("second")),
        });
        state.apply(Completion::UserDetail {
            ticket: ticket_of(&first),
            username: "first".to_string(),
            result: Ok(detail("first")),
        });
        let Overlay::AccountDetail(user) = state.overlay() else {
            panic!("expected account overlay");
        };
        assert_eq!(user.username, "second");
    }

    #[test]
    fn test_search_reset_returns_unfiltered_list() {
        let mut state = ready_console();
        let now = Instant::now();
        state.set_search("x", now);
        state.set_search("", now);

        let requests = state.take_requests();
        assert_eq!(requests.len(), 2);
        assert!(matches!(
            requests[1],
            Request::RiskUsers {
                limit: 50,
                search: None,
                ..
            }
        ));
    }

    #[test]
    fn test_open_selected_account_uses_cursor() {
        let mut state = ready_console();
        assert!(state.open_selected_account().is_err());

        state.refresh_accounts();
        let request = only_request(&mut state);
        let users: Vec<RiskUser> = serde_json::from_value(serde_json::json!([
            {"id": 1, "username": "a", "risk_score": 100, "alert_reason": "New Account Velocity"},
            {"id": 2, "username": "b", "risk_score": 0, "alert_reason": "Normal"}
        ]))
        .unwrap();
        state.apply(Completion::RiskUsers {
            ticket: ticket_of(&request),
            result: Ok(users),
        });

        state.select_next_account();
        state.open_selected_account().unwrap();
        let request = only_request(&mut state);
        assert!(matches!(&request, Request::UserDetail { username, .. } if username == "b"));
    }

    #[test]
    fn test_scrim_click_closes_overlay() {
        let mut state = ready_console();
        state.click_point(1).unwrap();
        let request = only_request(&mut state);

        state.click_overlay(ClickTarget::Content);
        assert!(matches!(state.overlay(), Overlay::HourDrillDown(_)));

        state.click_overlay(ClickTarget::Scrim);
        assert_eq!(state.overlay(), &Overlay::Closed);
        state.apply(Completion::HourActivity {
            ticket: ticket_of(&request),
            result: Ok(vec![record("late")]),
        });
        assert_eq!(state.overlay(), &Overlay::Closed);
    }

    #[test]
    fn test_chat_round_trip_through_controller() {
        let mut state = ViewState::new(ConsoleSettings::default());
        for ch in "hi".chars() {
            state.push_chat_input(ch);
        }
        state.submit_chat();
        let request = only_request(&mut state);
        assert!(state.chat().pending());

        state.apply(Completion::Chat {
            ticket: ticket_of(&request),
            result: Err(Error::Aborted),
        });
        assert!(!state.chat().pending());
        assert_eq!(state.chat().transcript().len(), 3);
    }

    #[test]
    fn test_switching_video_closes_hour_and_drops_its_activity() {
        let mut state = ready_console();
        state.click_point(1).unwrap();
        let activity = only_request(&mut state);

        state.select_video(5).unwrap();
        assert_eq!(state.overlay(), &Overlay::Closed);
        assert!(matches!(
            only_request(&mut state),
            Request::LikesSeries { video_id: 5, .. }
        ));

        state.apply(Completion::HourActivity {
            ticket: ticket_of(&activity),
            result: Ok(vec![record("late")]),
        });
        assert_eq!(state.overlay(), &Overlay::Closed);
    }

    #[test]
    fn test_switching_video_keeps_other_overlays() {
        let mut state = ready_console();
        state.open_about();
        state.select_video(5).unwrap();
        assert_eq!(state.overlay(), &Overlay::About);
    }

    #[test]
    fn test_section_toggle() {
        let mut state = ViewState::new(ConsoleSettings::default());
        assert_eq!(state.section(), Section::Videos);
        state.toggle_section();
        assert_eq!(state.section(), Section::Accounts);
        state.set_section(Section::Videos);
        assert_eq!(state.section(), Section::Videos);
    }
}
