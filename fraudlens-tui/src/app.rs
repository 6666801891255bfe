//! Application state for the TUI.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use fraudlens_core::console::{
    resolve_point, ClickTarget, Completion, Overlay, Request, Section, SeriesState,
};
use fraudlens_core::{ConsoleSettings, ViewState};
use ratatui::layout::{Position, Rect};

/// Where typed characters go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    /// Keys drive navigation
    #[default]
    Browse,
    /// Keys edit the account search query
    Search,
    /// Keys edit the chat message
    Chat,
}

/// Screen regions recorded during the last render, for mouse hit-testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitAreas {
    /// Plot region of the likes chart, excluding axes and labels
    pub chart_plot: Option<Rect>,
    /// Content box of the open overlay
    pub overlay: Option<Rect>,
    /// Record rows of the hour drill-down table
    pub activity_rows: Option<Rect>,
    /// Index of the first record shown in `activity_rows`
    pub activity_offset: usize,
}

/// Main application state.
pub struct App {
    /// Console engine
    pub state: ViewState,
    /// Current input focus
    pub focus: Focus,
    /// Highlighted row in the video list
    pub video_cursor: usize,
    /// Highlighted row inside the hour drill-down
    pub hour_cursor: usize,
    /// Regions from the last frame
    pub hit_areas: HitAreas,
    /// Whether the app should exit
    pub should_quit: bool,
}

impl App {
    /// Create a new App and queue the initial loads.
    pub fn new(settings: ConsoleSettings) -> Self {
        let mut state = ViewState::new(settings);
        state.bootstrap();
        Self {
            state,
            focus: Focus::default(),
            video_cursor: 0,
            hour_cursor: 0,
            hit_areas: HitAreas::default(),
            should_quit: false,
        }
    }

    /// Advance timers (call once per loop iteration).
    pub fn tick(&mut self) {
        self.state.tick(Instant::now());
    }

    /// Requests queued since the last call.
    pub fn take_requests(&mut self) -> Vec<Request> {
        self.state.take_requests()
    }

    /// Apply a finished request.
    pub fn apply(&mut self, completion: Completion) {
        let videos_arrived = matches!(completion, Completion::Videos(Ok(_)));
        self.state.apply(completion);
        if videos_arrived {
            self.sync_video_cursor();
        }
    }

    /// Put the video cursor on the selected video.
    fn sync_video_cursor(&mut self) {
        let drill = self.state.drill();
        if let Some(id) = drill.selected_id() {
            if let Some(index) = drill.videos().iter().position(|v| v.id == id) {
                self.video_cursor = index;
            }
        }
    }

    /// Whether a blocking notice is up.
    pub fn has_notice(&self) -> bool {
        self.state.notice().is_some()
    }

    // ========== Keyboard ==========

    /// Handle keyboard input.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // A notice blocks everything until acknowledged.
        if self.has_notice() {
            self.state.dismiss_notice();
            return;
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key),
            Focus::Chat => self.handle_chat_key(key),
            Focus::Browse if matches!(self.state.overlay(), Overlay::Closed) => {
                match self.state.section() {
                    Section::Videos => self.handle_videos_key(key),
                    Section::Accounts => self.handle_accounts_key(key),
                }
            }
            Focus::Browse => self.handle_overlay_key(key),
        }
    }

    /// Keys shared by both sections. Returns true when handled.
    fn handle_global_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.state.toggle_section(),
            KeyCode::Char('?') => self.state.open_about(),
            KeyCode::Char('c') => self.focus = Focus::Chat,
            _ => return false,
        }
        true
    }

    /// Handle keyboard input in the videos section.
    fn handle_videos_key(&mut self, key: KeyEvent) {
        if self.handle_global_key(key) {
            return;
        }
        let video_count = self.state.drill().videos().len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if video_count > 0 {
                    self.video_cursor = (self.video_cursor + 1).min(video_count - 1);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.video_cursor = self.video_cursor.saturating_sub(1);
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.video_cursor = 0;
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.video_cursor = video_count.saturating_sub(1);
            }
            KeyCode::Enter => {
                let id = self.state.drill().videos().get(self.video_cursor).map(|v| v.id);
                if let Some(id) = id {
                    if let Err(e) = self.state.select_video(id) {
                        tracing::debug!(error = %e, "Cannot select video");
                    }
                }
            }
            KeyCode::Left | KeyCode::Char('h') => self.state.move_chart_cursor(-1),
            KeyCode::Right | KeyCode::Char('l') => self.state.move_chart_cursor(1),
            KeyCode::Char('[') => self.state.chart_cursor_to_start(),
            KeyCode::Char(']') => self.state.chart_cursor_to_end(),
            KeyCode::Char(' ') | KeyCode::Char('d') => {
                self.hour_cursor = 0;
                if let Err(e) = self.state.drill_at_cursor() {
                    tracing::debug!(error = %e, "Cannot drill into hour");
                }
            }
            _ => {}
        }
    }

    /// Handle keyboard input in the accounts section.
    fn handle_accounts_key(&mut self, key: KeyEvent) {
        if self.handle_global_key(key) {
            return;
        }
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.state.select_next_account(),
            KeyCode::Up | KeyCode::Char('k') => self.state.select_previous_account(),
            KeyCode::Home | KeyCode::Char('g') => self.state.select_first_account(),
            KeyCode::End | KeyCode::Char('G') => self.state.select_last_account(),
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Char('r') => self.state.refresh_accounts(),
            KeyCode::Enter => {
                if let Err(e) = self.state.open_selected_account() {
                    tracing::debug!(error = %e, "No account to open");
                }
            }
            _ => {}
        }
    }

    /// Handle keyboard input while an overlay is open.
    fn handle_overlay_key(&mut self, key: KeyEvent) {
        let record_count = match self.state.overlay() {
            Overlay::HourDrillDown(hour) => hour.records().len(),
            _ => 0,
        };
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.state.close_overlay(),
            KeyCode::Down | KeyCode::Char('j') if record_count > 0 => {
                self.hour_cursor = (self.hour_cursor + 1).min(record_count - 1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.hour_cursor = self.hour_cursor.saturating_sub(1);
            }
            KeyCode::Enter if record_count > 0 => {
                if let Err(e) = self.state.open_activity_account(self.hour_cursor) {
                    tracing::debug!(error = %e, "Cannot open account from hour");
                }
            }
            _ => {}
        }
    }

    /// Handle keyboard input while editing the search query.
    fn handle_search_key(&mut self, key: KeyEvent) {
        let mut query = self.state.browser().query().to_string();
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.focus = Focus::Browse;
                return;
            }
            KeyCode::Backspace => {
                if query.pop().is_none() {
                    return;
                }
            }
            KeyCode::Char(ch) => query.push(ch),
            _ => return,
        }
        self.state.set_search(query, Instant::now());
    }

    /// Handle keyboard input while composing a chat message.
    fn handle_chat_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.focus = Focus::Browse,
            KeyCode::Enter => self.state.submit_chat(),
            KeyCode::Backspace => self.state.pop_chat_input(),
            KeyCode::Char(ch) => self.state.push_chat_input(ch),
            _ => {}
        }
    }

    // ========== Mouse ==========

    /// Handle a mouse event.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if self.has_notice() {
            self.state.dismiss_notice();
            return;
        }

        let position = Position::new(mouse.column, mouse.row);

        if !matches!(self.state.overlay(), Overlay::Closed) {
            let target = match self.hit_areas.overlay {
                Some(area) if area.contains(position) => ClickTarget::Content,
                _ => ClickTarget::Scrim,
            };
            if target == ClickTarget::Content {
                if let Some(index) = self.activity_row_at(position) {
                    self.hour_cursor = index;
                    if let Err(e) = self.state.open_activity_account(index) {
                        tracing::debug!(error = %e, "Cannot open account from hour");
                    }
                    return;
                }
            }
            self.state.click_overlay(target);
            return;
        }

        let Some(plot) = self.hit_areas.chart_plot else {
            return;
        };
        if !plot.contains(position) {
            return;
        }
        let SeriesState::Ready(series) = self.state.drill().series() else {
            return;
        };
        if let Some(index) = resolve_point(mouse.column - plot.x, plot.width, series.len()) {
            self.hour_cursor = 0;
            if let Err(e) = self.state.click_point(index) {
                tracing::debug!(error = %e, "Chart click ignored");
            }
        }
    }

    /// Hour drill-down record under `position`, if any.
    fn activity_row_at(&self, position: Position) -> Option<usize> {
        let rows = self.hit_areas.activity_rows?;
        if !rows.contains(position) {
            return None;
        }
        let index = self.hit_areas.activity_offset + usize::from(position.y - rows.y);
        match self.state.overlay() {
            Overlay::HourDrillDown(hour) if index < hour.records().len() => Some(index),
            _ => None,
        }
    }
}
