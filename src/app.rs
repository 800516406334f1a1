use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tokio::sync::mpsc;
use tracing::debug;

use crate::advice::{self, AdviceCatalog, CATEGORIES};
use crate::config::Config;
use crate::session::{Phase, ReplyToken, Session};
use crate::tui::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub session: Session,

    // Category selection state
    pub category_state: ListState,

    // Chat input state
    pub input: String,
    pub cursor: usize, // cursor position in input (chars)

    // Chat viewport state
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub category_area: Option<Rect>,
    pub chat_area: Option<Rect>,
    pub input_area: Option<Rect>,

    // Data
    pub catalog: AdviceCatalog,
    rng: StdRng,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    response_delay: Duration,
}

impl App {
    pub fn new(config: &Config, events_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        let mut category_state = ListState::default();
        category_state.select(Some(0));

        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            session: Session::new(),

            category_state,

            input: String::new(),
            cursor: 0,

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            animation_frame: 0,

            category_area: None,
            chat_area: None,
            input_area: None,

            catalog: AdviceCatalog::new(),
            rng: StdRng::from_entropy(),
            events_tx,
            response_delay: config.response_delay(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    // Category list navigation
    pub fn category_nav_down(&mut self) {
        let len = CATEGORIES.len();
        let i = self.category_state.selected().unwrap_or(0);
        self.category_state.select(Some((i + 1).min(len - 1)));
    }

    pub fn category_nav_up(&mut self) {
        let i = self.category_state.selected().unwrap_or(0);
        self.category_state.select(Some(i.saturating_sub(1)));
    }

    pub fn category_nav_first(&mut self) {
        self.category_state.select(Some(0));
    }

    pub fn category_nav_last(&mut self) {
        self.category_state.select(Some(CATEGORIES.len() - 1));
    }

    /// Enters the chat for the currently highlighted category.
    pub fn select_highlighted_category(&mut self) {
        if let Some(i) = self.category_state.selected() {
            if let Some(category) = CATEGORIES.get(i) {
                self.select_category(category.id);
            }
        }
    }

    pub fn select_category(&mut self, id: &str) {
        if self.session.select_category(id) {
            self.input.clear();
            self.cursor = 0;
            self.chat_scroll = 0;
            self.input_mode = InputMode::Editing;
        }
    }

    /// Submits the input buffer. Rejected (silently) while a reply is pending
    /// or when the trimmed input is empty; on success the reply is sampled now
    /// and delivered on the event channel after the simulated delay.
    pub fn submit(&mut self) {
        let Some(token) = self.session.begin_submit(&self.input) else {
            return;
        };
        self.input.clear();
        self.cursor = 0;

        let category = self
            .session
            .selected_category()
            .unwrap_or(advice::FALLBACK_CATEGORY);
        let content = self.catalog.respond(category, &mut self.rng);
        debug!(category, "advice reply scheduled");

        // Scroll to bottom so "Thinking..." is visible
        self.scroll_chat_to_bottom();

        let tx = self.events_tx.clone();
        let delay = self.response_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(AppEvent::AdviceReady { token, content });
        });
    }

    /// Applies a delayed reply; stale tokens are dropped by the session.
    pub fn on_advice_ready(&mut self, token: ReplyToken, content: String) {
        if self.session.complete_reply(token, content) {
            self.scroll_chat_to_bottom();
        }
    }

    /// Back to the category list, discarding the conversation.
    pub fn leave_chat(&mut self) {
        self.session.reset();
        self.input.clear();
        self.cursor = 0;
        self.chat_scroll = 0;
        self.input_mode = InputMode::Normal;
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.session.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Chat scrolling
    pub fn chat_scroll_down(&mut self) {
        let max_scroll = self.chat_line_count().saturating_sub(self.chat_height);
        if self.chat_scroll < max_scroll {
            self.chat_scroll = self.chat_scroll.saturating_add(1);
        }
    }

    pub fn chat_scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn chat_half_page_down(&mut self) {
        let half_page = self.chat_height / 2;
        let max_scroll = self.chat_line_count().saturating_sub(self.chat_height);
        self.chat_scroll = (self.chat_scroll + half_page).min(max_scroll);
    }

    pub fn chat_half_page_up(&mut self) {
        let half_page = self.chat_height / 2;
        self.chat_scroll = self.chat_scroll.saturating_sub(half_page);
    }

    pub fn scroll_chat_to_bottom(&mut self) {
        let total_lines = self.chat_line_count();

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        if total_lines > visible_height {
            self.chat_scroll = total_lines.saturating_sub(visible_height);
        } else {
            self.chat_scroll = 0;
        }
    }

    /// Estimated rendered line count of the transcript at the current wrap
    /// width, including the thinking indicator while pending.
    fn chat_line_count(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for msg in self.session.transcript() {
            total_lines += 1; // Role line ("You:" or "Advisor:")
            for line in msg.content.lines() {
                // Use character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1; // Empty line still takes one line
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // Blank line after message
        }

        if self.session.is_pending() {
            total_lines += 2; // "Advisor:" + "Thinking..."
        }

        total_lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;

    fn paused_app() -> (App, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut config = Config::new();
        config.response_delay_ms = Some(1000);
        (App::new(&config, tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn submit_delivers_a_delayed_reply() {
        let (mut app, mut rx) = paused_app();
        app.select_category("finance");
        app.input = "How much should I save?".to_string();
        app.submit();

        assert!(app.session.is_pending());
        assert_eq!(app.session.transcript().len(), 2);
        assert_eq!(app.session.transcript()[1].content, "How much should I save?");

        // Paused clock auto-advances through the 1s sleep while we wait.
        let Some(AppEvent::AdviceReady { token, content }) = rx.recv().await else {
            panic!("expected a scheduled reply");
        };
        assert!(content.starts_with("Based on your finance question, here's my advice:"));

        app.on_advice_ready(token, content);
        assert!(!app.session.is_pending());
        assert_eq!(app.session.transcript().len(), 3);
        assert_eq!(app.session.transcript()[2].role, Role::Assistant);
    }

    #[tokio::test(start_paused = true)]
    async fn reply_after_leaving_chat_is_dropped() {
        let (mut app, mut rx) = paused_app();
        app.select_category("career");
        app.input = "should I quit?".to_string();
        app.submit();
        app.leave_chat();

        let Some(AppEvent::AdviceReady { token, content }) = rx.recv().await else {
            panic!("expected a scheduled reply");
        };
        app.on_advice_ready(token, content);

        assert_eq!(app.phase(), Phase::CategorySelection);
        assert!(app.session.transcript().is_empty());
        assert!(!app.session.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn second_submit_while_pending_schedules_nothing() {
        let (mut app, mut rx) = paused_app();
        app.select_category("health");
        app.input = "first".to_string();
        app.submit();
        app.input = "second".to_string();
        app.submit();

        // The rejected submit leaves the buffer untouched.
        assert_eq!(app.input, "second");
        assert_eq!(app.session.transcript().len(), 2);

        let first = rx.recv().await;
        assert!(matches!(first, Some(AppEvent::AdviceReady { .. })));
        // Only one reply was ever scheduled.
        assert!(rx.try_recv().is_err());
    }
}
