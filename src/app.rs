use std::time::Duration;

use ratatui::widgets::ListState;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::responder::{
    Action, AnalysisRequest, Responder, DEFAULT_ACTION_DELAY, DEFAULT_REPLY_DELAY,
};
use crate::session::ChatSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Landing,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

/// Transient notification, dismissed after a few ticks.
pub struct Toast {
    pub text: String,
    pub kind: ToastKind,
    pub ticks_left: u8,
}

const TOAST_TICKS: u8 = 10;

/// A spawned responder task plus the session epoch it was dispatched
/// under. The epoch decides whether the result is still wanted.
struct PendingResponse {
    epoch: u64,
    task: JoinHandle<String>,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub session: ChatSession,

    // Input state
    pub path_input: String,
    pub draft_cursor: usize,

    // Action menu state
    pub menu_state: ListState,

    // Chat log scroll state (dimensions updated during render)
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,

    // Landing page scroll state
    pub landing_scroll: u16,
    pub landing_height: u16,
    pub landing_total_lines: u16,
    pub landing_offsets: [u16; 3],

    // Animation and notification state
    pub animation_frame: u8,
    pub toast: Option<Toast>,

    responder: Responder,
    pending: Option<PendingResponse>,
    config: Config,
}

impl App {
    pub fn new(config: Config, screen: Screen) -> Self {
        let responder = Responder::new(
            config
                .action_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_ACTION_DELAY),
            config
                .reply_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_REPLY_DELAY),
        );
        let session = ChatSession::new(config.keep_menu_open.unwrap_or(true));

        let mut menu_state = ListState::default();
        menu_state.select(Some(0));

        Self {
            should_quit: false,
            screen,
            input_mode: InputMode::Normal,
            session,

            path_input: String::new(),
            draft_cursor: 0,

            menu_state,

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            landing_scroll: 0,
            landing_height: 0,
            landing_total_lines: 0,
            landing_offsets: [0; 3],

            animation_frame: 0,
            toast: None,

            responder,
            pending: None,
            config,
        }
    }

    /// Tick animation frame and toast countdown (driven by the Tick event)
    pub fn tick(&mut self) {
        if self.session.awaiting_response {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        if let Some(toast) = &mut self.toast {
            toast.ticks_left = toast.ticks_left.saturating_sub(1);
            if toast.ticks_left == 0 {
                self.toast = None;
            }
        }
    }

    pub fn show_toast(&mut self, text: String, kind: ToastKind) {
        self.toast = Some(Toast {
            text,
            kind,
            ticks_left: TOAST_TICKS,
        });
    }

    // Action menu

    pub fn menu_nav_down(&mut self) {
        let len = Action::MENU.len();
        let i = self.menu_state.selected().unwrap_or(0);
        self.menu_state.select(Some((i + 1).min(len - 1)));
    }

    pub fn menu_nav_up(&mut self) {
        let i = self.menu_state.selected().unwrap_or(0);
        self.menu_state.select(Some(i.saturating_sub(1)));
    }

    /// Run the highlighted menu entry: `Other` drops into free-form mode
    /// with the input focused, everything else goes to the responder.
    pub fn activate_menu_selection(&mut self) {
        let Some(action) = self
            .menu_state
            .selected()
            .and_then(|i| Action::MENU.get(i).copied())
        else {
            return;
        };

        if action == Action::Other {
            if self.session.enter_free_form() {
                self.input_mode = InputMode::Editing;
                self.draft_cursor = 0;
            }
        } else if let Some(request) = self.session.trigger_action(action) {
            self.dispatch(request);
        }
    }

    /// Hand a request to the responder in the background. The join handle
    /// is polled from the event loop; nothing blocks here.
    pub fn dispatch(&mut self, request: AnalysisRequest) {
        let responder = self.responder.clone();
        let epoch = request.epoch;
        let task = tokio::spawn(async move { responder.respond(&request).await });
        self.pending = Some(PendingResponse { epoch, task });
        self.scroll_chat_to_bottom();
    }

    /// Collect a finished responder task, if any. Called once per event
    /// loop iteration; the tick event bounds the pickup latency.
    pub async fn poll_response(&mut self) {
        let finished = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.task.is_finished());
        if !finished {
            return;
        }

        let Some(pending) = self.pending.take() else {
            return;
        };
        match pending.task.await {
            Ok(text) => {
                if self.session.complete_response(pending.epoch, text) {
                    self.scroll_chat_to_bottom();
                }
            }
            // Task aborted or panicked: unblock the session, no reply
            Err(_) => self.session.abandon_response(pending.epoch),
        }
    }

    /// The "New Analysis" action: drop any in-flight response and return
    /// the session to its blank state.
    pub fn reset_session(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
        }
        self.session.reset();
        self.input_mode = InputMode::Normal;
        self.path_input.clear();
        self.draft_cursor = 0;
        self.chat_scroll = 0;
        self.menu_state.select(Some(0));
    }

    /// Flip the menu-chaining behavior and remember it in the config.
    pub fn toggle_menu_pinning(&mut self) {
        let pinned = !self.session.keep_menu_open();
        self.session.set_keep_menu_open(pinned);
        self.config.keep_menu_open = Some(pinned);
        let _ = self.config.save();

        let note = if pinned {
            "Action menu stays open after an action"
        } else {
            "Action menu hides while a response is pending"
        };
        self.show_toast(note.to_string(), ToastKind::Info);
    }

    // Chat log scrolling

    pub fn chat_scroll_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1);
    }

    pub fn chat_scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn chat_half_page_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(self.chat_height / 2);
    }

    pub fn chat_half_page_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(self.chat_height / 2);
    }

    /// Scroll the log so the newest entry (or the "Analyzing" indicator)
    /// is visible. Line counts mirror what the renderer produces: an
    /// author line, wrapped content, and a blank line per message.
    pub fn scroll_chat_to_bottom(&mut self) {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;
        for message in self.session.messages() {
            total_lines += 1;
            for line in message.content.lines() {
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1;
                } else {
                    total_lines += (char_count / wrap_width + 1) as u16;
                }
            }
            total_lines += 1;
        }
        if self.session.awaiting_response {
            total_lines += 2;
        }

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };
        self.chat_scroll = total_lines.saturating_sub(visible_height);
    }

    // Landing page scrolling

    pub fn landing_scroll_down(&mut self) {
        let max = self
            .landing_total_lines
            .saturating_sub(self.landing_height);
        if self.landing_scroll < max {
            self.landing_scroll += 1;
        }
    }

    pub fn landing_scroll_up(&mut self) {
        self.landing_scroll = self.landing_scroll.saturating_sub(1);
    }

    pub fn landing_half_page_down(&mut self) {
        let max = self
            .landing_total_lines
            .saturating_sub(self.landing_height);
        self.landing_scroll = (self.landing_scroll + self.landing_height / 2).min(max);
    }

    pub fn landing_half_page_up(&mut self) {
        self.landing_scroll = self.landing_scroll.saturating_sub(self.landing_height / 2);
    }

    pub fn landing_scroll_to_bottom(&mut self) {
        self.landing_scroll = self
            .landing_total_lines
            .saturating_sub(self.landing_height);
    }

    /// Jump to a landing section recorded by the renderer (about,
    /// features, testimonials).
    pub fn jump_to_section(&mut self, idx: usize) {
        if let Some(&offset) = self.landing_offsets.get(idx) {
            let max = self
                .landing_total_lines
                .saturating_sub(self.landing_height);
            self.landing_scroll = offset.min(max);
        }
    }
}
