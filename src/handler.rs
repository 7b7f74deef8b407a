use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, InputMode, Screen, ToastKind};
use crate::session::{Document, Phase};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C quits from anywhere
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => match app.screen {
            Screen::Landing => handle_landing(app, key),
            Screen::Chat => handle_chat_normal(app, key),
        },
        InputMode::Editing => handle_chat_editing(app, key),
    }
}

fn handle_landing(app: &mut App, key: KeyEvent) {
    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,

        // Into the chat screen
        KeyCode::Char('c') | KeyCode::Enter => app.screen = Screen::Chat,

        // Scrolling
        KeyCode::Char('j') | KeyCode::Down => app.landing_scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.landing_scroll_up(),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.landing_half_page_down();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.landing_half_page_up();
        }
        KeyCode::Char('g') => app.landing_scroll = 0,
        KeyCode::Char('G') => app.landing_scroll_to_bottom(),

        // Section jumps, same targets as the page's own navigation
        KeyCode::Char('a') => app.jump_to_section(0),
        KeyCode::Char('f') => app.jump_to_section(1),
        KeyCode::Char('t') => app.jump_to_section(2),

        _ => {}
    }
}

fn handle_chat_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        // Back to the landing screen
        KeyCode::Esc => {
            app.screen = Screen::Landing;
            return;
        }
        // "New Analysis", only offered once a document is loaded
        KeyCode::Char('r') if app.session.document.is_some() => {
            app.reset_session();
            return;
        }
        KeyCode::Char('m') => {
            app.toggle_menu_pinning();
            return;
        }
        _ => {}
    }

    match app.session.phase() {
        Phase::Empty => {
            if matches!(key.code, KeyCode::Char('o') | KeyCode::Enter) {
                app.input_mode = InputMode::Editing;
            }
        }
        Phase::ActionMenu => match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.menu_nav_down(),
            KeyCode::Char('k') | KeyCode::Up => app.menu_nav_up(),
            KeyCode::Enter => app.activate_menu_selection(),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.chat_half_page_down();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.chat_half_page_up();
            }
            _ => {}
        },
        Phase::FreeForm => match key.code {
            KeyCode::Char('i') | KeyCode::Enter => {
                app.input_mode = InputMode::Editing;
                app.draft_cursor = app.session.draft.chars().count();
            }
            KeyCode::Char('j') | KeyCode::Down => app.chat_scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => app.chat_scroll_up(),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.chat_half_page_down();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.chat_half_page_up();
            }
            _ => {}
        },
    }
}

fn handle_chat_editing(app: &mut App, key: KeyEvent) {
    match app.session.phase() {
        Phase::Empty => handle_path_editing(app, key),
        Phase::FreeForm => handle_draft_editing(app, key),
        // No input surface in the menu phase
        Phase::ActionMenu => app.input_mode = InputMode::Normal,
    }
}

/// File intake: a path typed into the prompt stands in for a file picker.
fn handle_path_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            let path = app.path_input.trim().to_string();
            if path.is_empty() {
                return;
            }
            match Document::from_path(Path::new(&path)) {
                Ok(document) => {
                    let name = document.name.clone();
                    app.session.accept_document(document);
                    app.path_input.clear();
                    app.input_mode = InputMode::Normal;
                    app.show_toast(format!("{} is ready for analysis", name), ToastKind::Info);
                }
                // Rejected intake leaves the prompt open
                Err(err) => app.show_toast(err.to_string(), ToastKind::Error),
            }
        }
        KeyCode::Backspace => {
            app.path_input.pop();
        }
        KeyCode::Char(c) => {
            app.path_input.push(c);
        }
        _ => {}
    }
}

fn handle_draft_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            if let Some(request) = app.session.submit_draft() {
                app.draft_cursor = 0;
                app.dispatch(request);
            }
        }
        KeyCode::Backspace => {
            if app.draft_cursor > 0 {
                app.draft_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.session.draft, app.draft_cursor);
                app.session.draft.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.session.draft.chars().count();
            if app.draft_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.session.draft, app.draft_cursor);
                app.session.draft.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.draft_cursor = app.draft_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.session.draft.chars().count();
            app.draft_cursor = (app.draft_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.draft_cursor = 0;
        }
        KeyCode::End => {
            app.draft_cursor = app.session.draft.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.session.draft, app.draft_cursor);
            app.session.draft.insert(byte_pos, c);
            app.draft_cursor += 1;
        }
        _ => {}
    }
}
