use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::advice::CATEGORIES;
use crate::app::{App, InputMode};
use crate::session::Phase;
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
        }
        AppEvent::AdviceReady { token, content } => {
            app.on_advice_ready(token, content);
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.phase() {
        Phase::CategorySelection => handle_selection_key(app, key),
        Phase::ActiveChat => match app.input_mode {
            InputMode::Normal => handle_chat_normal(app, key),
            InputMode::Editing => handle_chat_editing(app, key),
        },
    }
}

fn handle_selection_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,

        KeyCode::Char('j') | KeyCode::Down => app.category_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.category_nav_up(),
        KeyCode::Char('g') => app.category_nav_first(),
        KeyCode::Char('G') => app.category_nav_last(),

        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
            app.select_highlighted_category();
        }

        // Quick select by number
        KeyCode::Char(c @ '1'..='6') => {
            let idx = (c as usize) - ('1' as usize);
            if let Some(category) = CATEGORIES.get(idx) {
                app.select_category(category.id);
            }
        }

        _ => {}
    }
}

fn handle_chat_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Back to category selection
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => app.leave_chat(),

        // Focus the input
        KeyCode::Char('i') | KeyCode::Char('/') | KeyCode::Enter => {
            app.input_mode = InputMode::Editing;
        }

        // Transcript scrolling
        KeyCode::Char('j') | KeyCode::Down => app.chat_scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.chat_scroll_up(),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.chat_half_page_down();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.chat_half_page_up();
        }
        KeyCode::Char('g') => app.chat_scroll = 0,
        KeyCode::Char('G') => app.scroll_chat_to_bottom(),

        _ => {}
    }
}

fn handle_chat_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            app.submit();
        }
        KeyCode::Backspace => {
            if app.cursor > 0 {
                app.cursor -= 1;
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            if app.cursor < app.input.chars().count() {
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.input.chars().count();
            app.cursor = (app.cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.cursor = 0;
        }
        KeyCode::End => {
            app.cursor = app.input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.input, app.cursor);
            app.input.insert(byte_pos, c);
            app.cursor += 1;
        }
        _ => {}
    }
}

fn hit(area: Option<Rect>, mouse: &MouseEvent) -> bool {
    area.is_some_and(|a| {
        mouse.column >= a.x
            && mouse.column < a.x + a.width
            && mouse.row >= a.y
            && mouse.row < a.y + a.height
    })
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => match app.phase() {
            Phase::CategorySelection => {
                if let Some(area) = app.category_area {
                    // One list row per category; skip the top border
                    let inner_top = area.y + 1;
                    if mouse.column > area.x
                        && mouse.column < area.x + area.width
                        && mouse.row >= inner_top
                    {
                        let idx = (mouse.row - inner_top) as usize;
                        if let Some(category) = CATEGORIES.get(idx) {
                            app.category_state.select(Some(idx));
                            app.select_category(category.id);
                        }
                    }
                }
            }
            Phase::ActiveChat => {
                if hit(app.input_area, &mouse) {
                    app.input_mode = InputMode::Editing;
                }
            }
        },
        MouseEventKind::ScrollDown => match app.phase() {
            Phase::ActiveChat => {
                if hit(app.chat_area, &mouse) {
                    app.chat_scroll_down();
                }
            }
            Phase::CategorySelection => app.category_nav_down(),
        },
        MouseEventKind::ScrollUp => match app.phase() {
            Phase::ActiveChat => {
                if hit(app.chat_area, &mouse) {
                    app.chat_scroll_up();
                }
            }
            Phase::CategorySelection => app.category_nav_up(),
        },
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tokio::sync::mpsc;

    fn test_app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(&Config::new(), tx)
    }

    fn press(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::from(code))
    }

    #[test]
    fn enter_selects_the_highlighted_category() {
        let mut app = test_app();
        handle_event(&mut app, press(KeyCode::Down)).unwrap();
        handle_event(&mut app, press(KeyCode::Enter)).unwrap();

        assert_eq!(app.phase(), Phase::ActiveChat);
        assert_eq!(app.session.selected_category(), Some("finance"));
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[test]
    fn number_keys_quick_select() {
        let mut app = test_app();
        handle_event(&mut app, press(KeyCode::Char('6'))).unwrap();
        assert_eq!(app.session.selected_category(), Some("lifestyle"));
    }

    #[test]
    fn typed_text_lands_at_the_cursor() {
        let mut app = test_app();
        handle_event(&mut app, press(KeyCode::Char('1'))).unwrap();
        for c in "hallo".chars() {
            handle_event(&mut app, press(KeyCode::Char(c))).unwrap();
        }
        handle_event(&mut app, press(KeyCode::Left)).unwrap();
        handle_event(&mut app, press(KeyCode::Left)).unwrap();
        handle_event(&mut app, press(KeyCode::Left)).unwrap();
        handle_event(&mut app, press(KeyCode::Backspace)).unwrap();
        handle_event(&mut app, press(KeyCode::Char('e'))).unwrap();

        assert_eq!(app.input, "hello");
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn esc_leaves_editing_then_chat() {
        let mut app = test_app();
        handle_event(&mut app, press(KeyCode::Char('1'))).unwrap();
        assert_eq!(app.input_mode, InputMode::Editing);

        handle_event(&mut app, press(KeyCode::Esc)).unwrap();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.phase(), Phase::ActiveChat);

        handle_event(&mut app, press(KeyCode::Esc)).unwrap();
        assert_eq!(app.phase(), Phase::CategorySelection);
        assert!(app.session.transcript().is_empty());
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let mut app = test_app();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        handle_event(&mut app, AppEvent::Key(key)).unwrap();
        assert!(app.should_quit);
    }
}
