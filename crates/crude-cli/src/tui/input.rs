//! Input handling for TUI key events.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crude_core::search::SearchBackend;
use tokio::time::Instant;

use crate::app::{App, Focus};

use super::TermEvent;

/// Ctrl+Space. Some terminals report it as Ctrl+@ (NUL).
pub fn is_palette_chord(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char(' ' | '@'))
}

/// Process a terminal event, updating app state.
pub fn handle_term_event<B: SearchBackend>(app: &mut App<B>, event: TermEvent, now: Instant) {
    match event {
        TermEvent::Key(key) => handle_key(app, key, now),
        TermEvent::Resize(_, _) => { /* terminal auto-handles resize on next draw */ }
    }
}

pub fn handle_key<B: SearchBackend>(app: &mut App<B>, key: KeyEvent, now: Instant) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }
    if is_palette_chord(&key) {
        app.toggle_palette();
        return;
    }
    if app.palette.is_visible() {
        handle_palette_key(app, key, now);
        return;
    }
    match app.focus {
        Focus::Location => handle_location_key(app, key),
        Focus::Field => handle_field_key(app, key, now),
    }
}

/// Keys while the palette is open. Nothing reaches the page underneath.
fn handle_palette_key<B: SearchBackend>(app: &mut App<B>, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Esc => app.palette.hide(),
        KeyCode::Up => app.palette.selection_up(),
        KeyCode::Down => app.palette.selection_down(),
        KeyCode::Enter => {
            if let Some(commit) = app.palette.commit() {
                app.apply_commit(commit);
            }
        }
        KeyCode::Backspace => {
            let mut text = app.palette.field_value().to_string();
            text.pop();
            app.palette.on_key_up(&text, now);
        }
        KeyCode::Char(c) => {
            let text = format!("{}{c}", app.palette.field_value());
            app.palette.on_key_up(&text, now);
        }
        _ => {}
    }
}

fn handle_location_key<B: SearchBackend>(app: &mut App<B>, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Backspace => {
            app.back();
        }
        KeyCode::Char(c) => {
            if let Some(url) = app.quick_keys.handle_key(c).map(str::to_string) {
                app.navigate(&url);
            } else if c == 'q' {
                app.should_quit = true;
            }
        }
        _ => {}
    }
}

fn handle_field_key<B: SearchBackend>(app: &mut App<B>, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Tab => {
            if !app.has_tag_suggestions() || !app.accept_tag() {
                app.toggle_focus();
            }
        }
        KeyCode::Esc => app.focus = Focus::Location,
        KeyCode::Backspace => {
            if app.field.pop().is_none() {
                if let Some(tags) = app.tags.as_mut() {
                    tags.remove_last();
                }
            }
            app.field_changed(now);
        }
        KeyCode::Char(c) => {
            app.field.push(c);
            app.field_changed(now);
        }
        _ => {}
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use crude_core::palette::FieldTarget;

    use super::*;
    use crate::app::HOME;
    use crate::app::test_support::{StubBackend, app};

    const QUIET: Duration = Duration::from_millis(250);

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text<B: SearchBackend>(app: &mut App<B>, text: &str, now: Instant) {
        for c in text.chars() {
            handle_key(app, key(KeyCode::Char(c)), now);
        }
    }

    #[test]
    fn ctrl_space_toggles_palette() {
        let (mut app, _ch) = app(StubBackend);
        let now = Instant::now();
        handle_key(&mut app, ctrl(' '), now);
        assert!(app.palette.is_visible());
        handle_key(&mut app, ctrl(' '), now);
        assert!(!app.palette.is_visible());
        handle_key(&mut app, ctrl('@'), now);
        assert!(app.palette.is_visible());
    }

    #[test]
    fn esc_closes_palette() {
        let (mut app, _ch) = app(StubBackend);
        let now = Instant::now();
        handle_key(&mut app, ctrl(' '), now);
        type_text(&mut app, "widg", now);
        handle_key(&mut app, key(KeyCode::Esc), now);
        assert!(!app.palette.is_visible());
        assert!(app.palette.rows().is_empty());
        assert!(app.quick_keys.is_attached());
    }

    #[test]
    fn enter_on_navigation_row_changes_location() {
        let (mut app, _ch) = app(StubBackend);
        let now = Instant::now();
        handle_key(&mut app, ctrl(' '), now);
        type_text(&mut app, "edi gadg", now);
        assert_eq!(app.palette.field_value(), "edi gadg");

        handle_key(&mut app, key(KeyCode::Down), now);
        handle_key(&mut app, key(KeyCode::Enter), now);
        assert_eq!(app.location, "/entries/edit/Gadget");
        assert_eq!(app.history, vec![HOME]);
        assert!(!app.palette.is_visible());
    }

    #[test]
    fn enter_without_selection_keeps_palette_open() {
        let (mut app, _ch) = app(StubBackend);
        let now = Instant::now();
        handle_key(&mut app, ctrl(' '), now);
        type_text(&mut app, "widg", now);
        handle_key(&mut app, key(KeyCode::Enter), now);
        assert!(app.palette.is_visible());
        assert_eq!(app.location, HOME);
    }

    #[test]
    fn backspace_below_threshold_hides_list() {
        let (mut app, _ch) = app(StubBackend);
        let now = Instant::now();
        handle_key(&mut app, ctrl(' '), now);
        type_text(&mut app, "wid", now);
        assert!(app.palette.is_list_visible());
        handle_key(&mut app, key(KeyCode::Backspace), now);
        assert_eq!(app.palette.field_value(), "wi");
        assert!(!app.palette.is_list_visible());
    }

    #[test]
    fn quick_key_navigates_from_location_view() {
        let (mut app, _ch) = app(StubBackend);
        handle_key(&mut app, key(KeyCode::Char('w')), Instant::now());
        assert_eq!(app.location, "/entries/browse/Widget");
        handle_key(&mut app, key(KeyCode::Backspace), Instant::now());
        assert_eq!(app.location, HOME);
    }

    #[test]
    fn quick_keys_are_inert_while_palette_is_open() {
        let (mut app, _ch) = app(StubBackend);
        let now = Instant::now();
        handle_key(&mut app, ctrl(' '), now);
        handle_key(&mut app, key(KeyCode::Char('w')), now);
        assert_eq!(app.location, HOME);
        assert_eq!(app.palette.field_value(), "w");
    }

    #[test]
    fn quick_keys_do_not_fire_in_form_field() {
        let (mut app, _ch) = app(StubBackend);
        let now = Instant::now();
        handle_key(&mut app, key(KeyCode::Tab), now);
        assert_eq!(app.focus, Focus::Field);
        handle_key(&mut app, key(KeyCode::Char('w')), now);
        assert_eq!(app.location, HOME);
        assert_eq!(app.field, "w");
    }

    #[test]
    fn q_quits_from_location_view() {
        let (mut app, _ch) = app(StubBackend);
        handle_key(&mut app, key(KeyCode::Char('q')), Instant::now());
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_even_with_palette_open() {
        let (mut app, _ch) = app(StubBackend);
        let now = Instant::now();
        handle_key(&mut app, ctrl(' '), now);
        handle_key(&mut app, ctrl('c'), now);
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn background_commit_inserts_reference_into_field() {
        let (mut app, mut ch) = app(StubBackend);
        let now = Instant::now();
        handle_key(&mut app, key(KeyCode::Tab), now);
        handle_key(&mut app, ctrl(' '), now);
        assert_eq!(app.palette.target(), FieldTarget::Background);

        type_text(&mut app, "widg", now);
        app.fire_due(now + QUIET);
        for _ in 0..2 {
            let update = tokio::time::timeout(Duration::from_secs(2), ch.search.recv())
                .await
                .expect("search timed out")
                .expect("channel closed");
            app.handle_search_update(update);
        }

        while app.palette.selected_entry().is_none_or(|e| e.id.is_none()) {
            handle_key(&mut app, key(KeyCode::Down), now);
        }
        handle_key(&mut app, key(KeyCode::Enter), now);
        assert_eq!(app.field, "Widget/widget1(widg widget)");
        assert_eq!(app.location, HOME);
        assert!(!app.palette.is_visible());
    }

    #[tokio::test]
    async fn tab_in_field_accepts_tag_suggestion() {
        let (mut app, mut ch) = app(StubBackend);
        let now = Instant::now();
        handle_key(&mut app, key(KeyCode::Tab), now);
        type_text(&mut app, "ada", now);
        assert!(app.next_deadline().is_some());

        app.fire_due(now + QUIET);
        let update = tokio::time::timeout(Duration::from_secs(2), ch.tags.recv())
            .await
            .expect("tag search timed out")
            .expect("channel closed");
        app.handle_tag_update(update);
        assert!(app.has_tag_suggestions());

        handle_key(&mut app, key(KeyCode::Tab), now);
        assert_eq!(app.focus, Focus::Field);
        assert!(app.field.is_empty());
        let tags = app.tags.as_ref().unwrap().tags();
        assert_eq!(tags[0].value, "Author/author1");

        // Backspace on an empty field drops the last tag.
        handle_key(&mut app, key(KeyCode::Backspace), now);
        assert!(app.tags.as_ref().unwrap().tags().is_empty());
    }

    #[test]
    fn tab_without_suggestions_switches_focus() {
        let (mut app, _ch) = app(StubBackend);
        let now = Instant::now();
        handle_key(&mut app, key(KeyCode::Tab), now);
        handle_key(&mut app, key(KeyCode::Tab), now);
        assert_eq!(app.focus, Focus::Location);
    }
}
