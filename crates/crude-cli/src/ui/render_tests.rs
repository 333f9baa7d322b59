//! Tests for TUI rendering.

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use crude_core::palette::{Row, SearchEntry};
    use crude_core::search::SearchBackend;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::style::Color;
    use tokio::time::Instant;

    use crate::app::App;
    use crate::app::test_support::{StubBackend, app};
    use crate::ui::draw;
    use crate::ui::render::{row_line, scroll_offset};

    /// Create a `TestBackend` + `Terminal` of the given size and draw the app once.
    fn draw_app<B: SearchBackend>(width: u16, height: u16, app: &App<B>) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
    }

    /// Screen contents, one string per terminal row.
    fn screen(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    fn row_of(screen: &[String], needle: &str) -> Option<usize> {
        screen.iter().position(|line| line.contains(needle))
    }

    #[test]
    fn render_idle_app() {
        let (app, _ch) = app(StubBackend);
        let terminal = draw_app(80, 24, &app);
        let screen = screen(&terminal);
        assert!(screen[0].starts_with("crude | /"));
        assert!(row_of(&screen, "[w] /entries/browse/Widget").is_some());
        assert!(row_of(&screen, "Field -> Author").is_some());
        assert!(row_of(&screen, "Go to").is_none());
    }

    #[test]
    fn palette_overlay_lists_grouped_rows() {
        let (mut app, _ch) = app(StubBackend);
        app.toggle_palette();
        app.palette.on_key_up("widg", Instant::now());
        app.palette.selection_down();

        let terminal = draw_app(80, 24, &app);
        let screen = screen(&terminal);
        assert!(row_of(&screen, "Go to").is_some());
        assert!(row_of(&screen, "> widg").is_some());
        let separator = row_of(&screen, "-- navigation --").unwrap();
        let browse = row_of(&screen, "browse->Widget").unwrap();
        let edit = row_of(&screen, "edit->Widget").unwrap();
        assert!(separator < browse && browse < edit);

        // Selected entry is highlighted, the other is not.
        let buffer = terminal.backend().buffer();
        let col = screen[browse].find("browse").unwrap();
        let col = u16::try_from(screen[browse][..col].chars().count()).unwrap();
        let browse_y = u16::try_from(browse).unwrap();
        let edit_y = u16::try_from(edit).unwrap();
        assert_eq!(buffer[(col, browse_y)].bg, Color::Cyan);
        assert_ne!(buffer[(col, edit_y)].bg, Color::Cyan);
    }

    #[test]
    fn background_palette_is_titled_for_insertion() {
        let (mut app, _ch) = app(StubBackend);
        app.toggle_focus();
        app.toggle_palette();
        let screen = screen(&draw_app(80, 24, &app));
        assert!(row_of(&screen, "Insert reference").is_some());
    }

    #[test]
    fn short_query_shows_prompt_only() {
        let (mut app, _ch) = app(StubBackend);
        app.toggle_palette();
        app.palette.on_key_up("wi", Instant::now());
        let screen = screen(&draw_app(80, 24, &app));
        assert!(row_of(&screen, "> wi").is_some());
        assert!(row_of(&screen, "-- navigation --").is_none());
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let (mut app, _ch) = app(StubBackend);
        app.toggle_palette();
        app.palette.on_key_up("dget", Instant::now());
        draw_app(10, 4, &app);
        draw_app(1, 1, &app);
    }

    #[test]
    fn separator_rows_are_dimmed() {
        let row = Row::Separator("Widget".into());
        let line = row_line(&row, false);
        assert_eq!(line.spans[0].content, "-- Widget --");
        assert_eq!(line.spans[0].style.fg, Some(Color::DarkGray));

        let entry = Row::Entry(SearchEntry {
            url: "/entries/read/Widget/1".into(),
            label: "Alpha".into(),
            id: Some("Widget/1".into()),
        });
        assert_eq!(row_line(&entry, true).spans[0].style.bg, Some(Color::Cyan));
        assert_eq!(row_line(&entry, false).spans[0].style.bg, None);
    }

    #[test]
    fn scroll_keeps_selection_in_window() {
        assert_eq!(scroll_offset(None, 5), 0);
        assert_eq!(scroll_offset(Some(3), 5), 0);
        assert_eq!(scroll_offset(Some(7), 5), 3);
        assert_eq!(scroll_offset(Some(7), 0), 0);
    }
}
