//! Two-thread TUI orchestration.
//!
//! Terminal I/O runs on a dedicated OS thread; searches and timers stay on the
//! tokio runtime. Communication via `tokio::sync::mpsc` channels.

pub mod input;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crude_core::palette::SearchUpdate;
use crude_core::search::SearchBackend;
use crude_core::tags::TagUpdate;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::app::App;
use crate::ui;

/// Terminal events forwarded from the UI reader thread.
pub enum TermEvent {
    Key(crossterm::event::KeyEvent),
    Resize(u16, u16),
}

/// Receive from an optional channel; pending forever when there is none.
async fn recv_optional<T>(rx: &mut Option<UnboundedReceiver<T>>) -> Option<T> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Run the interactive TUI until the user quits.
///
/// Enters raw mode, spawns a dedicated terminal reader thread, and runs the
/// main `select!` loop over redraw ticks, key presses, search results and
/// the debounce deadline.
pub async fn run<B: SearchBackend>(
    mut app: App<B>,
    mut search_rx: UnboundedReceiver<SearchUpdate>,
    mut tag_rx: Option<UnboundedReceiver<TagUpdate>>,
) -> anyhow::Result<()> {
    // 1. Enter raw mode, create terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 2. Channels + cancellation token
    let cancel = CancellationToken::new();
    let (term_tx, mut term_rx) = tokio::sync::mpsc::channel::<TermEvent>(64);

    // 3. Spawn dedicated OS thread for crossterm::event::read()
    let cancel_clone = cancel.clone();
    let ui_thread = std::thread::spawn(move || {
        loop {
            if cancel_clone.is_cancelled() {
                break;
            }
            // Poll with 50ms timeout so we can check cancellation
            if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                match event::read() {
                    Ok(Event::Key(key)) => {
                        // Filter out Release events (Windows emits Press + Release per keystroke)
                        if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                            continue;
                        }
                        if term_tx.blocking_send(TermEvent::Key(key)).is_err() {
                            break;
                        }
                    }
                    Ok(Event::Resize(w, h)) => {
                        if term_tx.blocking_send(TermEvent::Resize(w, h)).is_err() {
                            break;
                        }
                    }
                    _ => {}
                }
            }
        }
    });

    let mut tick = tokio::time::interval(Duration::from_millis(50));

    let result: anyhow::Result<()> = loop {
        let deadline = app.next_deadline();
        tokio::select! {
            _ = tick.tick() => {
                if let Err(e) = terminal.draw(|f| ui::draw(f, &app)) {
                    break Err(e.into());
                }
            }
            Some(term_event) = term_rx.recv() => {
                input::handle_term_event(&mut app, term_event, Instant::now());
            }
            Some(update) = search_rx.recv() => {
                app.handle_search_update(update);
            }
            Some(update) = recv_optional(&mut tag_rx) => {
                app.handle_tag_update(update);
            }
            () = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                app.fire_due(Instant::now());
            }
        }
        if app.should_quit {
            break Ok(());
        }
    };

    // 4. Shutdown: signal UI thread to stop, drop in-flight searches
    cancel.cancel();
    let _ = ui_thread.join(); // fast: <50ms due to poll timeout
    app.palette.hide();
    debug!("TUI stopped");

    // 5. Restore terminal
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    result
}
