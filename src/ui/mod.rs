//! Terminal UI using ratatui
//!
//! Thin layer responsible only for terminal I/O. All behaviour lives in
//! App, reached through poll() and handle_key().

pub mod theme;
pub mod widgets;

use crate::app::App;
use crate::constants::{FRAME_DURATION_MS, PARAMS_PANE_WIDTH};
use crate::error::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::time::Duration;
use widgets::{
    actions::ActionsWidget, activity::ActivityWidget, params::ParamsWidget, status::StatusWidget,
};

/// Run the TUI event loop until the user quits
///
/// The terminal is restored even when the loop fails.
pub async fn run(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Pull session activity
        app.poll();

        terminal.draw(|f| draw(f, app))?;

        // Handle input with timeout
        if event::poll(Duration::from_millis(FRAME_DURATION_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key).await? {
                    return Ok(());
                }
            }
        }
    }
}

fn draw(frame: &mut Frame, app: &App) {
    let state = app.state();
    let stats = app.stats();

    let chunks = Layout::vertical([
        Constraint::Length(StatusWidget::HEIGHT), // Connection, power, transition
        Constraint::Min(5),                       // Parameters + activity
        Constraint::Length(3),                    // Actions / command line
    ])
    .split(frame.area());

    frame.render_widget(
        StatusWidget::new(app.device_url(), &state, &stats),
        chunks[0],
    );

    let body = Layout::horizontal([Constraint::Length(PARAMS_PANE_WIDTH), Constraint::Min(20)])
        .split(chunks[1]);
    frame.render_widget(
        ParamsWidget::new(&state.params, app.selected_key()),
        body[0],
    );
    frame.render_widget(ActivityWidget::new(app.activity()), body[1]);

    frame.render_widget(ActionsWidget::new(app.mode(), app.input()), chunks[2]);
}
