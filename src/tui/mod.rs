//! Fullscreen terminal UI (TUI).
//!
//! One blocking run loop: form → submitting spinner → result dialog. The
//! submit worker runs off-thread and reports back over an mpsc channel, so
//! the loop keeps drawing while the network calls are in flight.

pub(crate) mod input;
pub(crate) mod screens;
pub(crate) mod state;
pub(crate) mod theme;

use std::io;
use std::sync::mpsc::TryRecvError;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Terminal;

use crate::flow::Outcome;
use crate::record::InventoryRecord;

use state::*;
use theme::Theme;

const FRAME_TIME: Duration = Duration::from_millis(16);

pub(crate) use state::TuiExit;

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Block until the operator submits or cancels, then until the result
/// dialog is acknowledged.
pub(crate) fn run_tui(
    rt: &tokio::runtime::Runtime,
    record: InventoryRecord,
) -> Result<TuiExit> {
    let _guard = TerminalGuard::enter()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(record);

    loop {
        terminal.draw(|f| draw(f.area(), f, &app))?;

        if matches!(app.screen, Screen::Submitting) {
            if let Some(submit) = app.submit.as_ref() {
                match submit.rx.try_recv() {
                    Ok(outcome) => {
                        app.submit = None;
                        app.outcome = Some(outcome);
                        app.screen = Screen::Result;
                        continue;
                    }
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        app.submit = None;
                        app.outcome = Some(Outcome::Failed(
                            "O envio foi interrompido inesperadamente.".to_string(),
                        ));
                        app.screen = Screen::Result;
                        continue;
                    }
                }
            }
        }

        let timeout = FRAME_TIME.saturating_sub(app.last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if input::handle_key(rt, &mut app, key)? {
                    break;
                }
            }
        }

        if app.last_tick.elapsed() >= FRAME_TIME {
            app.last_tick = std::time::Instant::now();
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
        }
    }

    Ok(app.exit.unwrap_or(TuiExit::Cancelled))
}

fn draw(area: Rect, f: &mut ratatui::Frame, app: &App) {
    let theme = Theme::default();

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " COLETOR DE INVENTÁRIO ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            match app.screen {
                Screen::Form => " formulário",
                Screen::Submitting => " enviando",
                Screen::Result => " resultado",
            },
            Style::default().fg(theme.muted),
        ),
    ]));
    f.render_widget(header, outer[0]);

    let inner = outer[1];
    match app.screen {
        Screen::Form => screens::form::draw_form(inner, f, app, theme),
        Screen::Submitting => screens::form::draw_submitting(inner, f, app, theme),
        Screen::Result => {
            screens::form::draw_form(inner, f, app, theme);
            screens::result::draw_result(inner, f, app, theme);
        }
    }
}
