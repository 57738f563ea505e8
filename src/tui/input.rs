//! TUI keyboard input handling.

use std::sync::mpsc;
use std::time::Instant;

use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::ApiClient;
use crate::config::Config;
use crate::flow;

use super::state::*;

pub(crate) fn handle_key(
    rt: &tokio::runtime::Runtime,
    app: &mut App,
    key: KeyEvent,
) -> Result<bool> {
    // Quit chord is ignored while submitting: the worker may already have
    // reached the server, so the run loop waits for its outcome.
    if key.code == KeyCode::Char('q')
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && app.screen != Screen::Submitting
    {
        app.exit = Some(TuiExit::Cancelled);
        return Ok(true);
    }

    match app.screen {
        Screen::Form => handle_form_key(rt, app, key),
        // The submit worker owns this phase; keys are ignored until it
        // reports back over the channel.
        Screen::Submitting => Ok(false),
        Screen::Result => handle_result_key(app, key),
    }
}

fn handle_form_key(rt: &tokio::runtime::Runtime, app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.exit = Some(TuiExit::Cancelled);
            return Ok(true);
        }
        KeyCode::Up | KeyCode::BackTab => app.field = app.field.prev(),
        KeyCode::Down | KeyCode::Tab => app.field = app.field.next(),
        KeyCode::Enter => {
            let operator = app.form.to_operator_info();
            let issues = operator.validate();
            if issues.is_empty() {
                start_submit(rt, app);
            } else {
                // Submission blocked; the record stays untouched.
                app.issues = issues;
            }
        }
        KeyCode::Backspace => {
            app.issues.clear();
            app.form.value_mut(app.field).pop();
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(false);
            }
            if !ch.is_control() {
                app.issues.clear();
                app.form.value_mut(app.field).push(ch);
            }
        }
        _ => {}
    }
    Ok(false)
}

fn handle_result_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            let outcome = app
                .outcome
                .clone()
                .unwrap_or_else(|| flow::Outcome::Failed("Sem resultado".to_string()));
            app.exit = Some(TuiExit::Finished(outcome));
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Hand the record to a worker thread and switch to the spinner screen.
/// The worker reports the outcome over an mpsc channel polled by the run
/// loop, so the UI thread stays free to draw.
fn start_submit(rt: &tokio::runtime::Runtime, app: &mut App) {
    let Some(record) = app.record.take() else {
        return;
    };
    let operator = app.form.to_operator_info();
    let handle = rt.handle().clone();

    let (tx, rx) = mpsc::channel();
    app.submit = Some(SubmitState {
        started_at: Instant::now(),
        rx,
    });
    app.screen = Screen::Submitting;

    std::thread::spawn(move || {
        let config = Config::load().unwrap_or_default();
        let api = ApiClient::new(&config);
        let outcome =
            handle.block_on(flow::run_submission(&api, record, &operator, Local::now()));
        let _ = tx.send(outcome);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::InventoryRecord;

    fn record() -> InventoryRecord {
        InventoryRecord {
            logged_user: "maria".to_string(),
            device_name: "PC-042".to_string(),
            processor: "CPU".to_string(),
            disk: "disco".to_string(),
            ram: "ram".to_string(),
            monitors: vec!["Monitor: HDMI-1".to_string()],
            operating_system: "linux x86_64".to_string(),
            department: None,
            sector: None,
            employee_id: None,
            operator_name: None,
            notes: None,
            collected_at: None,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn enter_with_empty_required_fields_blocks_and_keeps_record() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = App::new(record());

        let done = handle_key(&rt, &mut app, key(KeyCode::Enter)).unwrap();

        assert!(!done);
        assert_eq!(app.screen, Screen::Form);
        assert!(!app.issues.is_empty());
        // Nothing was handed to a worker; the record is still ours.
        assert!(app.record.is_some());
        assert!(app.submit.is_none());
    }

    #[test]
    fn typing_edits_active_field_and_clears_issues() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = App::new(record());
        app.issues = vec!["Secretaria é um campo obrigatório.".to_string()];

        handle_key(&rt, &mut app, key(KeyCode::Char('S'))).unwrap();

        assert_eq!(app.form.value(FormField::Department), "S");
        assert!(app.issues.is_empty());
    }

    #[test]
    fn esc_cancels_from_form() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = App::new(record());

        let done = handle_key(&rt, &mut app, key(KeyCode::Esc)).unwrap();

        assert!(done);
        assert_eq!(app.exit, Some(TuiExit::Cancelled));
    }

    #[test]
    fn quit_chord_ignored_while_submitting() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = App::new(record());
        app.screen = Screen::Submitting;

        let ctrl_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        let done = handle_key(&rt, &mut app, ctrl_q).unwrap();

        // The worker still owns this phase; the loop keeps waiting for it.
        assert!(!done);
        assert!(app.exit.is_none());
        assert_eq!(app.screen, Screen::Submitting);
    }

    #[test]
    fn tab_cycles_fields() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = App::new(record());
        assert_eq!(app.field, FormField::Department);

        handle_key(&rt, &mut app, key(KeyCode::Tab)).unwrap();
        assert_eq!(app.field, FormField::Sector);

        handle_key(&rt, &mut app, key(KeyCode::BackTab)).unwrap();
        assert_eq!(app.field, FormField::Department);
    }
}
