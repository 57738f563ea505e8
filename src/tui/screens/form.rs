//! Operator form screen: read-only hardware panel on top, editable
//! operator fields below, inline validation messages when submission is
//! blocked.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use crate::tui::state::{App, FormField};
use crate::tui::theme::Theme;

pub(crate) fn draw_form(area: Rect, f: &mut ratatui::Frame, app: &App, theme: Theme) {
    let hardware_height = (app.hardware_lines.len() as u16 + 2).min(area.height / 2);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(hardware_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    draw_hardware_panel(chunks[0], f, app, theme);
    draw_operator_fields(chunks[1], f, app, theme);

    let footer = Paragraph::new(Line::from(Span::styled(
        "  ↑/↓/Tab campo   Enter enviar   Esc cancelar",
        Style::default().fg(theme.muted),
    )));
    f.render_widget(footer, chunks[2]);
}

fn draw_hardware_panel(area: Rect, f: &mut ratatui::Frame, app: &App, theme: Theme) {
    let mut lines: Vec<Line> = Vec::new();
    for (label, value) in &app.hardware_lines {
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {label:<12} "),
                Style::default().fg(theme.text_dim),
            ),
            Span::styled(value.clone(), Style::default().fg(theme.text)),
        ]));
    }

    let panel = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title(Span::styled(
                    " Dados coletados ",
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.border)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(panel, area);
}

fn draw_operator_fields(area: Rect, f: &mut ratatui::Frame, app: &App, theme: Theme) {
    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(""));

    for field in FormField::ALL {
        let active = field == app.field;
        let marker = if active { "›" } else { " " };
        let label_style = if active {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_dim)
        };

        let value = app.form.value(field);
        let mut spans = vec![
            Span::styled(format!(" {marker} "), Style::default().fg(theme.accent)),
            Span::styled(format!("{:<12}", field.label()), label_style),
            Span::styled(value.to_string(), Style::default().fg(theme.text)),
        ];
        if active {
            spans.push(Span::styled("█", Style::default().fg(theme.accent)));
        }
        if field.required() && value.trim().is_empty() {
            spans.push(Span::styled(" *", Style::default().fg(theme.muted)));
        }
        lines.push(Line::from(spans));
    }

    if !app.issues.is_empty() {
        lines.push(Line::from(""));
        for issue in &app.issues {
            lines.push(Line::from(vec![
                Span::styled("  • ", Style::default().fg(theme.critical)),
                Span::styled(issue.clone(), Style::default().fg(theme.critical)),
            ]));
        }
    }

    let body = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title(Span::styled(
                    " Preencha as informações ",
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.border)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(body, area);
}

pub(crate) fn draw_submitting(area: Rect, f: &mut ratatui::Frame, app: &App, theme: Theme) {
    let spinner = app.spinner_char();
    let elapsed = app
        .submit
        .as_ref()
        .map(|s| s.started_at.elapsed().as_secs())
        .unwrap_or(0);
    let para = Paragraph::new(Line::from(vec![
        Span::styled(format!("  {spinner}  "), Style::default().fg(theme.accent)),
        Span::styled(
            "Enviando dados...",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {elapsed}s"), Style::default().fg(theme.muted)),
    ]))
    .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}
