use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::{app::forms::Form, ui::theme::Theme};

const LABEL_WIDTH: usize = 18;

/// Rect of at most `width` x `height`, centered in `area`.
pub fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width.min(area.width)),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// Masks a secret with one bullet per character.
fn mask(value: &str) -> String {
    "•".repeat(value.chars().count())
}

/// One line per field, plus a line for each field message.
fn field_lines(form: &Form, active: bool, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, spec, value) in form.fields() {
        let focused = active && i == form.focus();
        let shown = if spec.secret {
            mask(value)
        } else {
            value.to_string()
        };
        let cursor = if focused { "│" } else { "" };
        let label_style = if focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        };
        let value_style = if focused {
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{:<LABEL_WIDTH$}", spec.label), label_style),
            Span::styled(format!("{shown}{cursor}"), value_style),
        ]));
        if let Some(message) = form.error(spec.key) {
            lines.push(Line::from(Span::styled(
                format!("{:LABEL_WIDTH$}{message}", ""),
                Style::default().fg(theme.error),
            )));
        }
    }
    lines
}

/// Draws `form` in a dialog centered in `area`.
///
/// `status` is an extra line under the fields, e.g. a server message.
pub fn render_dialog(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    form: &Form,
    busy: bool,
    status: Option<Span<'_>>,
    theme: &Theme,
) {
    let mut lines: Vec<Line<'_>> = field_lines(form, !busy, theme);
    lines.push(Line::from(""));
    if busy {
        lines.push(Line::from(Span::styled(
            "Working…",
            Style::default().fg(theme.text_muted),
        )));
    } else if let Some(status) = status {
        lines.push(Line::from(status));
    }

    let height = lines.len() as u16 + 2;
    let rect = centered_box(60, height, area);
    let block = Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(theme.accent),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.surface));

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        rect,
    );
}

/// Yes/no prompt centered in `area`.
pub fn render_confirm(frame: &mut Frame<'_>, area: Rect, message: &str, theme: &Theme) {
    let rect = centered_box(message.chars().count() as u16 + 6, 5, area);
    let block = Block::default()
        .title(Span::styled(" confirm ", Style::default().fg(theme.error)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.error));
    let lines = vec![
        Line::from(message.to_string()),
        Line::from(Span::styled(
            "y delete · any other key keeps it",
            Style::default().fg(theme.text_muted),
        )),
    ];

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        rect,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::forms::LOGIN_FIELDS;

    #[test]
    fn secrets_are_masked() {
        let form = Form::new(LOGIN_FIELDS)
            .with("username", "alice")
            .with("password", "pässword");
        let text: Vec<String> = field_lines(&form, true, &Theme::default())
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert!(text[0].contains("alice│"));
        assert!(text[1].ends_with("••••••••"));
        assert!(!text[1].contains("pässword"));
    }

    #[test]
    fn field_errors_get_their_own_line() {
        let mut form = Form::new(LOGIN_FIELDS);
        form.errors.add("password", "Password is required");
        let lines = field_lines(&form, true, &Theme::default());
        assert_eq!(lines.len(), 3);
    }
}
