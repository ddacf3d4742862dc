use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{AppState, state::AuthForm},
    ui::{
        components::{
            form::render_dialog,
            hints::{KeyHint, hint, hints_to_spans},
            toast::level_style,
        },
        theme::Theme,
    },
};

const HINTS: &[KeyHint] = &[
    hint("Enter", "log in"),
    hint("Tab", "next"),
    hint("Ctrl+R", "register"),
    hint("Ctrl+C", "quit"),
];

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    render_auth(frame, area, "fintrack · login", &state.login, &theme);
    render_footer(frame, area, HINTS, &state.base_url, &theme);
}

pub(super) fn render_auth(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    auth: &AuthForm,
    theme: &Theme,
) {
    let status = auth
        .message
        .as_ref()
        .map(|(level, message)| Span::styled(message.as_str(), level_style(*level, theme)));
    render_dialog(frame, area, title, &auth.form, auth.busy, status, theme);
}

pub(super) fn render_footer(
    frame: &mut Frame<'_>,
    area: Rect,
    hints: &[KeyHint],
    base_url: &str,
    theme: &Theme,
) {
    if area.height < 2 {
        return;
    }
    let footer = Rect {
        x: area.x,
        y: area.y + area.height - 2,
        width: area.width,
        height: 2,
    };
    let lines = vec![
        Line::from(hints_to_spans(hints, theme)),
        Line::from(Span::styled(
            base_url.to_string(),
            Style::default().fg(theme.text_muted),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), footer);
}
