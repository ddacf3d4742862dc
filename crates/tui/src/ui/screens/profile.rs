use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{AppState, LoadState},
    ui::{
        components::{card::Card, money::styled_amount},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let card = Card::new("Profile", &theme);

    let profile = match &state.profile.state {
        LoadState::Loaded(profile) => profile,
        LoadState::Failed(message) => {
            card.render_with(
                frame,
                area,
                Paragraph::new(Span::styled(
                    message.as_str(),
                    Style::default().fg(theme.error),
                )),
            );
            return;
        }
        LoadState::Idle | LoadState::Loading => {
            card.render_with(
                frame,
                area,
                Paragraph::new(Span::styled(
                    "Loading…",
                    Style::default().fg(theme.text_muted),
                )),
            );
            return;
        }
    };

    let label = |text: &'static str| Span::styled(format!("{text:<14}"), Style::default().fg(theme.text_muted));
    let missing = || Span::styled("-", Style::default().fg(theme.text_muted));

    let lines = vec![
        Line::from(vec![label("Username"), Span::raw(profile.username.clone())]),
        Line::from(vec![label("Id"), Span::raw(profile.id.to_string())]),
        Line::from(vec![
            label("Email"),
            profile
                .email
                .clone()
                .map(Span::raw)
                .unwrap_or_else(missing),
        ]),
        Line::from(vec![
            label("Balance"),
            profile
                .balance
                .map(|balance| styled_amount(balance, &theme))
                .unwrap_or_else(missing),
        ]),
        Line::from(vec![
            label("Member since"),
            profile
                .created_at
                .map(|at| Span::raw(at.format("%Y-%m-%d").to_string()))
                .unwrap_or_else(missing),
        ]),
    ];

    card.render_with(frame, area, Paragraph::new(lines));
}
