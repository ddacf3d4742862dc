use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{app::Route, ui::theme::Theme};

/// Key that switches to `route` from any private page.
pub fn shortcut(route: Route) -> Option<char> {
    match route {
        Route::Dashboard => Some('d'),
        Route::Transactions => Some('t'),
        Route::Recurring => Some('r'),
        Route::Categories => Some('c'),
        Route::Profile => Some('p'),
        Route::Login | Route::Register => None,
    }
}

pub fn render_tabs(frame: &mut Frame<'_>, area: Rect, active: Route, theme: &Theme) {
    let mut spans = vec![Span::raw(" ")];

    for (i, route) in Route::SECTIONS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }

        let label = route.label();
        if *route == active {
            spans.push(Span::styled("[", Style::default().fg(theme.accent)));
            spans.push(Span::styled(
                label,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("]", Style::default().fg(theme.accent)));
        } else {
            spans.push(Span::styled(label, Style::default().fg(theme.text_muted)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// `d/t/r/c/p nav`
pub fn tab_shortcuts(theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, key) in Route::SECTIONS
        .iter()
        .filter_map(|route| shortcut(*route))
        .enumerate()
    {
        if i > 0 {
            spans.push(Span::raw("/"));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default().fg(theme.accent),
        ));
    }
    spans.push(Span::raw(" nav"));
    spans
}
