use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use api_types::{CategoryType, category::Category};
use fintrack_client::api::categories::{display_name, of_type};

use crate::{
    app::{AppState, LoadState},
    ui::{components::card::Card, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let categories = match &state.categories.state {
        LoadState::Loaded(categories) => categories,
        LoadState::Failed(message) => {
            Card::new("Categories", &theme).render_with(
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
            Card::new("Categories", &theme).render_with(
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

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(area);

    render_column(frame, cols[0], "Income", categories, CategoryType::Income, &theme);
    render_column(frame, cols[1], "Expense", categories, CategoryType::Expense, &theme);
}

fn render_column(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    categories: &[Category],
    kind: CategoryType,
    theme: &Theme,
) {
    let color = match kind {
        CategoryType::Income => theme.positive,
        CategoryType::Expense => theme.negative,
    };
    let lines = of_type(categories, kind)
        .map(|category| {
            Line::from(vec![
                Span::styled(
                    format!("{:<24}", display_name(&category.name)),
                    Style::default().fg(color),
                ),
                Span::styled(
                    category.name.clone(),
                    Style::default().fg(theme.text_muted),
                ),
            ])
        })
        .collect::<Vec<_>>();

    Card::new(title, theme).render_with(frame, area, Paragraph::new(lines));
}
