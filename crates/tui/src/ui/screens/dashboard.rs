use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use api_types::dashboard::{ChartSlice, DashboardStats};
use fintrack_client::api::categories::display_name;

use crate::{
    app::{AppState, LoadState, forms::DATE_FORMAT},
    ui::{
        components::{
            card::{Card, StatCard},
            charts::{ascii_bar, percentage},
            form::render_dialog,
        },
        theme::Theme,
    },
};

const NAME_WIDTH: usize = 22;

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let page = &state.dashboard;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Range
            Constraint::Length(4), // Totals
            Constraint::Min(3),    // Breakdown
        ])
        .split(area);

    let date = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| "…".to_string())
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" Range", Style::default().fg(theme.text_muted)),
            Span::raw(format!(": {} → {}", date(page.from), date(page.to))),
        ])),
        layout[0],
    );

    match &page.stats.state {
        LoadState::Loaded(stats) => {
            render_totals(frame, layout[1], stats, &theme);
            render_breakdown(frame, layout[2], &stats.breakdown, &theme);
        }
        LoadState::Failed(message) => {
            Card::new("Dashboard", &theme).render_with(
                frame,
                layout[2],
                Paragraph::new(Span::styled(
                    message.as_str(),
                    Style::default().fg(theme.error),
                )),
            );
        }
        LoadState::Idle | LoadState::Loading => {
            Card::new("Dashboard", &theme).render_with(
                frame,
                layout[2],
                Paragraph::new(Span::styled(
                    "Loading…",
                    Style::default().fg(theme.text_muted),
                )),
            );
        }
    }

    if let Some(editor) = &page.range_editor {
        render_dialog(
            frame,
            area,
            "date range",
            editor,
            false,
            Some(Span::styled(
                "YYYY-MM-DD, leave empty for the server default",
                Style::default().fg(theme.text_muted),
            )),
            &theme,
        );
    }
}

fn render_totals(frame: &mut Frame<'_>, area: Rect, stats: &DashboardStats, theme: &Theme) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(area);

    let delta_color = if stats.total_delta.is_negative() {
        theme.negative
    } else {
        theme.positive
    };
    StatCard::new("Balance", stats.total_delta.to_string(), theme)
        .color(delta_color)
        .subtitle("income - expenses")
        .render(frame, cols[0]);

    StatCard::new("Income", stats.total_income.to_string(), theme)
        .color(theme.positive)
        .subtitle(format!(
            "salary {} · other {}",
            stats.total_salary_income, stats.total_other_income
        ))
        .render(frame, cols[1]);

    StatCard::new("Expenses", stats.total_expense.to_string(), theme)
        .color(theme.negative)
        .subtitle(format!("{} categories", stats.breakdown.len()))
        .render(frame, cols[2]);

    StatCard::new("Transactions", stats.transactions_count.to_string(), theme)
        .subtitle(format!(
            "{} in · {} out",
            stats.income_transactions_count, stats.expense_transactions_count
        ))
        .render(frame, cols[3]);
}

fn render_breakdown(frame: &mut Frame<'_>, area: Rect, slices: &[ChartSlice], theme: &Theme) {
    let card = Card::new("Expenses by category", theme);
    let inner = card.inner(area);

    if slices.is_empty() {
        card.render_with(
            frame,
            area,
            Paragraph::new(Span::styled(
                "No expenses in this range.",
                Style::default().fg(theme.text_muted),
            )),
        );
        return;
    }

    let cents = |slice: &ChartSlice| slice.value.cents().unsigned_abs();
    let max = slices.iter().map(cents).max().unwrap_or(0);
    let total: u64 = slices.iter().map(cents).sum();
    // name, bar, value, share, count
    let bar_width = (inner.width as usize).saturating_sub(NAME_WIDTH + 30).max(4);

    let lines = slices
        .iter()
        .map(|slice| {
            Line::from(vec![
                Span::styled(
                    format!("{:<NAME_WIDTH$}", display_name(&slice.name)),
                    Style::default().fg(theme.text),
                ),
                Span::styled(
                    ascii_bar(cents(slice), max, bar_width),
                    Style::default().fg(theme.accent),
                ),
                Span::raw(format!(" {:>12}", slice.value.to_string())),
                Span::styled(
                    format!(" {:>4}%", percentage(cents(slice), total)),
                    Style::default().fg(theme.text_muted),
                ),
                Span::styled(
                    format!("  ({})", slice.transaction_count),
                    Style::default().fg(theme.text_muted),
                ),
            ])
        })
        .collect::<Vec<_>>();

    card.render_with(frame, area, Paragraph::new(lines));
}
