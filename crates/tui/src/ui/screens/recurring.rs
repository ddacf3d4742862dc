use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use api_types::{CategoryType, recurring::RecurringTransaction};
use fintrack_client::api::categories::display_name;

use crate::{
    app::{AppState, LoadState, forms::DATE_FORMAT},
    ui::{
        components::{
            card::Card,
            form::{render_confirm, render_dialog},
            money::styled_flow,
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let page = &state.recurring;

    match &page.list.state {
        LoadState::Loaded(items) if items.is_empty() => {
            Card::new("Recurring", &theme).render_with(
                frame,
                area,
                Paragraph::new(Span::styled(
                    "Nothing scheduled yet. Press a to add one.",
                    Style::default().fg(theme.text_muted),
                )),
            );
        }
        LoadState::Loaded(items) => {
            let rows = items
                .iter()
                .map(|item| row(item, page.deleting == Some(item.id), &theme))
                .collect::<Vec<_>>();
            let mut list_state = ListState::default();
            list_state.select(Some(page.selected()));
            let list = List::new(rows)
                .block(Card::new("Recurring", &theme).focused(true).block())
                .highlight_style(
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("» ");
            frame.render_stateful_widget(list, area, &mut list_state);
        }
        LoadState::Failed(message) => {
            Card::new("Recurring", &theme).render_with(
                frame,
                area,
                Paragraph::new(Span::styled(
                    message.as_str(),
                    Style::default().fg(theme.error),
                )),
            );
        }
        LoadState::Idle | LoadState::Loading => {
            Card::new("Recurring", &theme).render_with(
                frame,
                area,
                Paragraph::new(Span::styled(
                    "Loading…",
                    Style::default().fg(theme.text_muted),
                )),
            );
        }
    }

    if let Some(form) = page.modal.form() {
        let title = if page.modal.editing().is_some() {
            "edit recurring transaction"
        } else {
            "new recurring transaction"
        };
        render_dialog(
            frame,
            area,
            title,
            form,
            page.modal.is_submitting(),
            Some(Span::styled(
                "frequency Daily/Weekly/Monthly/Yearly · date YYYY-MM-DD",
                Style::default().fg(theme.text_muted),
            )),
            &theme,
        );
    }

    if let Some(id) = page.confirm_delete {
        let name = page
            .selected_item()
            .filter(|item| item.id == id)
            .map(|item| item.name.as_str())
            .unwrap_or("this recurring transaction");
        render_confirm(frame, area, &format!("Stop {name}?"), &theme);
    }
}

fn row(item: &RecurringTransaction, deleting: bool, theme: &Theme) -> ListItem<'static> {
    let category = item
        .category_name
        .as_deref()
        .map(display_name)
        .unwrap_or_else(|| "-".to_string());
    let next = item
        .next_run_date
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut spans = vec![
        Span::raw(format!(
            "{:<24.24} {:<20.20} {:<8} ",
            item.name,
            category,
            item.frequency.label()
        )),
        styled_flow(
            item.amount,
            item.category_type.unwrap_or(CategoryType::Expense),
            theme,
        ),
        Span::styled(format!("  next {next}"), Style::default().fg(theme.text_muted)),
    ];
    if deleting {
        spans.push(Span::styled("  deleting…", Style::default().fg(theme.error)));
    }
    ListItem::new(Line::from(spans))
}
