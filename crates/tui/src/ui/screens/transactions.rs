use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use api_types::transaction::{Transaction, TransactionFilters, TransactionPage};
use fintrack_client::api::categories::display_name;

use crate::{
    app::{AppState, LoadState, forms::DATE_FORMAT, state::TransactionsPage},
    ui::{
        components::{
            card::Card,
            form::{render_confirm, render_dialog},
            money::{styled_amount, styled_flow},
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let page = &state.transactions;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Filters
            Constraint::Length(1), // Totals
            Constraint::Min(3),    // List
            Constraint::Length(1), // Page
        ])
        .split(area);

    Card::new("Filters", &theme).render_with(
        frame,
        layout[0],
        Paragraph::new(filter_summary(page.filters(), &theme)),
    );

    match &page.list.state {
        LoadState::Loaded(data) => {
            frame.render_widget(Paragraph::new(totals_line(data, &theme)), layout[1]);
            render_list(frame, layout[2], page, &theme);
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" Page {}/{}", page.page() + 1, page.page_count()),
                    Style::default().fg(theme.text_muted),
                )),
                layout[3],
            );
        }
        LoadState::Failed(message) => {
            Card::new("Transactions", &theme).render_with(
                frame,
                layout[2],
                Paragraph::new(Span::styled(
                    message.as_str(),
                    Style::default().fg(theme.error),
                )),
            );
        }
        LoadState::Idle | LoadState::Loading => {
            Card::new("Transactions", &theme).render_with(
                frame,
                layout[2],
                Paragraph::new(Span::styled(
                    "Loading…",
                    Style::default().fg(theme.text_muted),
                )),
            );
        }
    }

    if let Some(panel) = &page.filter_panel {
        render_dialog(
            frame,
            area,
            "filters",
            panel,
            false,
            Some(Span::styled(
                "dates YYYY-MM-DD · type income/expense · empty = any",
                Style::default().fg(theme.text_muted),
            )),
            &theme,
        );
    }

    if let Some(form) = page.modal.form() {
        let title = if page.modal.editing().is_some() {
            "edit transaction"
        } else {
            "new transaction"
        };
        let categories = state
            .known_categories()
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let hint = (!categories.is_empty()).then(|| {
            Span::styled(
                format!("Categories: {categories}"),
                Style::default().fg(theme.text_muted),
            )
        });
        render_dialog(
            frame,
            area,
            title,
            form,
            page.modal.is_submitting(),
            hint,
            &theme,
        );
    }

    if let Some(id) = page.confirm_delete {
        let name = page
            .selected_transaction()
            .filter(|tx| tx.id == id)
            .map(|tx| tx.name.as_str())
            .unwrap_or("this transaction");
        render_confirm(frame, area, &format!("Delete {name}?"), &theme);
    }
}

fn filter_summary(filters: &TransactionFilters, theme: &Theme) -> Line<'static> {
    let mut parts = Vec::new();
    if let Some(from) = filters.from {
        parts.push(format!("from {}", from.format(DATE_FORMAT)));
    }
    if let Some(to) = filters.to {
        parts.push(format!("to {}", to.format(DATE_FORMAT)));
    }
    if let Some(kind) = filters.category_type {
        parts.push(format!("type {}", kind.as_str()));
    }
    if let Some(category) = &filters.category_name {
        parts.push(format!("category {}", display_name(category)));
    }
    if let Some(name) = &filters.name {
        parts.push(format!("name ~{name}"));
    }
    if let Some(mode) = &filters.payment_mode {
        parts.push(format!("paid by {mode}"));
    }
    if let Some(note) = &filters.note {
        parts.push(format!("note ~{note}"));
    }
    if let Some(min) = filters.min_amount {
        parts.push(format!(">= {min}"));
    }
    if let Some(max) = filters.max_amount {
        parts.push(format!("<= {max}"));
    }

    if parts.is_empty() {
        Line::from(Span::styled(
            "none (press / to filter)",
            Style::default().fg(theme.text_muted),
        ))
    } else {
        Line::from(parts.join("  ·  "))
    }
}

fn totals_line(data: &TransactionPage, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!(" {} transactions   ", data.transactions_count)),
        Span::styled("income ", Style::default().fg(theme.text_muted)),
        Span::styled(
            data.total_income.to_string(),
            Style::default().fg(theme.positive),
        ),
        Span::styled("   expenses ", Style::default().fg(theme.text_muted)),
        Span::styled(
            data.total_expense.to_string(),
            Style::default().fg(theme.negative),
        ),
        Span::styled("   net ", Style::default().fg(theme.text_muted)),
        styled_amount(data.total_delta, theme),
    ])
}

fn row(tx: &Transaction, deleting: bool, theme: &Theme) -> ListItem<'static> {
    let when = tx.datetime.format("%Y-%m-%d %H:%M").to_string();
    let category = display_name(&tx.category.name);
    let mode = tx.payment_mode.as_deref().unwrap_or("-");
    let note = tx.note.as_deref().unwrap_or("");

    let mut spans = vec![
        Span::styled(format!("{when}  "), Style::default().fg(theme.text_muted)),
        Span::raw(format!("{:<24.24} {:<20.20} {:<12.12} ", tx.name, category, mode)),
        styled_flow(tx.amount, tx.category.kind, theme),
        Span::styled(format!("  {note}"), Style::default().fg(theme.text_muted)),
    ];
    if deleting {
        spans.push(Span::styled("  deleting…", Style::default().fg(theme.error)));
    }
    ListItem::new(Line::from(spans))
}

fn render_list(frame: &mut Frame<'_>, area: Rect, page: &TransactionsPage, theme: &Theme) {
    let visible = page.visible();
    if visible.is_empty() {
        Card::new("Transactions", theme).render_with(
            frame,
            area,
            Paragraph::new(Span::styled(
                "No transactions match.",
                Style::default().fg(theme.text_muted),
            )),
        );
        return;
    }

    let items = visible
        .iter()
        .map(|tx| row(tx, page.deleting == Some(tx.id), theme))
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(page.selected()));

    let list = List::new(items)
        .block(Card::new("Transactions", theme).focused(true).block())
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut list_state);
}
