pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Route};
use components::hints::{self, KeyHint, hint};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let theme = Theme::default();
    match state.route {
        Route::Login => screens::login::render(frame, area, state),
        Route::Register => screens::register::render(frame, area, state),
        _ => render_shell(frame, area, state, &theme),
    }
    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    // Main layout: info bar, tabs, content, bottom bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar (label + underline)
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, theme);
    components::tabs::render_tabs(frame, layout[1], state.route, theme);

    let content = layout[2];
    match state.route {
        Route::Dashboard => screens::dashboard::render(frame, content, state),
        Route::Transactions => screens::transactions::render(frame, content, state),
        Route::Recurring => screens::recurring::render(frame, content, state),
        Route::Categories => screens::categories::render(frame, content, state),
        Route::Profile => screens::profile::render(frame, content, state),
        Route::Login | Route::Register => {}
    }

    render_bottom_bar(frame, layout[3], state, theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let user = state
        .user
        .as_ref()
        .map(|u| u.username.as_str())
        .unwrap_or("-");
    let refresh = state
        .last_refresh
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut spans = vec![
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {user}  ")),
        Span::styled("Server", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("Refresh", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {refresh}  ")),
    ];
    if is_loading(state) {
        spans.push(Span::styled("loading…", Style::default().fg(theme.accent)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn is_loading(state: &AppState) -> bool {
    match state.route {
        Route::Dashboard => state.dashboard.stats.state.is_loading(),
        Route::Transactions => state.transactions.list.state.is_loading(),
        Route::Recurring => state.recurring.list.state.is_loading(),
        Route::Categories => state.categories.state.is_loading(),
        Route::Profile => state.profile.state.is_loading(),
        Route::Login | Route::Register => false,
    }
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = components::tabs::tab_shortcuts(theme);

    let context = context_hints(state);
    if !context.is_empty() {
        parts.push(hints::hint_separator(theme));
        parts.extend(hints::hints_to_spans(context, theme));
    }

    parts.push(hints::hint_separator(theme));
    parts.extend(hints::hints_to_spans(SESSION, theme));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

const SESSION: &[KeyHint] = &[hint("g", "refresh"), hint("o", "logout"), hint("q", "quit")];

const DASHBOARD: &[KeyHint] = &[hint("/", "range")];

const TRANSACTIONS: &[KeyHint] = &[
    hint("↑↓", "select"),
    hint("←→", "page"),
    hint("/", "filter"),
    hint("z", "clear"),
    hint("a", "add"),
    hint("e", "edit"),
    hint("x", "delete"),
];

const RECURRING: &[KeyHint] = &[
    hint("↑↓", "select"),
    hint("a", "add"),
    hint("e", "edit"),
    hint("x", "delete"),
];

fn context_hints(state: &AppState) -> &'static [KeyHint] {
    match state.route {
        Route::Dashboard if state.dashboard.range_editor.is_some() => hints::FORM,
        Route::Dashboard => DASHBOARD,
        Route::Transactions => {
            let page = &state.transactions;
            if page.confirm_delete.is_some() {
                hints::CONFIRM
            } else if page.filter_panel.is_some() || page.modal.is_open() {
                hints::FORM
            } else {
                TRANSACTIONS
            }
        }
        Route::Recurring => {
            let page = &state.recurring;
            if page.confirm_delete.is_some() {
                hints::CONFIRM
            } else if page.modal.is_open() {
                hints::FORM
            } else {
                RECURRING
            }
        }
        Route::Categories | Route::Profile | Route::Login | Route::Register => &[],
    }
}
