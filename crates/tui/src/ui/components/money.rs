use api_types::{Amount, CategoryType};
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use crate::ui::theme::Theme;

/// Signed amount: positive green with `+`, negative red, zero neutral.
#[must_use]
pub fn styled_amount(amount: Amount, theme: &Theme) -> Span<'static> {
    let (color, prefix) = if amount.is_positive() {
        (theme.positive, "+")
    } else if amount.is_negative() {
        (theme.negative, "")
    } else {
        (theme.text, "")
    };

    Span::styled(format!("{prefix}{amount}"), Style::default().fg(color))
}

/// Amount of a transaction, signed and colored by its category type.
#[must_use]
pub fn styled_flow(amount: Amount, kind: CategoryType, theme: &Theme) -> Span<'static> {
    let (color, sign) = match kind {
        CategoryType::Income => (theme.positive, "+"),
        CategoryType::Expense => (theme.negative, "-"),
    };
    Span::styled(
        format!("{sign}{}", amount.abs()),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}
