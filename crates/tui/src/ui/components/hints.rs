use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// A keyboard hint: the key and what it does.
#[derive(Debug, Clone, Copy)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

pub const fn hint(key: &'static str, action: &'static str) -> KeyHint {
    KeyHint { key, action }
}

pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

pub const FORM: &[KeyHint] = &[
    hint("Tab", "next"),
    hint("Enter", "save"),
    hint("Esc", "cancel"),
];

pub const CONFIRM: &[KeyHint] = &[hint("y", "confirm"), hint("any key", "keep")];
