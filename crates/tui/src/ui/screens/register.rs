use ratatui::{Frame, layout::Rect};

use crate::{
    app::AppState,
    ui::{
        components::hints::{KeyHint, hint},
        theme::Theme,
    },
};

use super::login::{render_auth, render_footer};

const HINTS: &[KeyHint] = &[
    hint("Enter", "create account"),
    hint("Tab", "next"),
    hint("Esc", "back to login"),
];

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    render_auth(frame, area, "fintrack · new account", &state.register, &theme);
    render_footer(frame, area, HINTS, &state.base_url, &theme);
}
