//! Header component - Application title bar

use gpui::{div, prelude::*, IntoElement};

use crate::ui::Theme;

pub struct Header;

impl Header {
    /// Render the header with a title and a muted subtitle
    pub fn render(title: &str, subtitle: &str, theme: &Theme) -> impl IntoElement {
        div()
            .w_full()
            .px_6()
            .py_3()
            .flex()
            .flex_col()
            .border_b_1()
            .border_color(theme.border)
            .child(
                div()
                    .text_lg()
                    .font_weight(gpui::FontWeight::SEMIBOLD)
                    .text_color(theme.text)
                    .child(title.to_string()),
            )
            .child(
                div()
                    .text_xs()
                    .text_color(theme.text_muted)
                    .child(subtitle.to_string()),
            )
    }
}
