//! StatusBar component - Bottom bar with the file count or the current notice

use gpui::{div, prelude::*, IntoElement, SharedString, Stateful, Div};

use crate::ui::Theme;

/// Properties for the status bar
pub struct StatusBarProps {
    pub converted_count: usize,
    /// Transient notice; replaces the count while shown
    pub notice: Option<String>,
}

pub fn converted_count_text(count: usize) -> String {
    if count == 1 {
        "1 converted file".to_string()
    } else {
        format!("{} converted files", count)
    }
}

/// Render the status bar
pub fn render_status_bar(props: StatusBarProps, theme: &Theme) -> impl IntoElement {
    let StatusBarProps {
        converted_count,
        notice,
    } = props;

    let content = match notice {
        Some(message) => div()
            .px_3()
            .py_1()
            .rounded_md()
            .bg(theme.notice_bg)
            .text_color(gpui::white())
            .child(message),
        None => div()
            .text_color(theme.text_muted)
            .child(converted_count_text(converted_count)),
    };

    div()
        .h_10()
        .px_6()
        .flex()
        .items_center()
        .justify_center()
        .text_sm()
        .border_t_1()
        .border_color(theme.border)
        .child(content)
}

/// Colors for an action button
#[derive(Clone, Copy)]
pub struct ButtonStyle {
    pub bg: gpui::Hsla,
    pub hover: gpui::Hsla,
}

/// Base for an action button; callers attach `on_click`
pub fn render_button_base(
    id: &'static str,
    label: &'static str,
    enabled: bool,
    style: ButtonStyle,
    theme: &Theme,
) -> Stateful<Div> {
    div()
        .id(SharedString::from(id))
        .px_4()
        .py_2()
        .rounded_md()
        .text_sm()
        .text_color(gpui::white())
        .bg(if enabled { style.bg } else { theme.disabled })
        .when(enabled, |el| {
            el.cursor_pointer().hover(move |s| s.bg(style.hover))
        })
        .child(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converted_count_text() {
        assert_eq!(converted_count_text(0), "0 converted files");
        assert_eq!(converted_count_text(1), "1 converted file");
        assert_eq!(converted_count_text(5), "5 converted files");
    }
}
