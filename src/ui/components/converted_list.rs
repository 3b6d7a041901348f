//! ConvertedList component - One row per converted file
//!
//! Rows show the file name; clicking a row opens the file in the system
//! player.

use gpui::{div, prelude::*, Context, IntoElement, SharedString};
use std::path::{Path, PathBuf};

use crate::ui::Theme;

/// Properties for the converted files list
pub struct ConvertedListProps<'a> {
    pub files: &'a [PathBuf],
    pub theme: Theme,
}

/// Name shown for a converted file
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Render the converted files list
///
/// `on_open` receives the index of the clicked row.
pub fn render_converted_list<V: 'static>(
    props: ConvertedListProps<'_>,
    cx: &mut Context<V>,
    on_open: impl Fn(&mut V, usize, &mut Context<V>) + Clone + 'static,
) -> impl IntoElement {
    let ConvertedListProps { files, theme } = props;

    if files.is_empty() {
        return div()
            .w_full()
            .py_6()
            .flex()
            .justify_center()
            .text_sm()
            .text_color(theme.text_muted)
            .child("No converted files yet");
    }

    let mut list = div().w_full().flex().flex_col().gap_1();

    for (index, path) in files.iter().enumerate() {
        let exists = path.exists();
        let on_open = on_open.clone();

        let row = div()
            .id(SharedString::from(format!("converted-file-{}", index)))
            .w_full()
            .px_3()
            .py_2()
            .rounded_md()
            .bg(theme.bg_card)
            .border_1()
            .border_color(theme.border)
            .cursor_pointer()
            .hover(move |s| s.bg(theme.bg_card_hover))
            .on_click(cx.listener(move |view, _event, _window, cx| {
                on_open(view, index, cx);
            }))
            .flex()
            .flex_col()
            .child(
                div()
                    .text_sm()
                    .text_color(if exists { theme.text } else { theme.text_muted })
                    .child(display_name(path)),
            )
            .child(
                div()
                    .text_xs()
                    .text_color(theme.text_muted)
                    .child(if exists {
                        path.parent()
                            .map(|p| p.to_string_lossy().to_string())
                            .unwrap_or_default()
                    } else {
                        "missing".to_string()
                    }),
            );

        list = list.child(row);
    }

    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_is_file_name() {
        assert_eq!(display_name(Path::new("/out/Song.mp3")), "Song.mp3");
    }

    #[test]
    fn test_display_name_falls_back_to_path() {
        assert_eq!(display_name(Path::new("/")), "/");
    }
}
