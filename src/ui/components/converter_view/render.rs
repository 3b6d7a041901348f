//! Rendering implementation for ConverterView

use gpui::{
    Context, ExternalPaths, IntoElement, Render, Window, div, prelude::*, px, relative,
};

use crate::actions::{CancelConversion, ConvertFile, PickFile};
use crate::audio::{format_duration, format_size};
use crate::ui::Theme;
use crate::ui::components::converted_list::{ConvertedListProps, render_converted_list};
use crate::ui::components::header::Header;
use crate::ui::components::status_bar::{
    ButtonStyle, StatusBarProps, render_button_base, render_status_bar,
};

use super::ConverterView;

/// Length of one sweep of the indeterminate progress bar
const PROGRESS_SWEEP_MS: u128 = 1500;

impl ConverterView {
    /// Render the selected file card
    fn render_selected_file(&self, theme: &Theme) -> impl IntoElement {
        let (path_text, details_text) = match self.session.selected_file() {
            Some(path) => {
                let details = self
                    .selected_details
                    .as_ref()
                    .map(|d| {
                        format!(
                            "{} · {} · {}",
                            d.codec,
                            format_duration(d.duration_secs),
                            format_size(d.size_bytes)
                        )
                    })
                    .unwrap_or_else(|| "Format not recognized, ffmpeg will try anyway".to_string());
                (path.to_string_lossy().to_string(), details)
            }
            None => (
                "No file selected".to_string(),
                "Pick an audio file or drop one on the window".to_string(),
            ),
        };

        div()
            .w_full()
            .p_3()
            .rounded_md()
            .bg(theme.bg_card)
            .border_1()
            .border_color(theme.border)
            .flex()
            .flex_col()
            .gap_1()
            .child(div().text_sm().text_color(theme.text).child(path_text))
            .child(div().text_xs().text_color(theme.text_muted).child(details_text))
    }

    /// Render the Pick / Convert / Cancel / Open button row
    fn render_buttons(&self, theme: &Theme, cx: &mut Context<Self>) -> impl IntoElement {
        let converting = self.session.is_converting();
        let convert_enabled = self.session.convert_enabled();

        let accent = ButtonStyle {
            bg: theme.accent,
            hover: theme.accent_hover,
        };
        let success = ButtonStyle {
            bg: theme.success,
            hover: theme.success_hover,
        };
        let danger = ButtonStyle {
            bg: theme.danger,
            hover: theme.danger_hover,
        };

        div()
            .flex()
            .flex_row()
            .gap_2()
            .child(
                render_button_base("pick-file", "Pick File", !converting, accent, theme).on_click(
                    cx.listener(|this, _event, _window, cx| {
                        this.show_file_picker(cx);
                    }),
                ),
            )
            .child(
                render_button_base("convert", "Convert to MP3", convert_enabled, success, theme)
                    .on_click(cx.listener(move |this, _event, _window, cx| {
                        if convert_enabled {
                            this.convert();
                            cx.notify();
                        }
                    })),
            )
            .when(self.session.show_progress(), |el| {
                el.child(
                    render_button_base("cancel", "Cancel", true, danger, theme).on_click(
                        cx.listener(|this, _event, _window, cx| {
                            this.cancel_conversion();
                            cx.notify();
                        }),
                    ),
                )
            })
            .when(self.session.show_open(), |el| {
                el.child(
                    render_button_base("open-file", "Open File", true, accent, theme).on_click(
                        cx.listener(|this, _event, _window, cx| {
                            this.open_converted_file();
                            cx.notify();
                        }),
                    ),
                )
            })
    }

    /// Render the indeterminate progress bar with elapsed time
    fn render_progress(&self, theme: &Theme) -> impl IntoElement {
        let elapsed = self
            .conversion_started_at
            .map(|t| t.elapsed())
            .unwrap_or_default();
        let sweep = (elapsed.as_millis() % PROGRESS_SWEEP_MS) as f32 / PROGRESS_SWEEP_MS as f32;

        div()
            .w_full()
            .flex()
            .flex_col()
            .gap_1()
            .child(
                div()
                    .w_full()
                    .h(px(6.))
                    .rounded_md()
                    .bg(theme.border)
                    .overflow_hidden()
                    .child(div().h_full().w(relative(sweep)).bg(theme.accent)),
            )
            .child(
                div()
                    .text_xs()
                    .text_color(theme.text_muted)
                    .child(format!(
                        "Converting… {}",
                        format_duration(elapsed.as_secs_f64())
                    )),
            )
    }
}

impl Render for ConverterView {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        // Subscribe to appearance changes (once)
        if !self.appearance_subscription_set {
            self.appearance_subscription_set = true;
            cx.observe_window_appearance(window, |_this, _window, cx| {
                cx.notify();
            })
            .detach();
        }

        // Grab initial focus so menu shortcuts work immediately
        if self.needs_initial_focus {
            self.needs_initial_focus = false;
            if let Some(ref focus_handle) = self.focus_handle {
                focus_handle.focus(window);
            }
        }

        let theme = Theme::from_appearance(window.appearance());

        let on_external_drop = cx.listener(|this, paths: &ExternalPaths, _window, cx| {
            if let Some(path) = paths.paths().first() {
                this.select_file(path.clone());
                cx.notify();
            }
        });
        let on_pick_file = cx.listener(|this, _: &PickFile, _window, cx| {
            this.show_file_picker(cx);
        });
        let on_convert = cx.listener(|this, _: &ConvertFile, _window, cx| {
            this.convert();
            cx.notify();
        });
        let on_cancel = cx.listener(|this, _: &CancelConversion, _window, cx| {
            this.cancel_conversion();
            cx.notify();
        });

        let selected = self.render_selected_file(&theme).into_any_element();
        let buttons = self.render_buttons(&theme, cx).into_any_element();
        let progress = self
            .session
            .show_progress()
            .then(|| self.render_progress(&theme).into_any_element());

        let files = self.converted.files().to_vec();
        let list = render_converted_list(
            ConvertedListProps {
                files: &files,
                theme,
            },
            cx,
            |view: &mut Self, index, cx| {
                view.open_converted_at(index);
                cx.notify();
            },
        )
        .into_any_element();

        let status_bar = render_status_bar(
            StatusBarProps {
                converted_count: self.converted.len(),
                notice: self.notices.current().map(str::to_string),
            },
            &theme,
        )
        .into_any_element();

        let drop_hover_bg = theme.bg_card_hover;
        let mut container = div()
            .size_full()
            .flex()
            .flex_col()
            .bg(theme.bg)
            .text_color(theme.text);

        if let Some(ref focus_handle) = self.focus_handle {
            container = container.track_focus(focus_handle);
        }

        container
            .on_action(on_pick_file)
            .on_action(on_convert)
            .on_action(on_cancel)
            .on_drop(on_external_drop)
            .drag_over::<ExternalPaths>(move |style, _, _, _| style.bg(drop_hover_bg))
            .child(Header::render(
                "Diallaleh",
                "Convert audio files to MP3",
                &theme,
            ))
            .child(
                div()
                    .w_full()
                    .px_6()
                    .py_4()
                    .flex()
                    .flex_col()
                    .gap_3()
                    .child(selected)
                    .child(buttons)
                    .children(progress),
            )
            .child(
                div()
                    .px_6()
                    .text_xs()
                    .font_weight(gpui::FontWeight::SEMIBOLD)
                    .text_color(theme.text_muted)
                    .child("CONVERTED FILES"),
            )
            .child(
                div()
                    .id("converted-files-scroll")
                    .flex_1()
                    .w_full()
                    .overflow_scroll()
                    .track_scroll(&self.scroll_handle)
                    .px_6()
                    .py_2()
                    .child(list),
            )
            .child(status_bar)
    }
}
