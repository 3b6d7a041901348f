//! Event polling and the file picker for ConverterView
//!
//! Engine completions arrive on a channel from worker threads; a timer loop
//! on the UI thread drains it, picks up files opened via the OS, and expires
//! notices.

use std::time::{Duration, Instant};

use gpui::{AsyncApp, Context, PathPromptOptions, Timer, WeakEntity};

use crate::actions::take_pending_locators;

use super::ConverterView;

impl ConverterView {
    /// Drain pending engine events. Returns true if any were handled.
    pub fn poll_engine_events(&mut self) -> bool {
        let mut handled = false;
        while let Ok(event) = self.engine_rx.try_recv() {
            self.handle_engine_event(event);
            handled = true;
        }
        handled
    }

    /// Select the last file handed over by the OS, if any
    pub fn poll_pending_open_files(&mut self) -> bool {
        let locators = take_pending_locators();
        match locators.last() {
            Some(locator) => self.select_locator(locator),
            None => false,
        }
    }

    /// One polling tick. Returns true if the view needs a redraw.
    pub fn poll(&mut self, now: Instant) -> bool {
        let had_events = self.poll_engine_events();
        let opened = self.poll_pending_open_files();
        let expired = self.notices.expire(now);
        // Keep the elapsed time ticking while converting
        had_events || opened || expired || self.session.is_converting()
    }

    /// Start the polling loop (called once after the view is created)
    pub fn start_polling(&self, cx: &mut Context<Self>) {
        cx.spawn(|this: WeakEntity<Self>, cx: &mut AsyncApp| {
            let mut async_cx = cx.clone();
            async move {
                loop {
                    Timer::after(Duration::from_millis(100)).await;

                    let alive = this
                        .update(&mut async_cx, |this, cx| {
                            if this.poll(Instant::now()) {
                                cx.notify();
                            }
                        })
                        .is_ok();

                    if !alive {
                        break;
                    }
                }
            }
        })
        .detach();
    }

    /// Show the open dialog and select the chosen file
    pub fn show_file_picker(&mut self, cx: &mut Context<Self>) {
        if self.session.is_converting() {
            return;
        }

        let options = PathPromptOptions {
            files: true,
            directories: false,
            multiple: false,
            prompt: None,
        };
        let receiver = cx.prompt_for_paths(options);
        cx.spawn(|this_handle: WeakEntity<Self>, cx: &mut AsyncApp| {
            let mut async_cx = cx.clone();
            async move {
                if let Ok(Ok(Some(paths))) = receiver.await {
                    if let Some(path) = paths.first() {
                        let path = path.clone();
                        let _ = this_handle.update(&mut async_cx, |this, cx| {
                            this.select_file(path);
                            cx.notify();
                        });
                    }
                }
            }
        })
        .detach();
    }
}
