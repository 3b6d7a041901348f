//! Diallaleh - GPUI Application
//!
//! Pick an audio file, convert it to MP3 with ffmpeg, and keep a list of
//! converted files that open in the system player.

mod actions;
mod audio;
mod conversion;
mod core;
mod logging;
mod ui;
mod viewer;

use gpui::{
    prelude::*, px, size, App, Application, Bounds, KeyBinding, Menu, MenuItem, WindowBounds,
    WindowHandle, WindowOptions,
};
use std::path::PathBuf;

use actions::{CancelConversion, ConvertFile, OpenLogDir, OpenOutputDir, PickFile, Quit};
use conversion::ConversionEngine;
use core::Preferences;
use ui::components::ConverterView;

fn build_menus() -> Vec<Menu> {
    vec![
        Menu {
            name: "Diallaleh".into(),
            items: vec![MenuItem::action("Quit", Quit)],
        },
        Menu {
            name: "File".into(),
            items: vec![
                MenuItem::action("Pick File...", PickFile),
                MenuItem::action("Convert to MP3", ConvertFile),
                MenuItem::action("Cancel Conversion", CancelConversion),
                MenuItem::separator(),
                MenuItem::action("Open Output Folder", OpenOutputDir),
                MenuItem::action("Open Log Folder", OpenLogDir),
            ],
        },
    ]
}

/// Output directory, falling back to the temp dir if none can be determined
fn resolve_output_dir() -> PathBuf {
    conversion::get_output_dir().unwrap_or_else(|e| {
        log::warn!("{}; using temp directory for output", e);
        std::env::temp_dir().join("Diallaleh")
    })
}

fn load_preferences() -> Preferences {
    Preferences::load_default().unwrap_or_else(|e| {
        log::warn!("{}; preferences will not persist across sessions", e);
        Preferences::open(std::env::temp_dir().join("diallaleh-preferences.json"))
    })
}

fn main() {
    logging::init_logging();

    let app = Application::new();

    // Files opened with the app are picked up by the view's polling loop
    app.on_open_urls(|urls| {
        log::info!("Received open request for {} file(s)", urls.len());
        actions::push_pending_locators(urls);
    });

    app.run(|cx: &mut App| {
        cx.on_action(|_: &Quit, cx| cx.quit());
        cx.on_action(|_: &OpenOutputDir, _cx| {
            let output_dir = resolve_output_dir();
            if let Err(e) = viewer::open_directory(&output_dir) {
                log::warn!("{}", e);
            }
        });
        cx.on_action(|_: &OpenLogDir, _cx| {
            if let Err(e) = logging::open_log_directory() {
                log::warn!("{}", e);
            }
        });

        cx.bind_keys([
            KeyBinding::new("cmd-q", Quit, None),
            KeyBinding::new("cmd-o", PickFile, None),
            KeyBinding::new("cmd-enter", ConvertFile, None),
            KeyBinding::new("escape", CancelConversion, None),
        ]);

        cx.set_menus(build_menus());

        let engine = match conversion::get_ffmpeg_path() {
            Ok(path) => {
                log::info!("Using ffmpeg at {}", path.display());
                Some(ConversionEngine::new(path))
            }
            Err(e) => {
                log::error!("{}", e);
                None
            }
        };
        let prefs = load_preferences();
        let output_dir = resolve_output_dir();

        let bounds = Bounds::centered(None, size(px(520.), px(620.)), cx);

        let window_handle: Result<WindowHandle<ConverterView>, _> = cx.open_window(
            WindowOptions {
                window_bounds: Some(WindowBounds::Windowed(bounds)),
                window_min_size: Some(size(px(420.), px(360.))),
                titlebar: Some(gpui::TitlebarOptions {
                    title: Some("Diallaleh".into()),
                    appears_transparent: false,
                    traffic_light_position: None,
                }),
                ..Default::default()
            },
            |_window, cx| {
                cx.new(|cx| {
                    let view = ConverterView::new(prefs, output_dir, engine, cx);
                    view.start_polling(cx);
                    view
                })
            },
        );

        if let Err(e) = window_handle {
            log::error!("Failed to open main window: {}", e);
            cx.quit();
            return;
        }

        // Single-window utility: quit when the window closes
        cx.on_window_closed(|cx| {
            cx.quit();
        })
        .detach();

        cx.activate(true);
    });
}
