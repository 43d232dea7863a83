mod config;
mod driver;
mod error;
mod isometric;
mod particles;
mod shade;
mod state;
mod surface;
mod theme;
mod widget;

use clap::Parser;
use config::Args;
use driver::Driver;
use druid::{AppLauncher, LocalizedString, WindowDesc};
use error::AppError;
use state::AppState;
use widget::BackgroundWidget;

/// Main function
pub fn main() -> Result<(), AppError> {
    let args = Args::parse();
    let driver = Driver::new(args.scene_config());

    let main_window = WindowDesc::new(BackgroundWidget::new(driver))
        .title(LocalizedString::new("isoflow-window-title").with_placeholder("Isoflow"))
        .window_size((args.width, args.height));

    let initial_state = AppState {
        theme: args.theme,
        debug: args.debug,
        paused: false,
    };

    AppLauncher::with_window(main_window)
        .log_to_console()
        .launch(initial_state)?;

    Ok(())
}
