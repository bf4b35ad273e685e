mod app;
mod cli;
mod effects;
mod frontpage;
mod logging;
mod programs;
mod timers;
mod ui;

use launcher_logging::launcher_error;

pub use app::run_app;

/// Logs a startup failure and shows it in a blocking native dialog.
pub fn report_fatal(err: &anyhow::Error) {
    launcher_error!("Fatal error: {:#}", err);
    eprintln!("Fatal error: {err:#}");
    let _ = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Fatal Error")
        .set_description(format!("{err:#}"))
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}
