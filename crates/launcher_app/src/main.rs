mod platform;

use std::process::ExitCode;

fn main() -> ExitCode {
    match platform::run_app() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            platform::report_fatal(&err);
            ExitCode::FAILURE
        }
    }
}
