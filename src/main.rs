// dsviz: step-through simulator for classic data structures

use std::process::ExitCode;

fn main() -> ExitCode {
    match dsviz::cli::run_from_env() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "dsviz failed");
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
