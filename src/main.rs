// src/main.rs

use std::process::ExitCode;

use gasw::{cli, run};

#[tokio::main]
async fn main() -> ExitCode {
    // Local jobs still running are killed when the runtime drops their tasks.
    match run(cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("gasw error: {err:?}");
            ExitCode::FAILURE
        }
    }
}
