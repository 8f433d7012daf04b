//! Command-line entry point.

use floorplan_app::{InspectError, ShortcutRegistry, inspect_file};
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "floorplan <plan.json> | floorplan --shortcuts";

fn run() -> Result<(), InspectError> {
    let mut args = std::env::args().skip(1);
    match (args.next(), args.next()) {
        (Some(flag), None) if flag == "--shortcuts" => {
            ShortcutRegistry::print_all();
            Ok(())
        }
        (Some(path), None) => {
            let report = inspect_file(&PathBuf::from(path))?;
            print!("{}", report);
            Ok(())
        }
        _ => Err(InspectError::Usage(USAGE.to_string())),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting floorplan");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
