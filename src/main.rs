use ChemoTax::Utils::logger::{init_logger, level_from_str};
use ChemoTax::cli::cli_chemotaxis::run_task_file;
use ChemoTax::cli::cli_main::run_interactive_menu;
use std::env;
use std::process::ExitCode;

/// `ChemoTax` opens the menu, `ChemoTax task.json` runs that task and exits.
/// The log level is read from `CHEMOTAX_LOG` (info by default), `CHEMOTAX_LOG_FILE` adds a log file.
pub fn main() -> ExitCode {
    let level = env::var("CHEMOTAX_LOG")
        .map(|name| level_from_str(&name))
        .unwrap_or(log::LevelFilter::Info);
    let log_file = env::var("CHEMOTAX_LOG_FILE").ok();
    if let Err(e) = init_logger(level, log_file.as_deref()) {
        eprintln!("failed to open log file: {}", e);
    }

    let args: Vec<String> = env::args().collect();
    match args.get(1) {
        Some(path) => match run_task_file(path) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("{}", e);
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
        None => {
            run_interactive_menu();
            ExitCode::SUCCESS
        }
    }
}
