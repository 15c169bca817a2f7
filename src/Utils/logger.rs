use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;

/// Terminal logger, optionally combined with a log file.
/// Calling it twice is harmless: the second logger is refused and a message is printed.
pub fn init_logger(level: LevelFilter, log_file: Option<&str>) -> Result<(), std::io::Error> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        let file = File::create(path)?;
        loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file));
    }
    if CombinedLogger::init(loggers).is_err() {
        println!("logger already initialised");
    }
    Ok(())
}

/// level from a name such as "info" or "debug"; unknown names give `Info`
pub fn level_from_str(name: &str) -> LevelFilter {
    match name.trim().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}
