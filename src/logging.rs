use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Pick the log level: each `-v` raises it one step above `info`, otherwise
/// the configured level applies.
pub fn level_for(verbosity: u8, configured: LevelFilter) -> LevelFilter {
    match verbosity {
        0 => configured,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install a terminal logger on stderr so stdout stays free for the wrapped
/// command or printed variables.
/// Best-effort: a logger that is already installed is left in place.
pub fn init(level: LevelFilter) {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}
