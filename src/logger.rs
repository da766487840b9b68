use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";

/// Send log records at `level` and above to standard error, leaving
/// standard output to the status lines.
///
/// # Errors
/// Returns an error if a logger is already installed.
pub fn init(level: LevelFilter) -> Result<(), Box<dyn std::error::Error>> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

/// Parse a level name as given on the command line ("off", "error",
/// "warn", "info", "debug", "trace"), case-insensitively.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.parse().ok()
}
