//! log4rs setup. Everything goes through the `log` facade; this module only
//! decides where records end up.

use anyhow::{Context, Result};
use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};

// Pattern: https://docs.rs/log4rs/*/log4rs/encode/pattern/index.html
const CONSOLE_PATTERN: &str = "{d(%H:%M:%S%.3f)} {h({l:<5})} {t} - {m}{n}";
const FILE_PATTERN: &str = "{d} {l} {t} {f}:{L} - {m}{n}";

/// Build the logger configuration without installing it.
///
/// Records always go to stderr so stdout stays free for reports. When
/// `file_path` is given, the same records are appended to that file too.
pub fn build_config(log_level: LevelFilter, file_path: Option<&str>) -> Result<Config> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();

    let mut config_builder =
        Config::builder().appender(Appender::builder().build("stderr", Box::new(stderr)));
    let mut root = Root::builder().appender("stderr");

    if let Some(path) = file_path {
        let logfile = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(FILE_PATTERN)))
            .build(path)
            .with_context(|| format!("failed to open log file {path}"))?;

        config_builder =
            config_builder.appender(Appender::builder().build("logfile", Box::new(logfile)));
        root = root.appender("logfile");
    }

    config_builder
        .build(root.build(log_level))
        .context("invalid logger configuration")
}

/// Install the global logger. Fails if a logger is already set.
pub fn initialize_logger(log_level: LevelFilter, file_path: Option<&str>) -> Result<()> {
    let config = build_config(log_level, file_path)?;
    log4rs::init_config(config).context("failed to install logger")?;
    Ok(())
}
