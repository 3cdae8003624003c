//! Abstractions for managing logging.

#[derive(Debug)]
pub enum Error {
    Cfg(log4rs::config::runtime::ConfigErrors),
    Set(log::SetLoggerError),
    File(std::io::Error),
}
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Cfg(err) => Some(err),
            Error::Set(err) => Some(err),
            Error::File(err) => Some(err),
        }
    }
}
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::File(_) => write!(f, "logger initialization failed: cannot open log file"),
            _ => write!(f, "logger initialization failed"),
        }
    }
}
impl From<log4rs::config::runtime::ConfigErrors> for Error {
    fn from(value: log4rs::config::runtime::ConfigErrors) -> Self {
        Self::Cfg(value)
    }
}
impl From<log::SetLoggerError> for Error {
    fn from(value: log::SetLoggerError) -> Self {
        Self::Set(value)
    }
}
impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::File(value)
    }
}

fn make_logger_config(
    level: log::LevelFilter,
    log_file: Option<&std::path::Path>,
) -> Result<log4rs::Config, Error> {
    let stdout: log4rs::append::console::ConsoleAppender =
        log4rs::append::console::ConsoleAppender::builder()
            .encoder(Box::new(log4rs::encode::pattern::PatternEncoder::new(
                "[{d(%H:%M:%S)}] {h([{l}])} - {m}{n}",
            )))
            .build();

    let mut config_builder: log4rs::config::runtime::ConfigBuilder = log4rs::Config::builder()
        .appender(log4rs::config::Appender::builder().build("stdout", Box::new(stdout)));
    let mut root_builder: log4rs::config::runtime::RootBuilder =
        log4rs::config::Root::builder().appender("stdout");

    // The file gets everything the console gets, plus timestamps with dates.
    if let Some(path) = log_file {
        let file: log4rs::append::file::FileAppender =
            log4rs::append::file::FileAppender::builder()
                .encoder(Box::new(log4rs::encode::pattern::PatternEncoder::new(
                    "[{d(%Y-%m-%dT%H:%M:%S%.3f)}] [{l}] [{M}] - {m}{n}",
                )))
                .build(path)?;
        config_builder =
            config_builder.appender(log4rs::config::Appender::builder().build("file", Box::new(file)));
        root_builder = root_builder.appender("file");
    }

    let logger_config: log4rs::Config = config_builder.build(root_builder.build(level))?;

    return Ok(logger_config);
}

/// Initialize a global logging utility.
pub fn init_logger(
    level: log::LevelFilter,
    log_file: Option<&std::path::Path>,
) -> Result<log4rs::Handle, Error> {
    let config: log4rs::Config = make_logger_config(level, log_file)?;
    let handle: log4rs::Handle = log4rs::init_config(config)?;
    return Ok(handle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_without_file_appender() {
        let config = make_logger_config(log::LevelFilter::Info, None);
        match config {
            Ok(config) => {
                assert_eq!(config.appenders().len(), 1);
                assert_eq!(config.root().level(), log::LevelFilter::Info);
            }
            Err(err) => panic!("expected valid logger config, got {err}"),
        }
    }

    #[test]
    fn test_config_with_file_appender() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let path = dir.path().join("serverstarter.log");
        let config = make_logger_config(log::LevelFilter::Debug, Some(&path));
        match config {
            Ok(config) => {
                assert_eq!(config.appenders().len(), 2);
                assert_eq!(config.root().appenders().len(), 2);
            }
            Err(err) => panic!("expected valid logger config, got {err}"),
        }
        assert!(path.is_file(), "file appender creates the log file");
    }
}
