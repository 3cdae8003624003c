//! Abstractions related to the inputs of the CLI program.

#[derive(clap::Parser)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version,
    about = "Installs a mod loader and keeps the modded server running.",
    after_help = crate::text::HELPTEXT
)]
pub struct Cli {
    #[arg(short, long, global = true, default_value = "info", value_parser = parse_log_level)]
    pub log_level: log::LevelFilter,

    #[arg(
        long,
        global = true,
        value_name = "FILE",
        default_value = crate::constants::DEFAULT_CONFIG_PATH
    )]
    pub config: std::path::PathBuf,

    #[arg(
        long,
        global = true,
        value_name = "FILE",
        default_value = crate::constants::DEFAULT_LOCK_FILE_PATH
    )]
    pub lock_file: std::path::PathBuf,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(clap::Subcommand)]
pub enum Cmd {
    #[command(
        name = "start",
        about = "Install the loader if needed, then run the server and restart it when it stops."
    )]
    Start,

    #[command(name = "install", about = "Install the loader without starting the server.")]
    Install {
        #[arg(long, help = "Install even if the lock file says the versions are already installed.")]
        force: bool,
    },

    #[command(
        name = "launch-command",
        about = "Print the commands a server start would run, without running them."
    )]
    LaunchCommand,
}

fn parse_log_level(input: &str) -> std::result::Result<log::LevelFilter, std::string::String> {
    const SUPPORTED_LEVELS: [(&str, log::LevelFilter); 6] = [
        ("off", log::LevelFilter::Off),
        ("error", log::LevelFilter::Error),
        ("warn", log::LevelFilter::Warn),
        ("info", log::LevelFilter::Info),
        ("debug", log::LevelFilter::Debug),
        ("trace", log::LevelFilter::Trace),
    ];

    SUPPORTED_LEVELS
        .iter()
        .find(|(name, _)| {
            let name: &str = *name;
            name == input
        })
        .map(|&(_, level)| level)
        .ok_or_else(|| {
            let supported = SUPPORTED_LEVELS
                .iter()
                .map(|(name, _)| *name)
                .collect::<std::vec::Vec<&str>>()
                .join(", ");
            format!("supported values: {supported}")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["serverstarter", "start"]).expect("args should parse");
        assert_eq!(cli.log_level, log::LevelFilter::Info);
        assert_eq!(cli.config, std::path::PathBuf::from("server-setup-config.toml"));
        assert_eq!(cli.lock_file, std::path::PathBuf::from("serverstarter.lock"));
        assert!(matches!(cli.cmd, Cmd::Start));
    }

    #[test]
    fn test_install_force_and_global_flags() {
        let cli = Cli::try_parse_from([
            "serverstarter",
            "install",
            "--force",
            "--log-level",
            "debug",
            "--config",
            "/srv/mc/setup.toml",
        ])
        .expect("args should parse");
        assert_eq!(cli.log_level, log::LevelFilter::Debug);
        assert_eq!(cli.config, std::path::PathBuf::from("/srv/mc/setup.toml"));
        assert!(matches!(cli.cmd, Cmd::Install { force: true }));
    }

    #[test]
    fn test_bad_log_level() {
        assert!(Cli::try_parse_from(["serverstarter", "--log-level", "loud", "start"]).is_err());
        assert_eq!(
            parse_log_level("loud"),
            Err("supported values: off, error, warn, info, debug, trace".into())
        );
    }
}
