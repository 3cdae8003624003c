use serverstarter::{
    args::{Cli, Cmd},
    config::Config,
    error::FatalError,
    launch::{LaunchCommands, ServerLauncher},
    loader::{InstallCause, InstallError, LoaderInstaller},
    state::{InstallState, JsonStateStore, StateStore},
};

/// Configuration file is missing or invalid.
static EXIT_ERR_CONFIG: u8 = 42;

/// Lock file cannot be read or written.
static EXIT_ERR_STATE: u8 = 43;

/// Loader installer could not be downloaded or run.
static EXIT_ERR_INSTALL: u8 = 44;

/// Logging could not be set up, nothing else has been tried.
static EXIT_ERR_LOGGING: u8 = 45;

fn main() -> std::process::ExitCode {
    let cli: Cli = clap::Parser::parse();

    let _logger: log4rs::Handle = match serverstarter::logging::init_logger(
        cli.log_level,
        Some(std::path::Path::new(serverstarter::constants::LOG_FILE_PATH)),
    ) {
        Ok(n) => n,
        Err(err) => {
            eprintln!(
                "{}",
                serverstarter::util::aggregate_error_tree(&FatalError::from(err), 2).trim_end()
            );
            return std::process::ExitCode::from(EXIT_ERR_LOGGING);
        }
    };
    log::info!("{}", serverstarter::text::INFOTEXT);

    return match run(cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            log::error!(
                "Unrecoverable error: {}",
                serverstarter::util::aggregate_error_tree(&err, 2).trim_end()
            );
            let code: u8 = match err {
                FatalError::Config(_) => EXIT_ERR_CONFIG,
                FatalError::State(_) => EXIT_ERR_STATE,
                FatalError::Install(_) => EXIT_ERR_INSTALL,
                FatalError::Logging(_) => EXIT_ERR_LOGGING,
            };
            std::process::ExitCode::from(code)
        }
    };
}

fn run(cli: Cli) -> Result<(), FatalError> {
    let config: Config = Config::get_from_fs(&cli.config)?;
    let store: JsonStateStore = JsonStateStore::new(cli.lock_file);
    let mut state: InstallState = store.load()?;

    match cli.cmd {
        Cmd::Start => {
            install(&config, &store, &mut state, false)?;
            let launcher: ServerLauncher = ServerLauncher::new(
                &config,
                &state,
                &serverstarter::proc::InheritedIo,
                &serverstarter::platform::Host,
            );
            serverstarter::supervise::Supervisor::new(
                &config.launch,
                &launcher,
                &serverstarter::supervise::SystemClock,
            )
            .handle_server();
        }

        Cmd::Install { force } => install(&config, &store, &mut state, force)?,

        Cmd::LaunchCommand => {
            let launcher: ServerLauncher = ServerLauncher::new(
                &config,
                &state,
                &serverstarter::proc::InheritedIo,
                &serverstarter::platform::Host,
            );
            let LaunchCommands {
                pre_sync,
                server,
                post_sync,
            } = launcher.build_commands(&launcher.level_name());
            for command in pre_sync
                .iter()
                .chain(std::iter::once(&server))
                .chain(post_sync.iter())
            {
                println!("{command}");
            }
        }
    }

    return Ok(());
}

fn install(
    config: &Config,
    store: &dyn StateStore,
    state: &mut InstallState,
    force: bool,
) -> Result<(), InstallError> {
    let downloader: serverstarter::http::HttpDownloader =
        match serverstarter::http::HttpDownloader::new() {
            Ok(n) => n,
            Err(err) => {
                return Err(InstallError {
                    url: config.install.installer_url(),
                    cause: InstallCause::Download(err),
                })
            }
        };
    let eula = serverstarter::eula::PromptingEula::stdin();
    let installer: LoaderInstaller = LoaderInstaller::new(
        config,
        &downloader,
        &serverstarter::proc::InheritedIo,
        store,
        &eula,
    );
    return installer.ensure_installed(state, force);
}
