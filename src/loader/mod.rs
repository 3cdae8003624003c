//! Installation of the mod loader into the server directory.

/// Why an installation could not complete.
#[derive(Debug)]
pub enum InstallCause {
    Download(crate::http::HttpError),
    IO(std::io::Error),
    Process(crate::proc::ProcessError),
    State(crate::state::StateError),
}

/// The loader could not be installed from `url`.
#[derive(Debug)]
pub struct InstallError {
    pub url: String,
    pub cause: InstallCause,
}
impl std::error::Error for InstallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            InstallCause::Download(err) => Some(err),
            InstallCause::IO(err) => Some(err),
            InstallCause::Process(err) => Some(err),
            InstallCause::State(err) => Some(err),
        }
    }
}
impl std::fmt::Display for InstallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "problem while installing loader from {}", self.url)
    }
}

pub struct LoaderInstaller<'a> {
    config: &'a crate::config::Config,
    downloader: &'a dyn crate::http::Download,
    runner: &'a dyn crate::proc::Run,
    store: &'a dyn crate::state::StateStore,
    eula: &'a dyn crate::eula::AcceptEula,
}

impl<'a> LoaderInstaller<'a> {
    pub fn new(
        config: &'a crate::config::Config,
        downloader: &'a dyn crate::http::Download,
        runner: &'a dyn crate::proc::Run,
        store: &'a dyn crate::state::StateStore,
        eula: &'a dyn crate::eula::AcceptEula,
    ) -> Self {
        return Self {
            config,
            downloader,
            runner,
            store,
            eula,
        };
    }

    /// Bring the server directory to the configured versions: install the
    /// loader unless `state` says it is already there, and fetch the sponge
    /// bootstrapper when the launch goes through it.
    pub fn ensure_installed(
        &self,
        state: &mut crate::state::InstallState,
        force: bool,
    ) -> Result<(), InstallError> {
        let install: &crate::config::InstallConfig = &self.config.install;
        let base_path: &std::path::Path = self.config.base_path();

        if force || state.should_install(&install.loader_version, &install.mc_version) {
            self.install_loader(state, base_path, &install.loader_version, &install.mc_version)?;
        } else {
            log::info!(
                "Loader {} for {} is already installed",
                state.loader_version,
                state.mc_version
            );
        }

        if !self.config.launch.spongefix {
            return Ok(());
        }
        let present: bool = !state.sponge_bootstrapper.is_empty()
            && base_path.join(&state.sponge_bootstrapper).is_file();
        if present && !force {
            return Ok(());
        }
        let updated: crate::state::InstallState = crate::state::InstallState {
            sponge_bootstrapper: self.install_sponge_bootstrapper(base_path),
            ..state.clone()
        };
        if let Err(err) = self.store.save(&updated) {
            return Err(InstallError {
                url: install.sponge_bootstrapper.clone(),
                cause: InstallCause::State(err),
            });
        }
        *state = updated;
        return Ok(());
    }

    /// Download the loader installer, run it in `base_path` and record the
    /// installed versions in `state`.
    pub fn install_loader(
        &self,
        state: &mut crate::state::InstallState,
        base_path: &std::path::Path,
        loader_version: &str,
        mc_version: &str,
    ) -> Result<(), InstallError> {
        let url: String = crate::parsing::fill_version_placeholders(
            &self.config.install.installer_url,
            loader_version,
            mc_version,
        );

        return match self.download_and_run(state, base_path, &url, loader_version, mc_version) {
            Ok(()) => Ok(()),
            Err(cause) => {
                let err: InstallError = InstallError { url, cause };
                log::error!(
                    "{}",
                    crate::util::aggregate_error_tree(&err, 2).trim_end()
                );
                Err(err)
            }
        };
    }

    fn download_and_run(
        &self,
        state: &mut crate::state::InstallState,
        base_path: &std::path::Path,
        url: &str,
        loader_version: &str,
        mc_version: &str,
    ) -> Result<(), InstallCause> {
        let installer_path: std::path::PathBuf =
            base_path.join(crate::constants::INSTALLER_FILE_NAME);

        log::info!("Attempting to download installer from {url}");
        if let Err(err) = self.downloader.download_to_file(url, &installer_path) {
            return Err(InstallCause::Download(err));
        }

        let installer_path_abs: std::path::PathBuf = match std::path::absolute(&installer_path) {
            Ok(n) => n,
            Err(err) => return Err(InstallCause::IO(err)),
        };

        let mut argv: Vec<String> = vec![
            self.config.launch.java_executable(),
            "-jar".into(),
            installer_path_abs.to_string_lossy().into_owned(),
        ];
        argv.extend(self.config.install.installer_arguments.iter().cloned());
        let command: crate::proc::LaunchCommand =
            crate::proc::LaunchCommand::new(argv, crate::config::work_dir(base_path));

        log::info!("Starting installation of loader, installer output incoming");
        log::debug!("Using installer command: {command}");
        match self.runner.run(command) {
            Ok(code) => log::info!("Installer exited with code {code:?}"),
            Err(err) => return Err(InstallCause::Process(err)),
        }

        log::info!("Done installing loader, deleting installer!");
        // Only what got saved is reflected in the caller's state.
        let updated: crate::state::InstallState = crate::state::InstallState {
            loader_installed: true,
            loader_version: loader_version.into(),
            mc_version: mc_version.into(),
            ..state.clone()
        };
        if let Err(err) = self.store.save(&updated) {
            return Err(InstallCause::State(err));
        }
        *state = updated;

        if let Err(err) = std::fs::remove_file(&installer_path) {
            log::warn!(
                "Cannot delete installer {}: {err}",
                installer_path.to_string_lossy()
            );
        }

        if let Err(err) = self.eula.check_eula(base_path) {
            log::error!(
                "{}",
                crate::util::aggregate_error_tree(&err, 2).trim_end()
            );
        }

        return Ok(());
    }

    /// Download the sponge bootstrapper next to the server. Best effort: the
    /// file name is returned even if the download failed.
    pub fn install_sponge_bootstrapper(&self, base_path: &std::path::Path) -> String {
        let url: &str = &self.config.install.sponge_bootstrapper;
        let filename: String = url_file_name(url);
        let target: std::path::PathBuf = base_path.join(&filename);

        log::info!("Downloading sponge bootstrapper from {url}");
        if let Err(err) = self.downloader.download_to_file(url, &target) {
            log::error!(
                "Error while downloading bootstrapper: {}",
                crate::util::aggregate_error_tree(&err, 2).trim_end()
            );
        }

        return filename;
    }
}

/// Last path segment of a URL, ignoring any query or fragment.
///
/// ```rust
/// use serverstarter::loader::url_file_name;
/// assert_eq!(url_file_name("https://repo.example/sponge/SpongeBootstrap-0.7.1.jar"), "SpongeBootstrap-0.7.1.jar");
/// assert_eq!(url_file_name("https://repo.example/a.jar?token=1#top"), "a.jar");
/// assert_eq!(url_file_name("bootstrap.jar"), "bootstrap.jar");
/// ```
pub fn url_file_name(url: &str) -> String {
    let without_suffix: &str = match url.find(|c: char| c == '?' || c == '#') {
        Some(i) => &url[..i],
        None => url,
    };
    let name: &str = match without_suffix.rsplit_once(|c: char| c == '/' || c == '\\') {
        Some((_, n)) => n,
        None => without_suffix,
    };
    return name.into();
}
