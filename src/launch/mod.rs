//! Building and running the command line of the game server.

/// A step of a server run that failed. Logged, never propagated: the run
/// still counts as a start.
#[derive(Debug)]
pub enum LaunchError {
    PreSync(crate::proc::ProcessError),
    Server(crate::proc::ProcessError),
    PostSync(crate::proc::ProcessError),
}
impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LaunchError::PreSync(err) => Some(err),
            LaunchError::Server(err) => Some(err),
            LaunchError::PostSync(err) => Some(err),
        }
    }
}
impl std::fmt::Display for LaunchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaunchError::PreSync(_) => write!(f, "cannot restore world from RAM disk backup"),
            LaunchError::Server(_) => write!(f, "error while starting the server"),
            LaunchError::PostSync(_) => write!(f, "cannot back up world from RAM disk"),
        }
    }
}

pub trait Launch {
    /// Run the server once, blocking until it exits.
    fn start_server(&self);
}

/// Everything that gets run for one start of the server, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommands {
    pub pre_sync: Option<crate::proc::LaunchCommand>,
    pub server: crate::proc::LaunchCommand,
    pub post_sync: Option<crate::proc::LaunchCommand>,
}

pub struct ServerLauncher<'a> {
    config: &'a crate::config::Config,
    state: &'a crate::state::InstallState,
    runner: &'a dyn crate::proc::Run,
    platform: &'a dyn crate::platform::Platform,
}

impl<'a> ServerLauncher<'a> {
    pub fn new(
        config: &'a crate::config::Config,
        state: &'a crate::state::InstallState,
        runner: &'a dyn crate::proc::Run,
        platform: &'a dyn crate::platform::Platform,
    ) -> Self {
        return Self {
            config,
            state,
            runner,
            platform,
        };
    }

    /// Name of the world directory as configured in `server.properties`, or
    /// the server's default if there is no such file yet or the name is blank.
    pub fn level_name(&self) -> String {
        let path: std::path::PathBuf = self
            .config
            .base_path()
            .join(crate::constants::SERVER_PROPERTIES_FILE_NAME);
        let content: String = match std::fs::read_to_string(&path) {
            Ok(n) => n,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return crate::constants::DEFAULT_LEVEL_NAME.into();
            }
            Err(err) => {
                log::warn!("Cannot read {}: {err}", path.to_string_lossy());
                return crate::constants::DEFAULT_LEVEL_NAME.into();
            }
        };
        return match crate::parsing::property_value(&content, "level-name") {
            Some(n) if !n.is_empty() => n.into(),
            Some(_) => {
                log::warn!(
                    "Empty level-name in {} -- Using '{}'",
                    path.to_string_lossy(),
                    crate::constants::DEFAULT_LEVEL_NAME
                );
                crate::constants::DEFAULT_LEVEL_NAME.into()
            }
            None => crate::constants::DEFAULT_LEVEL_NAME.into(),
        };
    }

    /// File name of the jar to launch.
    pub fn launch_jar_name(&self) -> String {
        if self.config.launch.spongefix {
            return self.state.sponge_bootstrapper.clone();
        }
        return crate::parsing::fill_version_placeholders(
            &self.config.launch.start_file,
            &self.state.loader_version,
            &self.state.mc_version,
        );
    }

    pub fn build_commands(&self, level_name: &str) -> LaunchCommands {
        let launch: &crate::config::LaunchConfig = &self.config.launch;
        let work_dir: std::path::PathBuf = crate::config::work_dir(self.config.base_path());

        let ram_disk: bool = if !launch.ram_disk {
            false
        } else if self.platform.is_supported_ram_disk_platform() {
            true
        } else {
            log::warn!("RAM disk is not supported on this platform -- Not syncing world data");
            false
        };

        let mut argv: Vec<String> = crate::parsing::split_words(&launch.pre_java_args);
        argv.push(launch.java_executable());
        argv.extend(launch.java_args.iter().cloned());
        argv.push(format!("-Xmx{}", launch.max_ram));
        if let Some(xms) = heap_min_argument(launch) {
            argv.push(xms);
        }

        let launch_jar: std::path::PathBuf = self.config.base_path().join(self.launch_jar_name());
        let launch_jar: std::path::PathBuf = std::path::absolute(&launch_jar).unwrap_or(launch_jar);
        argv.push("-jar".into());
        argv.push(launch_jar.to_string_lossy().into_owned());
        argv.push("nogui".into());

        let backup: String = format!("{level_name}_backup");
        return LaunchCommands {
            pre_sync: ram_disk.then(|| mirror_command(&backup, level_name, &work_dir)),
            server: crate::proc::LaunchCommand::new(argv, work_dir.clone()),
            post_sync: ram_disk.then(|| mirror_command(level_name, &backup, &work_dir)),
        };
    }

    fn run_step(
        &self,
        command: crate::proc::LaunchCommand,
        wrap: fn(crate::proc::ProcessError) -> LaunchError,
    ) {
        match self.runner.run(command) {
            Ok(code) => log::debug!("Exited with code {code:?}"),
            Err(err) => log::error!(
                "{}",
                crate::util::aggregate_error_tree(&wrap(err), 2).trim_end()
            ),
        }
    }
}

impl<'a> Launch for ServerLauncher<'a> {
    fn start_server(&self) {
        let level_name: String = self.level_name();
        let commands: LaunchCommands = self.build_commands(&level_name);

        log::info!("Using arguments: {}", commands.server);
        log::info!("Starting server, output incoming");

        if let Some(command) = commands.pre_sync {
            self.run_step(command, LaunchError::PreSync);
        }
        self.run_step(commands.server, LaunchError::Server);
        if let Some(command) = commands.post_sync {
            self.run_step(command, LaunchError::PostSync);
        }
    }
}

/// `-Xms` argument to add, if any: the configured minimum heap, or else half
/// of the maximum heap unless the java arguments already set one.
pub fn heap_min_argument(launch: &crate::config::LaunchConfig) -> Option<String> {
    if !launch.min_ram.trim().is_empty() {
        return Some(format!("-Xms{}", launch.min_ram));
    }
    if launch.java_args.iter().any(|n| n.trim().starts_with("-Xms")) {
        return None;
    }
    return match launch.max_ram.parse::<crate::parsing::RamSize>() {
        Ok(max) => Some(format!("-Xms{}", max.halved())),
        Err(err) => {
            let err: crate::parsing::ParseError = err.into();
            log::error!(
                "Problem while calculating minimum heap size: {}",
                crate::util::aggregate_error_tree(&err, 2).trim_end()
            );
            None
        }
    };
}

/// One way mirror of directory `from` onto `to`, deleting what `from` lacks.
fn mirror_command(from: &str, to: &str, work_dir: &std::path::Path) -> crate::proc::LaunchCommand {
    return crate::proc::LaunchCommand::new(
        vec![
            "rsync".into(),
            "-aAXv".into(),
            "--delete".into(),
            format!("{from}/"),
            to.into(),
        ],
        work_dir.to_path_buf(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Collects log records of the current test thread.
    struct CaptureLogger;
    thread_local! {
        static CAPTURED: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
    }
    impl log::Log for CaptureLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            return true;
        }
        fn log(&self, record: &log::Record) {
            CAPTURED.with(|n| {
                n.borrow_mut()
                    .push((record.level(), record.args().to_string()))
            });
        }
        fn flush(&self) {}
    }
    static CAPTURE_LOGGER: CaptureLogger = CaptureLogger;

    /// Start capturing log records on this thread, dropping earlier ones.
    fn capture_logs() {
        let _ = log::set_logger(&CAPTURE_LOGGER);
        log::set_max_level(log::LevelFilter::Trace);
        CAPTURED.with(|n| n.borrow_mut().clear());
    }

    fn captured_warnings() -> Vec<String> {
        return CAPTURED.with(|n| {
            n.borrow()
                .iter()
                .filter(|(level, _)| *level == log::Level::Warn)
                .map(|(_, message)| message.clone())
                .collect()
        });
    }

    struct MockPlatform(bool);
    impl crate::platform::Platform for MockPlatform {
        fn is_supported_ram_disk_platform(&self) -> bool {
            return self.0;
        }
    }

    /// Records commands; fails the ones whose program is in `failing`.
    #[derive(Default)]
    struct MockRunner {
        failing: Vec<&'static str>,
        commands: RefCell<Vec<crate::proc::LaunchCommand>>,
    }
    impl crate::proc::Run for MockRunner {
        fn run(
            &self,
            command: crate::proc::LaunchCommand,
        ) -> Result<Option<i32>, crate::proc::ProcessError> {
            let program: String = command.argv()[0].clone();
            self.commands.borrow_mut().push(command);
            if self.failing.contains(&program.as_str()) {
                return Err(crate::proc::ProcessError::Spawn((
                    program,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                )));
            }
            return Ok(Some(0));
        }
    }

    fn config(base: &std::path::Path) -> crate::config::Config {
        let mut config: crate::config::Config = toml::from_str(
            r#"
[install]
mc_version = "1.12.2"
loader_version = "14.23.5.2860"
installer_url = "https://files.example.invalid/installer.jar"
"#,
        )
        .expect("test config should parse");
        config.install.base_install_path = base.to_string_lossy().into_owned();
        return config;
    }

    fn state() -> crate::state::InstallState {
        return crate::state::InstallState {
            loader_installed: true,
            loader_version: "14.23.5.2860".into(),
            mc_version: "1.12.2".into(),
            sponge_bootstrapper: "SpongeBootstrap-0.7.1.jar".into(),
        };
    }

    fn launch_config(max_ram: &str, min_ram: &str, java_args: &[&str]) -> crate::config::LaunchConfig {
        return crate::config::LaunchConfig {
            max_ram: max_ram.into(),
            min_ram: min_ram.into(),
            java_args: java_args.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        };
    }

    #[test]
    fn test_heap_min_derived_from_max() {
        assert_eq!(heap_min_argument(&launch_config("4G", "", &[])), Some("-Xms2G".into()));
        assert_eq!(heap_min_argument(&launch_config("3G", "", &[])), Some("-Xms1G".into()));
        assert_eq!(heap_min_argument(&launch_config("1G", "", &[])), Some("-Xms1G".into()));
        assert_eq!(
            heap_min_argument(&launch_config("6144M", "", &[])),
            Some("-Xms3072M".into())
        );
    }

    #[test]
    fn test_heap_min_configured() {
        assert_eq!(
            heap_min_argument(&launch_config("4G", "3G", &["-Xms1G"])),
            Some("-Xms3G".into())
        );
        assert_eq!(
            heap_min_argument(&launch_config("4G", "  ", &[])),
            Some("-Xms2G".into()),
            "blank minimum counts as not configured"
        );
    }

    #[test]
    fn test_heap_min_already_in_java_args() {
        assert_eq!(
            heap_min_argument(&launch_config("4G", "", &["-XX:+UseG1GC", " -Xms512M"])),
            None
        );
    }

    #[test]
    fn test_heap_min_unparsable_max() {
        assert_eq!(heap_min_argument(&launch_config("lots", "", &[])), None);
        assert_eq!(heap_min_argument(&launch_config("", "", &[])), None);
    }

    #[test]
    fn test_build_commands() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let mut config = config(dir.path());
        config.launch.pre_java_args = "  nice  -n 5 ".into();
        config.launch.java_args = vec!["-XX:+UseG1GC".into()];
        config.launch.max_ram = "4G".into();
        let state = state();
        let runner = MockRunner::default();
        let launcher = ServerLauncher::new(&config, &state, &runner, &MockPlatform(true));

        let commands: LaunchCommands = launcher.build_commands("world");
        assert_eq!(commands.pre_sync, None);
        assert_eq!(commands.post_sync, None);

        let jar: String = dir
            .path()
            .join("forge-1.12.2-14.23.5.2860.jar")
            .to_string_lossy()
            .into_owned();
        assert_eq!(
            commands.server.argv(),
            &[
                "nice",
                "-n",
                "5",
                "java",
                "-XX:+UseG1GC",
                "-Xmx4G",
                "-Xms2G",
                "-jar",
                jar.as_str(),
                "nogui"
            ]
        );
        assert_eq!(commands.server.work_dir(), dir.path());
    }

    #[test]
    fn test_spongefix_uses_bootstrapper() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let mut config = config(dir.path());
        config.launch.spongefix = true;
        let state = state();
        let runner = MockRunner::default();
        let launcher = ServerLauncher::new(&config, &state, &runner, &MockPlatform(true));
        assert_eq!(launcher.launch_jar_name(), "SpongeBootstrap-0.7.1.jar");
    }

    #[test]
    fn test_ram_disk_supported() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let mut config = config(dir.path());
        config.launch.ram_disk = true;
        let state = state();
        let runner = MockRunner::default();
        let launcher = ServerLauncher::new(&config, &state, &runner, &MockPlatform(true));

        let commands: LaunchCommands = launcher.build_commands("survival");
        let pre = commands.pre_sync.expect("pre sync command");
        let post = commands.post_sync.expect("post sync command");
        assert_eq!(
            pre.argv(),
            &["rsync", "-aAXv", "--delete", "survival_backup/", "survival"]
        );
        assert_eq!(
            post.argv(),
            &["rsync", "-aAXv", "--delete", "survival/", "survival_backup"]
        );
        assert_eq!(pre.work_dir(), dir.path());
    }

    #[test]
    fn test_ram_disk_unsupported() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let mut config = config(dir.path());
        config.launch.ram_disk = true;
        let state = state();
        let runner = MockRunner::default();
        let launcher = ServerLauncher::new(&config, &state, &runner, &MockPlatform(false));

        capture_logs();
        let commands: LaunchCommands = launcher.build_commands("world");
        assert_eq!(commands.pre_sync, None);
        assert_eq!(commands.post_sync, None);
        let warnings: Vec<String> = captured_warnings();
        assert_eq!(warnings.len(), 1, "got {warnings:?}");
        assert!(warnings[0].contains("RAM disk is not supported"));
    }

    #[test]
    fn test_ram_disk_disabled_does_not_warn() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let config = config(dir.path());
        let state = state();
        let runner = MockRunner::default();
        let launcher = ServerLauncher::new(&config, &state, &runner, &MockPlatform(false));

        capture_logs();
        launcher.build_commands("world");
        assert!(captured_warnings().is_empty());
    }

    #[test]
    fn test_blank_level_name_falls_back_to_default() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let mut config = config(dir.path());
        config.launch.ram_disk = true;
        let state = state();
        let runner = MockRunner::default();
        let launcher = ServerLauncher::new(&config, &state, &runner, &MockPlatform(true));

        for properties in ["level-name=\n", "level-name=   \n", "level-name\n"] {
            std::fs::write(dir.path().join("server.properties"), properties)
                .expect("file should be writable");
            assert_eq!(launcher.level_name(), "world", "for {properties:?}");
        }

        let commands: LaunchCommands = launcher.build_commands(&launcher.level_name());
        let post = commands.post_sync.expect("post sync command");
        assert_eq!(
            post.argv(),
            &["rsync", "-aAXv", "--delete", "world/", "world_backup"]
        );
    }

    #[test]
    fn test_level_name() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let config = config(dir.path());
        let state = state();
        let runner = MockRunner::default();
        let launcher = ServerLauncher::new(&config, &state, &runner, &MockPlatform(true));
        assert_eq!(launcher.level_name(), "world", "no server.properties yet");

        std::fs::write(
            dir.path().join("server.properties"),
            "#Minecraft server properties\nlevel-name=skyblock\n",
        )
        .expect("file should be writable");
        assert_eq!(launcher.level_name(), "skyblock");
    }

    #[test]
    fn test_start_server_runs_all_steps_despite_failures() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let mut config = config(dir.path());
        config.launch.ram_disk = true;
        let state = state();
        let runner = MockRunner {
            failing: vec!["rsync", "java"],
            commands: RefCell::new(Vec::new()),
        };
        let launcher = ServerLauncher::new(&config, &state, &runner, &MockPlatform(true));

        launcher.start_server();

        let commands = runner.commands.borrow();
        let programs: Vec<&str> = commands.iter().map(|n| n.argv()[0].as_str()).collect();
        assert_eq!(programs, vec!["rsync", "java", "rsync"]);
        assert_eq!(commands[0].argv()[3], "world_backup/");
        assert_eq!(commands[2].argv()[3], "world/");
    }
}
