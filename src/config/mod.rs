//! Configuration for the program.

#[derive(Debug)]
pub enum ConfigError {
    /// Contains the path of the file that could not be read.
    Read((std::path::PathBuf, std::io::Error)),
    Parse(toml::de::Error),
}
impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read((_, err)) => Some(err),
            ConfigError::Parse(err) => Some(err),
        }
    }
}
impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read((path, _)) => {
                write!(f, "cannot read config file {}", path.to_string_lossy())
            }
            ConfigError::Parse(_) => write!(f, "config file is not valid"),
        }
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Configuration for the program.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub install: InstallConfig,
    #[serde(default)]
    pub launch: LaunchConfig,
}

/// What to install and where from.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct InstallConfig {
    pub mc_version: String,
    pub loader_version: String,

    /// Download URL of the loader installer. May contain the placeholders
    /// `{{@loaderversion@}}` and `{{@mcversion@}}`.
    pub installer_url: String,

    /// Arguments passed to the installer after `-jar <installer>`.
    #[serde(default = "default_installer_arguments")]
    pub installer_arguments: Vec<String>,

    #[serde(default)]
    pub sponge_bootstrapper: String,

    /// Directory the server gets installed into and run from. Empty means the
    /// current working directory.
    #[serde(default)]
    pub base_install_path: String,
}

/// How to run the server.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Name of the jar to launch. Same placeholders as the installer URL.
    pub start_file: String,
    pub java_args: Vec<String>,

    /// Whitespace separated words put before the java executable, e.g. `nice -n 5`.
    pub pre_java_args: String,
    pub max_ram: String,
    pub min_ram: String,
    pub ram_disk: bool,
    pub spongefix: bool,
    pub forced_java_path: String,

    /// Window in which server starts are counted, e.g. `60min`, `2h`, `90s`.
    pub crash_timer: String,
    pub auto_restart: bool,
    pub crash_limit: u32,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        return Self {
            start_file: "forge-{{@mcversion@}}-{{@loaderversion@}}.jar".into(),
            java_args: Vec::new(),
            pre_java_args: String::new(),
            max_ram: "4G".into(),
            min_ram: String::new(),
            ram_disk: false,
            spongefix: false,
            forced_java_path: String::new(),
            crash_timer: "60min".into(),
            auto_restart: true,
            crash_limit: 10,
        };
    }
}

fn default_installer_arguments() -> Vec<String> {
    return vec!["--installServer".into()];
}

impl Config {
    /// Get configuration from filesystem.
    pub fn get_from_fs(config_file_path: &std::path::Path) -> Result<Self, ConfigError> {
        let content: String = match std::fs::read_to_string(config_file_path) {
            Ok(n) => n,
            Err(err) => return Err(ConfigError::Read((config_file_path.into(), err))),
        };
        log::debug!(
            "Read {} chars from {}",
            content.len(),
            config_file_path.to_string_lossy()
        );
        let config: Self = toml::from_str(&content)?;
        return Ok(config);
    }

    /// Directory where the installer and the server are run.
    pub fn base_path(&self) -> &std::path::Path {
        return std::path::Path::new(&self.install.base_install_path);
    }
}

impl InstallConfig {
    /// Installer URL for the configured versions.
    pub fn installer_url(&self) -> String {
        return crate::parsing::fill_version_placeholders(
            &self.installer_url,
            &self.loader_version,
            &self.mc_version,
        );
    }
}

impl LaunchConfig {
    /// Java executable to run the installer and the server with: the forced
    /// path if one is configured, otherwise whatever `java` resolves to.
    ///
    /// ```rust
    /// let mut launch = serverstarter::config::LaunchConfig::default();
    /// assert_eq!(launch.java_executable(), "java");
    /// launch.forced_java_path = r#" "/opt/jdk 8/bin/java" "#.into();
    /// assert_eq!(launch.java_executable(), "/opt/jdk 8/bin/java");
    /// ```
    pub fn java_executable(&self) -> String {
        let forced: &str = self.forced_java_path.trim();
        if forced.is_empty() {
            return crate::constants::DEFAULT_JAVA_EXECUTABLE.into();
        }
        // Paths with spaces tend to get copied in with their quotes.
        let unquoted: &str = forced
            .strip_prefix('"')
            .and_then(|n| n.strip_suffix('"'))
            .unwrap_or(forced);
        return unquoted.into();
    }
}

/// Directory to run a process in given a possibly empty base path.
pub fn work_dir(base_path: &std::path::Path) -> std::path::PathBuf {
    if base_path.as_os_str().is_empty() {
        return std::path::PathBuf::from(".");
    }
    return base_path.to_path_buf();
}
