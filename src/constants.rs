use std::time::Duration;

/// Pause between the server process exiting and it being started again.
pub const RESTART_DELAY: Duration = Duration::from_secs(10);

/// Crash timer value used when the configured one cannot be parsed. Compared
/// against non-negative ages, so every recorded start gets pruned.
pub const CRASH_TIMER_DISABLED: i64 = -1;

pub const PLACEHOLDER_LOADER_VERSION: &str = "{{@loaderversion@}}";

pub const PLACEHOLDER_MC_VERSION: &str = "{{@mcversion@}}";

pub const INSTALLER_FILE_NAME: &str = "installer.jar";

pub const DEFAULT_JAVA_EXECUTABLE: &str = "java";

pub const SERVER_PROPERTIES_FILE_NAME: &str = "server.properties";

pub const DEFAULT_LEVEL_NAME: &str = "world";

pub const EULA_FILE_NAME: &str = "eula.txt";

pub const EULA_URL: &str = "https://account.mojang.com/documents/minecraft_eula";

pub const DEFAULT_CONFIG_PATH: &str = "server-setup-config.toml";

pub const DEFAULT_LOCK_FILE_PATH: &str = "serverstarter.lock";

pub const LOG_FILE_PATH: &str = "serverstarter.log";
