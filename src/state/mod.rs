//! Persisted record of what has been installed.

#[derive(Debug)]
pub enum StateError {
    /// Contains the path of the lock file.
    IO((std::path::PathBuf, std::io::Error)),
    Json((std::path::PathBuf, serde_json::Error)),
}
impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StateError::IO((_, err)) => Some(err),
            StateError::Json((_, err)) => Some(err),
        }
    }
}
impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::IO((path, _)) => {
                write!(f, "cannot access lock file {}", path.to_string_lossy())
            }
            StateError::Json((path, _)) => {
                write!(f, "lock file {} is not valid", path.to_string_lossy())
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstallState {
    pub loader_installed: bool,
    pub loader_version: String,
    pub mc_version: String,

    /// File name, _not the path_, of the downloaded sponge bootstrapper jar.
    pub sponge_bootstrapper: String,
}

impl InstallState {
    /// Whether the loader has to be (re)installed to get the wanted versions.
    ///
    /// ```rust
    /// let mut state = serverstarter::state::InstallState::default();
    /// assert!(state.should_install("14.23.5.2860", "1.12.2"));
    /// state.loader_installed = true;
    /// state.loader_version = "14.23.5.2860".into();
    /// state.mc_version = "1.12.2".into();
    /// assert!(!state.should_install("14.23.5.2860", "1.12.2"));
    /// assert!(state.should_install("14.23.5.2859", "1.12.2"));
    /// ```
    pub fn should_install(&self, loader_version: &str, mc_version: &str) -> bool {
        return !self.loader_installed
            || self.loader_version != loader_version
            || self.mc_version != mc_version;
    }
}

pub trait StateStore {
    fn load(&self) -> Result<InstallState, StateError>;
    fn save(&self, state: &InstallState) -> Result<(), StateError>;
}

/// Keeps the install state as JSON in a lock file.
pub struct JsonStateStore {
    path: std::path::PathBuf,
}

impl JsonStateStore {
    pub fn new(path: std::path::PathBuf) -> Self {
        return Self { path };
    }
}

impl StateStore for JsonStateStore {
    /// A lock file that does not exist yet means nothing has been installed.
    fn load(&self) -> Result<InstallState, StateError> {
        let content: String = match std::fs::read_to_string(&self.path) {
            Ok(n) => n,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!(
                    "No lock file at {} -- Nothing installed yet",
                    self.path.to_string_lossy()
                );
                return Ok(InstallState::default());
            }
            Err(err) => return Err(StateError::IO((self.path.clone(), err))),
        };
        return match serde_json::from_str(&content) {
            Ok(n) => Ok(n),
            Err(err) => Err(StateError::Json((self.path.clone(), err))),
        };
    }

    fn save(&self, state: &InstallState) -> Result<(), StateError> {
        let content: String = match serde_json::to_string_pretty(state) {
            Ok(n) => n,
            Err(err) => return Err(StateError::Json((self.path.clone(), err))),
        };
        if let Err(err) = std::fs::write(&self.path, content) {
            return Err(StateError::IO((self.path.clone(), err)));
        }
        log::debug!("Saved install state to {}", self.path.to_string_lossy());
        return Ok(());
    }
}
