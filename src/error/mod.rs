//! Main error module.

/// Non recoverable errors that the _main_ may exit with.
pub enum FatalError {
    Config(crate::config::ConfigError),
    Logging(crate::logging::Error),
    State(crate::state::StateError),
    Install(crate::loader::InstallError),
}
impl std::fmt::Debug for FatalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(arg0) => f.debug_tuple("Config").field(arg0).finish(),
            Self::Logging(arg0) => f.debug_tuple("Logging").field(arg0).finish(),
            Self::State(arg0) => f.debug_tuple("State").field(arg0).finish(),
            Self::Install(arg0) => f.debug_tuple("Install").field(arg0).finish(),
        }
    }
}
impl std::fmt::Display for FatalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(_) => write!(f, "cannot load configuration"),
            Self::Logging(_) => write!(f, "cannot set up logging"),
            Self::State(_) => write!(f, "cannot access install state"),
            Self::Install(_) => write!(f, "cannot install loader"),
        }
    }
}
impl std::error::Error for FatalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::State(err) => Some(err),
            Self::Install(err) => Some(err),
        }
    }
}
impl From<crate::config::ConfigError> for FatalError {
    fn from(err: crate::config::ConfigError) -> Self {
        return Self::Config(err);
    }
}
impl From<crate::logging::Error> for FatalError {
    fn from(err: crate::logging::Error) -> Self {
        return Self::Logging(err);
    }
}
impl From<crate::state::StateError> for FatalError {
    fn from(err: crate::state::StateError) -> Self {
        return Self::State(err);
    }
}
impl From<crate::loader::InstallError> for FatalError {
    fn from(err: crate::loader::InstallError) -> Self {
        return Self::Install(err);
    }
}
