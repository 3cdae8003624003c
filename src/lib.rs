//! Installs a mod loader for a game server and keeps the server running,
//! restarting it when it stops unless it keeps crashing.
//!
//! The flow is split into a few parts that each take their collaborators as
//! trait objects:
//!
//! - [`loader::LoaderInstaller`] downloads and runs the loader installer and
//!   records what got installed through a [`state::StateStore`].
//! - [`launch::ServerLauncher`] assembles the java command line and runs it
//!   with a [`proc::Run`].
//! - [`supervise::Supervisor`] starts the server again and again, counting
//!   starts within the crash timer.

pub mod args;
pub mod config;
pub mod constants;
pub mod eula;
pub mod error;
pub mod http;
pub mod launch;
pub mod loader;
pub mod logging;
pub mod parsing;
pub mod platform;
pub mod proc;
pub mod state;
pub mod supervise;
pub mod text;
pub mod util;
