//! Restarting the server after it stops, unless it keeps crashing.

/// A sleep that ended early, e.g. because of a signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interrupted {
    pub remaining: std::time::Duration,
}
impl std::error::Error for Interrupted {}
impl std::fmt::Display for Interrupted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "sleep interrupted with {} seconds remaining",
            self.remaining.as_secs()
        )
    }
}

pub trait Clock {
    fn now(&self) -> chrono::DateTime<chrono::Local>;
    fn sleep(&self, duration: std::time::Duration) -> Result<(), Interrupted>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> chrono::DateTime<chrono::Local> {
        return chrono::Local::now();
    }

    #[cfg(unix)]
    fn sleep(&self, duration: std::time::Duration) -> Result<(), Interrupted> {
        let seconds: u32 = u32::try_from(duration.as_secs()).unwrap_or(u32::MAX);
        let remaining: u32 = nix::unistd::sleep(seconds);
        if remaining > 0 {
            return Err(Interrupted {
                remaining: std::time::Duration::from_secs(remaining.into()),
            });
        }
        return Ok(());
    }

    #[cfg(not(unix))]
    fn sleep(&self, duration: std::time::Duration) -> Result<(), Interrupted> {
        std::thread::sleep(duration);
        return Ok(());
    }
}

/// Start times of the server within the crash timer.
#[derive(Debug, Default)]
pub struct CrashWindow {
    starts: Vec<chrono::DateTime<chrono::Local>>,
}

impl CrashWindow {
    pub fn new() -> Self {
        return Self::default();
    }

    /// Forget starts more than `crash_timer_secs` whole seconds before `now`.
    pub fn prune(&mut self, now: chrono::DateTime<chrono::Local>, crash_timer_secs: i64) {
        self.starts
            .retain(|start| now.signed_duration_since(*start).num_seconds() <= crash_timer_secs);
    }

    pub fn record(&mut self, start: chrono::DateTime<chrono::Local>) {
        self.starts.push(start);
    }

    pub fn len(&self) -> usize {
        return self.starts.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.starts.is_empty();
    }
}

/// Restart only while the server has not started more than `crash_limit`
/// times within the crash timer.
///
/// ```rust
/// use serverstarter::supervise::should_restart;
/// assert!(should_restart(true, 2, 2));
/// assert!(!should_restart(true, 3, 2));
/// assert!(!should_restart(false, 0, 2));
/// ```
pub fn should_restart(auto_restart: bool, retained: usize, crash_limit: u32) -> bool {
    return auto_restart && (retained as u64) <= u64::from(crash_limit);
}

/// Crash timer in seconds, or [`crate::constants::CRASH_TIMER_DISABLED`] if
/// it cannot be parsed.
pub fn crash_timer_seconds(input: &str) -> i64 {
    return match crate::parsing::parse_duration_seconds(input) {
        Ok(n) => n,
        Err(err) => {
            let err: crate::parsing::ParseError = err.into();
            log::error!(
                "Invalid crash time format given: {}",
                crate::util::aggregate_error_tree(&err, 2).trim_end()
            );
            crate::constants::CRASH_TIMER_DISABLED
        }
    };
}

pub struct Supervisor<'a> {
    launch: &'a crate::config::LaunchConfig,
    launcher: &'a dyn crate::launch::Launch,
    clock: &'a dyn Clock,
}

impl<'a> Supervisor<'a> {
    pub fn new(
        launch: &'a crate::config::LaunchConfig,
        launcher: &'a dyn crate::launch::Launch,
        clock: &'a dyn Clock,
    ) -> Self {
        return Self {
            launch,
            launcher,
            clock,
        };
    }

    /// Run the server until it stops and should not be restarted.
    pub fn handle_server(&self) {
        let crash_timer: i64 = crash_timer_seconds(&self.launch.crash_timer);
        let mut window: CrashWindow = CrashWindow::new();

        loop {
            let now: chrono::DateTime<chrono::Local> = self.clock.now();
            window.prune(now, crash_timer);

            self.launcher.start_server();
            window.record(now);

            log::info!(
                "Server has been stopped, it has started {} times in {}",
                window.len(),
                self.launch.crash_timer
            );

            if !should_restart(self.launch.auto_restart, window.len(), self.launch.crash_limit) {
                if self.launch.auto_restart {
                    log::warn!(
                        "Server crashed more than {} times in {} -- Not restarting",
                        self.launch.crash_limit,
                        self.launch.crash_timer
                    );
                }
                break;
            }

            log::info!(
                "Restarting server in {} seconds, press ctrl+c to stop",
                crate::constants::RESTART_DELAY.as_secs()
            );
            if let Err(err) = self.clock.sleep(crate::constants::RESTART_DELAY) {
                log::warn!("{err}");
            }
        }
    }
}
