//! Abstractions related to handling processes on the system.

#[derive(Debug)]
pub enum ProcessError {
    EmptyCommand,
    /// Contains the program that could not be started.
    Spawn((String, std::io::Error)),
    /// Wait reported `ErrorKind::Interrupted`. The standard library retries
    /// `EINTR` itself on unix, so there a signal shows up as the child's exit
    /// status instead and this is not returned.
    Interrupted((String, std::io::Error)),
    Wait((String, std::io::Error)),
}
impl std::error::Error for ProcessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProcessError::EmptyCommand => None,
            ProcessError::Spawn((_, err)) => Some(err),
            ProcessError::Interrupted((_, err)) => Some(err),
            ProcessError::Wait((_, err)) => Some(err),
        }
    }
}
impl std::fmt::Display for ProcessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessError::EmptyCommand => write!(f, "no program given to run"),
            ProcessError::Spawn((program, _)) => write!(f, "cannot start '{}'", program),
            ProcessError::Interrupted((program, _)) => {
                write!(f, "interrupted while waiting for '{}'", program)
            }
            ProcessError::Wait((program, _)) => write!(f, "cannot wait for '{}'", program),
        }
    }
}

/// A program with its arguments and the directory to run it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    argv: Vec<String>,
    work_dir: std::path::PathBuf,
}

impl LaunchCommand {
    pub fn new(argv: Vec<String>, work_dir: std::path::PathBuf) -> Self {
        return Self { argv, work_dir };
    }

    pub fn argv(&self) -> &[String] {
        return &self.argv;
    }

    pub fn work_dir(&self) -> &std::path::Path {
        return &self.work_dir;
    }
}

impl std::fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.argv.join(" "))
    }
}

pub trait Run {
    /// Run a command to completion. Returns the exit code, which is `None` if
    /// the process was killed by a signal.
    fn run(&self, command: LaunchCommand) -> Result<Option<i32>, ProcessError>;
}

/// Runs processes in the foreground, sharing this process's terminal.
pub struct InheritedIo;

impl Run for InheritedIo {
    fn run(&self, command: LaunchCommand) -> Result<Option<i32>, ProcessError> {
        let (program, args): (&String, &[String]) = match command.argv.split_first() {
            Some(n) => n,
            None => return Err(ProcessError::EmptyCommand),
        };

        log::debug!(
            "Running '{}' in {}",
            command,
            command.work_dir.to_string_lossy()
        );

        let child: std::process::Child = match std::process::Command::new(program)
            .args(args)
            .current_dir(&command.work_dir)
            .stdin(std::process::Stdio::inherit())
            .stdout(std::process::Stdio::inherit())
            .stderr(std::process::Stdio::inherit())
            .spawn()
        {
            Ok(n) => n,
            Err(err) => return Err(ProcessError::Spawn((program.clone(), err))),
        };

        let mut child: StreamGuard = StreamGuard(child);
        let status: std::process::ExitStatus = match child.0.wait() {
            Ok(n) => n,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {
                return Err(ProcessError::Interrupted((program.clone(), err)));
            }
            Err(err) => return Err(ProcessError::Wait((program.clone(), err))),
        };

        log::debug!("'{}' exited: {}", program, status);
        return Ok(status.code());
    }
}

/// Releases whatever standard stream handles a child still holds once the
/// guard goes out of scope, on every path out of [`InheritedIo::run`].
struct StreamGuard(std::process::Child);

impl Drop for StreamGuard {
    fn drop(&mut self) {
        drop(self.0.stdin.take());
        drop(self.0.stdout.take());
        drop(self.0.stderr.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(argv: &[&str]) -> LaunchCommand {
        return LaunchCommand::new(
            argv.iter().map(|n| n.to_string()).collect(),
            std::path::PathBuf::from("."),
        );
    }

    #[test]
    fn test_empty_command() {
        match InheritedIo.run(command(&[])) {
            Err(ProcessError::EmptyCommand) => {}
            _ => panic!("expected ProcessError::EmptyCommand"),
        }
    }

    #[test]
    fn test_missing_executable() {
        match InheritedIo.run(command(&["/nonexistent/definitely-not-a-program"])) {
            Err(ProcessError::Spawn((program, _))) => {
                assert_eq!(program, "/nonexistent/definitely-not-a-program")
            }
            _ => panic!("expected ProcessError::Spawn"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_is_returned() {
        match InheritedIo.run(command(&["sh", "-c", "exit 3"])) {
            Ok(code) => assert_eq!(code, Some(3)),
            Err(err) => panic!("expected exit code, got {err}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_in_work_dir() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let cmd = LaunchCommand::new(
            vec!["sh".into(), "-c".into(), "touch marker".into()],
            dir.path().to_path_buf(),
        );
        match InheritedIo.run(cmd) {
            Ok(code) => assert_eq!(code, Some(0)),
            Err(err) => panic!("expected success, got {err}"),
        }
        assert!(dir.path().join("marker").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_signalled_child_is_an_exit_not_an_error() {
        match InheritedIo.run(command(&["sh", "-c", "kill -TERM $$"])) {
            Ok(code) => assert_eq!(code, None),
            Err(err) => panic!("expected the signal as exit status, got {err}"),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            command(&["java", "-jar", "server.jar", "nogui"]).to_string(),
            "java -jar server.jar nogui"
        );
    }
}
