//! Acceptance of the game's end user license, which the server refuses to
//! start without.

#[derive(Debug)]
pub enum EulaError {
    /// Contains the path of the EULA file.
    IO((std::path::PathBuf, std::io::Error)),
    Prompt(std::io::Error),
}
impl std::error::Error for EulaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EulaError::IO((_, err)) => Some(err),
            EulaError::Prompt(err) => Some(err),
        }
    }
}
impl std::fmt::Display for EulaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EulaError::IO((path, _)) => {
                write!(f, "cannot access EULA file {}", path.to_string_lossy())
            }
            EulaError::Prompt(_) => write!(f, "cannot read answer to EULA prompt"),
        }
    }
}

pub trait AcceptEula {
    fn check_eula(&self, base_path: &std::path::Path) -> Result<(), EulaError>;
}

/// Asks the operator to accept the EULA, reading the answer from `input`.
pub struct PromptingEula<R: std::io::BufRead> {
    input: std::cell::RefCell<R>,
}

impl<R: std::io::BufRead> PromptingEula<R> {
    pub fn new(input: R) -> Self {
        return Self {
            input: std::cell::RefCell::new(input),
        };
    }
}

impl PromptingEula<std::io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        return Self::new(std::io::stdin().lock());
    }
}

impl<R: std::io::BufRead> AcceptEula for PromptingEula<R> {
    fn check_eula(&self, base_path: &std::path::Path) -> Result<(), EulaError> {
        let path: std::path::PathBuf = base_path.join(crate::constants::EULA_FILE_NAME);

        let mut lines: Vec<String> = match std::fs::read_to_string(&path) {
            Ok(content) => content.lines().map(String::from).collect(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => stock_eula_lines(),
            Err(err) => return Err(EulaError::IO((path, err))),
        };

        if lines.iter().any(|n| n.trim() == "eula=true") {
            log::debug!("EULA already accepted in {}", path.to_string_lossy());
            return Ok(());
        }

        log::info!("You have not accepted the EULA yet.");
        log::info!("By typing TRUE you are indicating your agreement to the EULA of Mojang.");
        log::info!(
            "Read it at {} before accepting it.",
            crate::constants::EULA_URL
        );

        let mut answer: String = String::new();
        if let Err(err) = std::io::BufRead::read_line(&mut *self.input.borrow_mut(), &mut answer) {
            return Err(EulaError::Prompt(err));
        }

        if !answer.trim().eq_ignore_ascii_case("true") {
            log::warn!("You did not accept the EULA, the server can not start.");
            return Ok(());
        }

        match lines.iter_mut().find(|n| n.trim_start().starts_with("eula=")) {
            Some(line) => *line = "eula=true".into(),
            None => lines.push("eula=true".into()),
        }
        let mut content: String = lines.join("\n");
        content.push('\n');
        if let Err(err) = std::fs::write(&path, content) {
            return Err(EulaError::IO((path, err)));
        }

        log::info!("EULA accepted in {}", path.to_string_lossy());
        return Ok(());
    }
}

/// What the server itself writes on first start.
fn stock_eula_lines() -> Vec<String> {
    return vec![
        format!(
            "#By changing the setting below to TRUE you are indicating your agreement to our EULA ({}).",
            crate::constants::EULA_URL
        ),
        format!("#{}", chrono::Local::now().format("%a %b %d %H:%M:%S %Z %Y")),
        "eula=false".into(),
    ];
}
