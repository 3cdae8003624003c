//! Parsing of the small string formats found in the configuration and in the
//! server's own files: durations, heap sizes, version templates and Java
//! properties.

/// A duration string that is not one of `<n>h`, `<n>min`, `<n>s` or `<n>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationError {
    pub input: String,
}
impl std::error::Error for DurationError {}
impl std::fmt::Display for DurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid duration '{}'", self.input)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RamSizeError {
    Empty,
    Amount(String),
}
impl std::error::Error for RamSizeError {}
impl std::fmt::Display for RamSizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RamSizeError::Empty => write!(f, "empty heap size"),
            RamSizeError::Amount(input) => write!(f, "invalid heap size '{}'", input),
        }
    }
}

/// Failures of the string parsers, which callers log and replace with a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Duration(DurationError),
    RamSize(RamSizeError),
}
impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Duration(err) => Some(err),
            ParseError::RamSize(err) => Some(err),
        }
    }
}
impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Duration(_) => write!(f, "cannot parse duration"),
            ParseError::RamSize(_) => write!(f, "cannot parse heap size"),
        }
    }
}
impl From<DurationError> for ParseError {
    fn from(err: DurationError) -> Self {
        return Self::Duration(err);
    }
}
impl From<RamSizeError> for ParseError {
    fn from(err: RamSizeError) -> Self {
        return Self::RamSize(err);
    }
}

/// Parse a duration given with an optional unit suffix into seconds.
///
/// ```rust
/// use serverstarter::parsing::parse_duration_seconds;
/// assert_eq!(parse_duration_seconds("2h"), Ok(7200));
/// assert_eq!(parse_duration_seconds("30min"), Ok(1800));
/// assert_eq!(parse_duration_seconds("45s"), Ok(45));
/// assert_eq!(parse_duration_seconds("90"), Ok(90));
/// assert!(parse_duration_seconds("abc").is_err());
/// ```
pub fn parse_duration_seconds(input: &str) -> Result<i64, DurationError> {
    let (amount, multiplier): (&str, i64) = if let Some(n) = input.strip_suffix('h') {
        (n, 60 * 60)
    } else if let Some(n) = input.strip_suffix("min") {
        (n, 60)
    } else if let Some(n) = input.strip_suffix('s') {
        (n, 1)
    } else {
        (input, 1)
    };

    let amount: i64 = match amount.parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            return Err(DurationError {
                input: input.into(),
            })
        }
    };

    return match amount.checked_mul(multiplier) {
        Some(n) => Ok(n),
        None => Err(DurationError {
            input: input.into(),
        }),
    };
}

/// Amount followed by an optional alphabetic unit.
static RAM_SIZE_PATTERN: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(|| {
    return regex::Regex::new(r"^(.*?)([A-Za-z]*)$").expect("pattern is a valid regex");
});

/// A JVM heap size such as `4G` or `512M`: an amount and the unit suffix it
/// was written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RamSize {
    pub amount: u64,
    pub unit: String,
}

impl std::str::FromStr for RamSize {
    type Err = RamSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed: &str = s.trim();
        if trimmed.is_empty() {
            return Err(RamSizeError::Empty);
        }
        let captures: regex::Captures = match RAM_SIZE_PATTERN.captures(trimmed) {
            Some(n) => n,
            None => unreachable!("pattern matches any string"),
        };
        let amount: &str = &captures[1];
        let unit: &str = &captures[2];
        let amount: u64 = match amount.parse::<u64>() {
            Ok(n) => n,
            Err(_) => return Err(RamSizeError::Amount(trimmed.into())),
        };
        return Ok(Self {
            amount,
            unit: unit.into(),
        });
    }
}

impl std::fmt::Display for RamSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.amount, self.unit)
    }
}

impl RamSize {
    /// Half of this size, rounded down but never below 1, in the same unit.
    ///
    /// ```rust
    /// use serverstarter::parsing::RamSize;
    /// let half = |s: &str| s.parse::<RamSize>().unwrap().halved().to_string();
    /// assert_eq!(half("4G"), "2G");
    /// assert_eq!(half("3G"), "1G");
    /// assert_eq!(half("1G"), "1G");
    /// assert_eq!(half("5000M"), "2500M");
    /// ```
    pub fn halved(&self) -> Self {
        return Self {
            amount: std::cmp::max(1, self.amount / 2),
            unit: self.unit.clone(),
        };
    }
}

/// Substitute every occurrence of the loader and Minecraft version
/// placeholders in a template.
///
/// ```rust
/// assert_eq!(
///     serverstarter::parsing::fill_version_placeholders(
///         "forge-{{@mcversion@}}-{{@loaderversion@}}.jar",
///         "14.23",
///         "1.12.2",
///     ),
///     "forge-1.12.2-14.23.jar"
/// );
/// ```
pub fn fill_version_placeholders(template: &str, loader_version: &str, mc_version: &str) -> String {
    return template
        .replace(crate::constants::PLACEHOLDER_LOADER_VERSION, loader_version)
        .replace(crate::constants::PLACEHOLDER_MC_VERSION, mc_version);
}

/// Split a command line fragment into words, dropping empty ones.
pub fn split_words(input: &str) -> Vec<String> {
    return input.split_whitespace().map(String::from).collect();
}

/// Get the value of a key from a buffer in Java properties format. Comments
/// (`#`, `!`) are skipped and both `=` and `:` are accepted as separators.
/// Line continuations and escapes are not supported.
pub fn property_value<'buf>(buffer: &'buf str, key: &str) -> Option<&'buf str> {
    for line in buffer.lines() {
        let trimmed: &str = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }
        let separator: Option<usize> = trimmed.find(|c: char| c == '=' || c == ':');
        let (name, value): (&str, &str) = match separator {
            Some(i) => (&trimmed[..i], &trimmed[i + 1..]),
            None => (trimmed, ""),
        };
        if name.trim_end() == key {
            return Some(value.trim());
        }
    }
    return None;
}
