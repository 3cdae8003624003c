//! HTTP stuff.

/// Failures related to HTTP operations.
pub enum HttpError {
    Request(reqwest::Error),
    IO(std::io::Error),
}
impl std::fmt::Debug for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Request(arg0) => f.debug_tuple("Request").field(arg0).finish(),
            Self::IO(arg0) => f.debug_tuple("IO").field(arg0).finish(),
        }
    }
}
impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Request(_) => write!(f, "HTTP request failed"),
            Self::IO(_) => write!(f, "cannot write download to disk"),
        }
    }
}
impl std::error::Error for HttpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(err) => Some(err),
            Self::IO(err) => Some(err),
        }
    }
}
impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        return Self::Request(err);
    }
}
impl From<std::io::Error> for HttpError {
    fn from(err: std::io::Error) -> Self {
        return Self::IO(err);
    }
}

pub trait Download {
    /// Fetch `url` into the file at `target_path`, replacing it if it exists.
    /// Returns the number of bytes written.
    fn download_to_file(&self, url: &str, target_path: &std::path::Path)
        -> Result<u64, HttpError>;
}

/// Downloads over plain blocking HTTP(S) requests, one at a time.
pub struct HttpDownloader {
    client: reqwest::blocking::Client,
}

impl HttpDownloader {
    pub fn new() -> Result<Self, HttpError> {
        let client: reqwest::blocking::Client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            // Installers are tens of megabytes; only bound the connect phase.
            .timeout(None)
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()?;
        return Ok(Self { client });
    }
}

impl Download for HttpDownloader {
    fn download_to_file(
        &self,
        url: &str,
        target_path: &std::path::Path,
    ) -> Result<u64, HttpError> {
        let mut response: reqwest::blocking::Response =
            self.client.get(url).send()?.error_for_status()?;
        let written: u64 = stream_to_disk(&mut response, target_path)?;
        log::debug!(
            "Downloaded {} bytes from {} to {}",
            written,
            url,
            target_path.to_string_lossy()
        );
        return Ok(written);
    }
}

/// Stream an HTTP response payload to disk.
fn stream_to_disk<R: std::io::Read>(
    stream: &mut R,
    target_path: &std::path::Path,
) -> Result<u64, HttpError> {
    let file_out: std::fs::File = std::fs::File::create(target_path)?;
    let mut writer: std::io::BufWriter<std::fs::File> = std::io::BufWriter::new(file_out);
    let total_bytes_written: u64 = std::io::copy(stream, &mut writer)?;
    std::io::Write::flush(&mut writer)?;
    return Ok(total_bytes_written);
}
