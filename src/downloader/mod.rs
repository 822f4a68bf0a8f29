mod fetcher;
mod filename;

use std::any::Any;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use image::ImageFormat;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::config::FetchConfig;
use crate::console::{group_thousands, Console, Status};

pub use fetcher::UReqFetcher;
pub use filename::{resolve_filename, FilenameSource, ResolvedFilename};

#[cfg(test)]
pub use fetcher::MockFetcher;

pub enum Response {
    Ok {
        content_type: Option<String>,
        body: Box<dyn Read + Send>,
    },
    Status {
        code: u16,
        reason: String,
    },
    Timeout,
    ConnectionFailed(String),
    RequestFailed(String),
}

impl Response {
    pub fn ok(body: impl Into<Vec<u8>>, content_type: Option<&str>) -> Self {
        Self::stream(io::Cursor::new(body.into()), content_type.map(str::to_string))
    }

    pub fn stream(body: impl Read + Send + 'static, content_type: Option<String>) -> Self {
        Self::Ok {
            content_type,
            body: Box::new(body),
        }
    }

    pub fn status(code: u16, reason: impl Into<String>) -> Self {
        Self::Status {
            code,
            reason: reason.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::status(404, "Not Found")
    }

    pub fn timeout() -> Self {
        Self::Timeout
    }

    pub fn connection_failed(detail: impl Into<String>) -> Self {
        Self::ConnectionFailed(detail.into())
    }

    pub fn request_failed(detail: impl Into<String>) -> Self {
        Self::RequestFailed(detail.into())
    }

    pub fn into_body(self) -> Result<(Option<String>, Box<dyn Read + Send>), DownloadError> {
        match self {
            Response::Ok { content_type, body } => Ok((content_type, body)),
            Response::Status { code, reason } => Err(DownloadError::Http {
                status: code,
                reason,
            }),
            Response::Timeout => Err(DownloadError::Timeout),
            Response::ConnectionFailed(detail) => Err(DownloadError::Connection(detail)),
            Response::RequestFailed(detail) => Err(DownloadError::Request(detail)),
        }
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok { content_type, .. } => f
                .debug_struct("Ok")
                .field("content_type", content_type)
                .finish_non_exhaustive(),
            Response::Status { code, reason } => f
                .debug_struct("Status")
                .field("code", code)
                .field("reason", reason)
                .finish(),
            Response::Timeout => f.write_str("Timeout"),
            Response::ConnectionFailed(detail) => {
                f.debug_tuple("ConnectionFailed").field(detail).finish()
            }
            Response::RequestFailed(detail) => {
                f.debug_tuple("RequestFailed").field(detail).finish()
            }
        }
    }
}

pub trait FileDownloader {
    fn fetch(&self, url: &str) -> Response;
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("connection timed out")]
    Timeout,

    #[error("could not connect to the server: {0}")]
    Connection(String),

    #[error("HTTP {status} - {reason}")]
    Http { status: u16, reason: String },

    #[error("request failed - {0}")]
    Request(String),

    #[error("could not save file - {0}")]
    Filesystem(#[from] io::Error),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpFailure {
    NotFound,
    Forbidden,
    Server,
    Other,
}

pub fn classify_http_status(code: u16) -> HttpFailure {
    match code {
        404 => HttpFailure::NotFound,
        403 => HttpFailure::Forbidden,
        500..=u16::MAX => HttpFailure::Server,
        _ => HttpFailure::Other,
    }
}

impl DownloadError {
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            DownloadError::Timeout => {
                Some("Please check your internet connection or try again later.")
            }
            DownloadError::Connection(_) => {
                Some("Please check the URL and your internet connection.")
            }
            DownloadError::Http { status, .. } => match classify_http_status(*status) {
                HttpFailure::NotFound => Some("The image was not found at the provided URL."),
                HttpFailure::Forbidden => Some("Access to the image is forbidden."),
                HttpFailure::Server => Some("Server error. Please try again later."),
                HttpFailure::Other => None,
            },
            DownloadError::Filesystem(_) => Some("Please check file permissions and disk space."),
            DownloadError::Request(_) | DownloadError::Unexpected(_) => None,
        }
    }

    fn from_body_read(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => DownloadError::Timeout,
            _ => DownloadError::Request(err.to_string()),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Download {
    pub source: String,
    pub file: PathBuf,
    pub size: u64,
    pub content_type: Option<String>,
}

pub struct Downloader<T: FileDownloader> {
    fetcher: T,
    path: PathBuf,
    chunk_size: usize,
}

impl<T> Downloader<T>
where
    T: FileDownloader,
{
    pub fn with_fetcher(config: &FetchConfig, fetcher: T) -> io::Result<Self> {
        let path = prepare_directory(&config.directory)?;

        Ok(Downloader {
            fetcher,
            path,
            chunk_size: config.chunk_size.max(1),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.path
    }

    pub fn fetcher(&self) -> &T {
        &self.fetcher
    }

    pub fn download(&self, url: &str, console: &mut dyn Console) -> Result<Download, DownloadError> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.try_download(url, console))) {
            Ok(result) => result,
            Err(payload) => {
                // The default panic hook has already written its report to stderr.
                let message = panic_message(payload.as_ref());
                error!(url, %message, "download attempt panicked");
                Err(DownloadError::Unexpected(message))
            }
        }
    }

    fn try_download(&self, url: &str, console: &mut dyn Console) -> Result<Download, DownloadError> {
        console.say(Status::Info, &format!("Connecting to: {url}"));

        let (content_type, mut body) = self.fetcher.fetch(url).into_body()?;

        check_content_type(content_type.as_deref(), console);

        let filename = resolve_filename(url);

        match filename.source {
            FilenameSource::Url => console.say(
                Status::Info,
                &format!("Using filename from URL: {}", filename.name),
            ),
            FilenameSource::Generated => console.say(
                Status::Info,
                &format!("Generated filename: {}", filename.name),
            ),
        }

        let file_path = self.path.join(&filename.name);

        console.say(
            Status::Info,
            &format!("Saving image to: {}", file_path.display()),
        );

        let mut file = File::create(&file_path)?;
        let written = self.write_body(&mut body, &mut file)?;

        let size = fs::metadata(&file_path)?.len();

        debug!(url, file = %file_path.display(), written, size, "download finished");

        console.say(
            Status::Success,
            &format!(
                "Successfully downloaded {} ({} bytes)",
                filename.name,
                group_thousands(size)
            ),
        );

        Ok(Download {
            source: String::from(url),
            file: file_path,
            size,
            content_type,
        })
    }

    fn write_body(&self, body: &mut dyn Read, file: &mut File) -> Result<u64, DownloadError> {
        let mut buffer = vec![0u8; self.chunk_size];
        let mut written = 0u64;

        loop {
            let read = match body.read(&mut buffer) {
                Ok(0) => break,
                Ok(read) => read,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(DownloadError::from_body_read(err)),
            };

            file.write_all(&buffer[..read])?;
            written += read as u64;
        }

        file.flush()?;

        Ok(written)
    }
}

impl Downloader<UReqFetcher> {
    pub fn new(config: &FetchConfig) -> io::Result<Self> {
        let fetcher = UReqFetcher::new(config);
        Downloader::with_fetcher(config, fetcher)
    }
}

/// Idempotent: an existing directory is left as it is.
pub fn prepare_directory(directory: &Path) -> io::Result<PathBuf> {
    let absolute_path = if directory.is_absolute() {
        directory.to_path_buf()
    } else {
        std::env::current_dir()?.join(directory)
    };

    fs::create_dir_all(&absolute_path)?;

    Ok(absolute_path)
}

fn check_content_type(content_type: Option<&str>, console: &mut dyn Console) {
    let content_type = content_type.unwrap_or_default().trim().to_ascii_lowercase();

    if !content_type.starts_with("image/") {
        warn!(%content_type, "response does not declare an image type");
        console.say(
            Status::Warning,
            &format!("Warning: Content-Type is '{content_type}', may not be an image"),
        );
        return;
    }

    let mime = content_type.split(';').next().unwrap_or_default().trim();

    match ImageFormat::from_mime_type(mime) {
        Some(format) => debug!(?format, "declared image format"),
        None => debug!(mime, "image type not known to the decoder table"),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("download attempt panicked")
    }
}
