use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DIRECTORY: &str = "Fetched_Images";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

pub const DEFAULT_USER_AGENT: &str = concat!(
    "image-fetch/",
    env!("CARGO_PKG_VERSION"),
    " (interactive image downloader)"
);

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub directory: PathBuf,
    pub timeout: Duration,
    pub user_agent: String,
    pub chunk_size: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_DIRECTORY),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl FetchConfig {
    pub fn with_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }
}
