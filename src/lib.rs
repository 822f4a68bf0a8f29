pub mod config;
pub mod console;
pub mod downloader;
pub mod logging;
pub mod session;

pub use config::FetchConfig;
pub use console::{Console, Input, Status, StdConsole};
pub use downloader::{
    prepare_directory, resolve_filename, Download, DownloadError, Downloader, FileDownloader,
    Response, UReqFetcher,
};
pub use session::{Session, State};
