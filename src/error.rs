use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid coordinate {0:?}: expected group:artifact or group:artifact:version")]
    InvalidCoordinate(String),

    #[error("invalid release {group}:{artifact}:{version}: {reason}")]
    InvalidRelease {
        group: String,
        artifact: String,
        version: String,
        reason: &'static str,
    },

    #[error("invalid file name {name:?}: {reason}")]
    InvalidFileName { name: String, reason: &'static str },

    #[error("refusing to write outside the output directory: {}", .path.display())]
    UnsafePath { path: PathBuf },

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("no files found for {release}")]
    NoFilesFound { release: String },

    #[error("failed to download {url} to {}: {source}", .dest.display())]
    Download {
        url: String,
        dest: PathBuf,
        #[source]
        source: reqwest::Error,
    },

    #[error("filesystem error at {}: {source}", .path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("download slot unavailable: {0}")]
    Spawn(#[from] tokio::sync::AcquireError),

    #[error("download task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
