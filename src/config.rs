use std::path::PathBuf;
use std::time::Duration;

use crate::release::Repository;

pub const DEFAULT_OUTPUT_DIR: &str = "files";
pub const DEFAULT_CONCURRENCY: usize = 16;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub repository: Repository,
    /// Root under which `<group-path>/<artifact>/<version>/<file>` is written.
    pub output_dir: PathBuf,
    /// Maximum downloads (and index fetches) in flight.
    pub concurrency: usize,
    /// Connect and read timeout per request.
    pub timeout: Duration,
    /// Only keep files with one of these extensions; empty keeps everything.
    pub extensions: Vec<String>,
}

impl Config {
    pub fn wants(&self, file_name: &str) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        crate::downloader::index::extension(file_name)
            .is_some_and(|ext| self.extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repository: Repository::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            extensions: Vec::new(),
        }
    }
}
