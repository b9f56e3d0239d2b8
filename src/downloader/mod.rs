pub mod executor;
pub mod index;
pub mod metadata;
mod planer;

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::coordinate::Coordinate;
use crate::error::{Error, Result};

use planer::Planer;

/// What a finished run did, failures included.
#[derive(Debug, Default)]
pub struct Summary {
    pub releases: usize,
    pub downloaded: usize,
    /// Releases that could not be listed and files that could not be downloaded.
    pub failures: Vec<Error>,
}

/// The one HTTP client shared by every request of a run.
pub fn build_client(config: &Config) -> Result<Client> {
    Client::builder()
        .connect_timeout(config.timeout)
        .read_timeout(config.timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(Error::HttpClient)
}

/// Parses `coordinate`, resolves and lists its releases, then downloads
/// every file below `config.output_dir`.
///
/// Errors out only on failures that leave nothing to download; per-release
/// and per-file failures are collected in the [`Summary`].
pub async fn download(client: &Client, coordinate: &str, config: &Config) -> Result<Summary> {
    let coordinate = Coordinate::parse(coordinate, &config.repository)?;

    let planer = Planer::new(client.clone(), config.clone());
    let plan = planer.plan(&coordinate).await?;

    if plan.releases == 0 {
        if let Coordinate::Unversioned { group, artifact } = &coordinate {
            warn!(
                "no versions of {}:{} listed in {}",
                group,
                artifact,
                config.repository.base_url()
            );
        }
    }

    let mut summary = Summary {
        releases: plan.releases,
        failures: plan.errors,
        ..Summary::default()
    };

    let outcomes =
        executor::download_all(client, plan.files, &config.output_dir, config.concurrency).await;
    for outcome in outcomes {
        match outcome.result {
            Ok(()) => {
                debug!("{} -> {}", outcome.url, outcome.dest.display());
                summary.downloaded += 1;
            }
            Err(err) => summary.failures.push(err),
        }
    }

    info!(
        "downloaded {} file(s) from {} release(s), {} failure(s)",
        summary.downloaded,
        summary.releases,
        summary.failures.len()
    );
    Ok(summary)
}
