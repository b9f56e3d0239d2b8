use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::Client;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::release::RemoteFile;
use crate::utils::limited_spawner::LimitedSpawner;

/// Completion status of one file.
#[derive(Debug)]
pub struct Outcome {
    pub url: String,
    pub dest: PathBuf,
    pub result: Result<()>,
}

async fn create_parent_dirs(dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        // create_dir_all treats a directory created concurrently as success
        fs::create_dir_all(parent)
            .await
            .map_err(|source| Error::FileSystem {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    Ok(())
}

async fn stream_to_file(response: reqwest::Response, url: &str, dest: &Path) -> Result<()> {
    let fs_err = |source: std::io::Error| Error::FileSystem {
        path: dest.to_path_buf(),
        source,
    };

    let mut file = fs::File::create(dest).await.map_err(fs_err)?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|source| Error::Download {
            url: url.to_string(),
            dest: dest.to_path_buf(),
            source,
        })?;
        file.write_all(&chunk).await.map_err(fs_err)?;
    }
    file.flush().await.map_err(fs_err)?;
    Ok(())
}

async fn download_file(client: Client, url: String, dest: PathBuf) -> Result<()> {
    create_parent_dirs(&dest).await?;

    debug!("requesting {}", url);
    let response = client
        .get(&url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|source| Error::Download {
            url: url.clone(),
            dest: dest.clone(),
            source,
        })?;

    if let Err(err) = stream_to_file(response, &url, &dest).await {
        // no partial files left behind
        let _ = fs::remove_file(&dest).await;
        return Err(err);
    }

    println!("Downloaded {}", url);
    Ok(())
}

/// Downloads every file below `output_dir`, at most `concurrency` at a time.
///
/// Returns once every transfer finished, one [`Outcome`] per input file in
/// input order. A failed file never stops the others.
pub async fn download_all(
    client: &Client,
    files: Vec<RemoteFile>,
    output_dir: &Path,
    concurrency: usize,
) -> Vec<Outcome> {
    let spawner = LimitedSpawner::new(concurrency);
    info!(
        "downloading {} file(s) into {} ({} at a time)",
        files.len(),
        output_dir.display(),
        spawner.max_in_flight()
    );

    let mut pending = Vec::with_capacity(files.len());
    for file in files {
        let url = file.download_url();
        let (dest, handle) = match file.destination(output_dir) {
            Ok(dest) => {
                let handle = spawner
                    .spawn(download_file(client.clone(), url.clone(), dest.clone()))
                    .await
                    .map_err(Error::from);
                (dest, handle)
            }
            Err(err) => (PathBuf::from(file.relative_path()), Err(err)),
        };
        pending.push((url, dest, handle));
    }

    let mut outcomes = Vec::with_capacity(pending.len());
    for (url, dest, handle) in pending {
        let result = match handle {
            Ok(handle) => handle.await.unwrap_or_else(|err| Err(err.into())),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            warn!("{}", err);
        }
        outcomes.push(Outcome { url, dest, result });
    }
    outcomes
}
