use std::sync::Arc;

use futures::{StreamExt, stream};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::coordinate::Coordinate;
use crate::downloader::{index, metadata};
use crate::error::{Error, Result};
use crate::release::{Release, RemoteFile};

/// Outcome of resolving and listing a coordinate.
#[derive(Debug, Default)]
pub struct Plan {
    /// Releases the coordinate resolved to.
    pub releases: usize,
    /// Files to download, across all listed releases.
    pub files: Vec<RemoteFile>,
    /// Releases that could not be listed.
    pub errors: Vec<Error>,
}

pub struct Planer {
    client: Client,
    config: Config,
}

impl Planer {
    pub fn new(client: Client, config: Config) -> Self {
        Planer { client, config }
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        debug!("requesting {}", url);
        let fetch = async {
            self.client
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await
        };
        fetch.await.map_err(|source| Error::Fetch {
            url: url.to_string(),
            source,
        })
    }

    /// Every version listed in the artifact's metadata document, in document order.
    pub async fn resolve_versions(&self, group: &str, artifact: &str) -> Result<Vec<Release>> {
        let url = self.config.repository.metadata_url(group, artifact);
        let document = self.get_text(&url).await?;

        let mut releases = Vec::new();
        for version in metadata::extract_versions(&document) {
            match Release::new(self.config.repository.clone(), group, artifact, version) {
                Ok(release) => releases.push(release),
                Err(err) => warn!("skipping version listed in {}: {}", url, err),
            }
        }
        Ok(releases)
    }

    /// Files published under `release`, read from its directory listing.
    pub async fn list_files(&self, release: Release) -> Result<Vec<RemoteFile>> {
        let url = release.index_url();
        let document = self.get_text(&url).await?;
        let release = Arc::new(release);

        let mut files = Vec::new();
        for name in index::extract_file_names(&document) {
            if !index::is_plain_file_name(&name) {
                debug!("skipping link {:?} in {}", name, url);
                continue;
            }
            match RemoteFile::new(release.clone(), name) {
                Ok(file) => files.push(file),
                Err(err) => warn!("skipping entry in {}: {}", url, err),
            }
        }

        if files.is_empty() {
            return Err(Error::NoFilesFound {
                release: release.to_string(),
            });
        }
        Ok(files)
    }

    /// Resolves `coordinate` and lists every resulting release.
    ///
    /// Metadata failures abort the whole plan. A release that cannot be listed
    /// only drops that release; its error is kept in [`Plan::errors`].
    pub async fn plan(&self, coordinate: &Coordinate) -> Result<Plan> {
        let releases = match coordinate {
            Coordinate::Release(release) => vec![release.clone()],
            Coordinate::Unversioned { group, artifact } => {
                let releases = self.resolve_versions(group, artifact).await?;
                info!(
                    "resolved {} version(s) of {}:{}",
                    releases.len(),
                    group,
                    artifact
                );
                releases
            }
        };

        let mut plan = Plan {
            releases: releases.len(),
            ..Plan::default()
        };

        let mut listings = stream::iter(releases)
            .map(|release| self.list_files(release))
            .buffer_unordered(self.config.concurrency.max(1));

        while let Some(listing) = listings.next().await {
            match listing {
                Ok(files) => {
                    let release = files[0].release().to_string();
                    let total = files.len();
                    plan.files
                        .extend(files.into_iter().filter(|file| self.config.wants(file.name())));
                    debug!("listed {} file(s) for {}", total, release);
                }
                Err(err) => {
                    warn!("{}", err);
                    plan.errors.push(err);
                }
            }
        }

        Ok(plan)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::release::Repository;
    use axum::{
        Router,
        extract::State,
        http::{StatusCode, Uri},
        response::{IntoResponse, Response},
    };
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    /// Paths (without leading `/`) mapped to response bodies. Anything else is a 404.
    pub(crate) type MockRepo = HashMap<String, (StatusCode, String)>;

    async fn serve_mock(State(repo): State<Arc<MockRepo>>, uri: Uri) -> Response {
        match repo.get(uri.path().trim_start_matches('/')) {
            Some((status, body)) => (*status, body.clone()).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }

    pub(crate) async fn start_mock_repository(repo: MockRepo) -> Repository {
        let app = Router::new()
            .fallback(serve_mock)
            .with_state(Arc::new(repo));
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Repository::new(&format!("http://{}/maven2", addr))
    }

    pub(crate) fn ok(body: &str) -> (StatusCode, String) {
        (StatusCode::OK, body.to_string())
    }

    fn listing(names: &[&str]) -> String {
        let mut html = String::from("<html><body><pre>\n<a href=\"../\">../</a>\n");
        for name in names {
            html.push_str(&format!("<a href=\"{0}\" title=\"{0}\">{0}</a>\n", name));
        }
        html.push_str("</pre></body></html>");
        html
    }

    fn planer(repository: Repository) -> Planer {
        Planer::new(
            Client::new(),
            Config {
                repository,
                ..Config::default()
            },
        )
    }

    fn sample_repo() -> MockRepo {
        let mut repo = MockRepo::new();
        repo.insert(
            "maven2/com/example/lib/maven-metadata.xml".to_string(),
            ok("<metadata><versioning><versions>\
                <version>1.0</version><version>2.0</version>\
                </versions></versioning></metadata>"),
        );
        repo.insert(
            "maven2/com/example/lib/1.0/".to_string(),
            ok(&listing(&["lib-1.0.jar", "lib-1.0.pom", "docs/"])),
        );
        repo.insert(
            "maven2/com/example/lib/2.0/".to_string(),
            ok(&listing(&["lib-2.0.jar"])),
        );
        repo.insert(
            "maven2/com/example/empty/maven-metadata.xml".to_string(),
            ok("<metadata><groupId>com.example</groupId></metadata>"),
        );
        repo.insert(
            "maven2/com/example/bare/1.0/".to_string(),
            ok(&listing(&["sub/"])),
        );
        repo
    }

    #[tokio::test]
    async fn test_resolve_versions() {
        let repository = start_mock_repository(sample_repo()).await;
        let releases = planer(repository)
            .resolve_versions("com.example", "lib")
            .await
            .unwrap();

        let versions: Vec<_> = releases.iter().map(|r| r.version()).collect();
        assert_eq!(versions, vec!["1.0", "2.0"]);
        for release in &releases {
            assert_eq!(release.group(), "com.example");
            assert_eq!(release.artifact(), "lib");
        }
    }

    #[tokio::test]
    async fn test_resolve_versions_empty_document() {
        let repository = start_mock_repository(sample_repo()).await;
        let releases = planer(repository)
            .resolve_versions("com.example", "empty")
            .await
            .unwrap();
        assert!(releases.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_versions_missing_metadata() {
        let repository = start_mock_repository(sample_repo()).await;
        let result = planer(repository)
            .resolve_versions("com.example", "missing")
            .await;
        match result {
            Err(Error::Fetch { url, .. }) => assert!(url.ends_with("missing/maven-metadata.xml")),
            other => panic!("Expected Fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_files_skips_directories() {
        let repository = start_mock_repository(sample_repo()).await;
        let release = Release::new(repository.clone(), "com.example", "lib", "1.0").unwrap();
        let files = planer(repository).list_files(release).await.unwrap();

        let names: Vec<_> = files.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["lib-1.0.jar", "lib-1.0.pom"]);
    }

    #[tokio::test]
    async fn test_list_files_no_files_found() {
        let repository = start_mock_repository(sample_repo()).await;
        let release = Release::new(repository.clone(), "com.example", "bare", "1.0").unwrap();
        match planer(repository).list_files(release).await {
            Err(Error::NoFilesFound { release }) => assert_eq!(release, "com.example:bare:1.0"),
            other => panic!("Expected NoFilesFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_files_fetch_error_is_distinct() {
        let repository = start_mock_repository(sample_repo()).await;
        let release = Release::new(repository.clone(), "com.example", "bare", "9.9").unwrap();
        assert!(matches!(
            planer(repository).list_files(release).await,
            Err(Error::Fetch { .. })
        ));
    }

    #[tokio::test]
    async fn test_plan_unversioned() {
        let repository = start_mock_repository(sample_repo()).await;
        let coordinate = Coordinate::parse("com.example:lib", &repository).unwrap();
        let plan = planer(repository).plan(&coordinate).await.unwrap();

        assert_eq!(plan.releases, 2);
        assert!(plan.errors.is_empty());
        let mut paths: Vec<_> = plan.files.iter().map(|f| f.relative_path()).collect();
        paths.sort();
        assert_eq!(
            paths,
            vec![
                "com/example/lib/1.0/lib-1.0.jar",
                "com/example/lib/1.0/lib-1.0.pom",
                "com/example/lib/2.0/lib-2.0.jar",
            ]
        );
    }

    #[tokio::test]
    async fn test_plan_keeps_other_releases_when_one_fails() {
        let mut repo = sample_repo();
        repo.insert(
            "maven2/com/example/lib/maven-metadata.xml".to_string(),
            ok("<version>1.0</version><version>3.0</version>"),
        );
        let repository = start_mock_repository(repo).await;
        let coordinate = Coordinate::parse("com.example:lib", &repository).unwrap();
        let plan = planer(repository).plan(&coordinate).await.unwrap();

        assert_eq!(plan.releases, 2);
        assert_eq!(plan.files.len(), 2);
        assert_eq!(plan.errors.len(), 1);
        assert!(matches!(plan.errors[0], Error::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_plan_extension_filter() {
        let repository = start_mock_repository(sample_repo()).await;
        let coordinate = Coordinate::parse("com.example:lib:1.0", &repository).unwrap();
        let planer = Planer::new(
            Client::new(),
            Config {
                repository,
                extensions: vec!["pom".to_string()],
                ..Config::default()
            },
        );
        let plan = planer.plan(&coordinate).await.unwrap();

        assert_eq!(plan.files.len(), 1);
        assert_eq!(plan.files[0].name(), "lib-1.0.pom");
    }

    #[tokio::test]
    async fn test_plan_zero_releases() {
        let repository = start_mock_repository(sample_repo()).await;
        let coordinate = Coordinate::parse("com.example:empty", &repository).unwrap();
        let plan = planer(repository).plan(&coordinate).await.unwrap();

        assert_eq!(plan.releases, 0);
        assert!(plan.files.is_empty());
        assert!(plan.errors.is_empty());
    }
}
