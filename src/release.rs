use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Result};

pub const MAVEN_CENTRAL: &str = "https://repo1.maven.org/maven2/";

/// Base URL of a package repository, always ending with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    base_url: Arc<str>,
}

impl Repository {
    pub fn new(base_url: &str) -> Self {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        Repository {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the `maven-metadata.xml` listing every version of an artifact.
    pub fn metadata_url(&self, group: &str, artifact: &str) -> String {
        format!(
            "{}{}/{}/maven-metadata.xml",
            self.base_url,
            group_path(group),
            artifact
        )
    }
}

impl Default for Repository {
    fn default() -> Self {
        Repository::new(MAVEN_CENTRAL)
    }
}

fn group_path(group: &str) -> String {
    group.replace('.', "/")
}

pub(crate) fn check_segment(segment: &str) -> std::result::Result<(), &'static str> {
    if segment.is_empty() {
        Err("empty segment")
    } else if segment == "." {
        Err("current directory")
    } else if segment.contains("..") {
        Err("path traversal")
    } else if segment.contains(['/', '\\']) {
        Err("path separator")
    } else {
        Ok(())
    }
}

/// Every dot-separated component of a group must be a valid segment, so
/// `.tmp`, `com.` and `com..x` never turn into absolute or empty paths.
pub(crate) fn check_group(group: &str) -> std::result::Result<(), &'static str> {
    check_segment(group)?;
    group.split('.').try_for_each(|component| {
        if component.is_empty() {
            Err("empty group component")
        } else {
            Ok(())
        }
    })
}

/// One published version of an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    repository: Repository,
    group: String,
    artifact: String,
    version: String,
}

impl Release {
    pub fn new(
        repository: Repository,
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self> {
        let release = Release {
            repository,
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        };

        let checked = check_group(&release.group)
            .and_then(|_| check_segment(&release.artifact))
            .and_then(|_| check_segment(&release.version));

        match checked {
            Ok(()) => Ok(release),
            Err(reason) => Err(Error::InvalidRelease {
                group: release.group,
                artifact: release.artifact,
                version: release.version,
                reason,
            }),
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Directory listing of this release, ending with `/`.
    pub fn index_url(&self) -> String {
        format!("{}{}", self.repository.base_url(), self.relative_path())
    }

    /// `group/with/slashes/artifact/version/`
    pub fn relative_path(&self) -> String {
        format!(
            "{}/{}/{}/",
            group_path(&self.group),
            self.artifact,
            self.version
        )
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group(), self.artifact(), self.version())
    }
}

/// A single file published under a release.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    release: Arc<Release>,
    name: String,
}

impl RemoteFile {
    pub fn new(release: Arc<Release>, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if let Err(reason) = check_segment(&name) {
            return Err(Error::InvalidFileName { name, reason });
        }
        Ok(RemoteFile { release, name })
    }

    pub fn release(&self) -> &Release {
        &self.release
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn download_url(&self) -> String {
        self.release.index_url() + &self.name
    }

    pub fn relative_path(&self) -> String {
        self.release.relative_path() + &self.name
    }

    /// Where this file lands below `output_dir`. Refuses anything that
    /// would resolve outside of it.
    pub fn destination(&self, output_dir: &Path) -> Result<PathBuf> {
        let relative = self.relative_path();
        let contained = Path::new(&relative)
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !contained {
            return Err(Error::UnsafePath {
                path: PathBuf::from(relative),
            });
        }
        Ok(output_dir.join(relative))
    }
}
