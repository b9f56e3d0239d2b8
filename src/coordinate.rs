use crate::error::{Error, Result};
use crate::release::{Release, Repository, check_group, check_segment};

/// A parsed `group:artifact[:version]` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coordinate {
    /// Fully qualified, no lookup needed.
    Release(Release),
    /// Version omitted; every published version gets resolved.
    Unversioned { group: String, artifact: String },
}

impl Coordinate {
    pub fn parse(coordinate: &str, repository: &Repository) -> Result<Self> {
        let invalid = || Error::InvalidCoordinate(coordinate.to_string());

        let parts = coordinate.split(':').collect::<Vec<_>>();
        match parts.as_slice() {
            [group, artifact, version] => {
                Release::new(repository.clone(), *group, *artifact, *version)
                    .map(Coordinate::Release)
                    .map_err(|_| invalid())
            }
            [group, artifact] => {
                check_group(group)
                    .and_then(|_| check_segment(artifact))
                    .map_err(|_| invalid())?;
                Ok(Coordinate::Unversioned {
                    group: group.to_string(),
                    artifact: artifact.to_string(),
                })
            }
            _ => Err(invalid()),
        }
    }
}
