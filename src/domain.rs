use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

pub const HARVEST_OBJECT_KEY: &str = "harvest_object_id";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Catalog {
    pub result: CatalogBody,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogBody {
    pub results: Vec<CatalogRecord>,
}

impl Catalog {
    pub fn records(&self) -> &[CatalogRecord] {
        &self.result.results
    }
}

/// One catalog entry; maps to exactly one output directory named after `name`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogRecord {
    #[serde(default)]
    pub title: Option<String>,
    pub name: String,
    #[serde(default)]
    pub extras: Option<Vec<HarvestExtra>>,
    #[serde(default)]
    pub resources: Option<Vec<ResourceRef>>,
}

impl CatalogRecord {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// First `harvest_object_id` extra. Later duplicates are ignored.
    pub fn harvest_object_extra(&self) -> Option<&HarvestExtra> {
        self.extras
            .as_deref()?
            .iter()
            .find(|extra| extra.key.as_deref() == Some(HARVEST_OBJECT_KEY))
    }

    pub fn harvest_object_id(&self) -> Option<&str> {
        self.harvest_object_extra()
            .and_then(|extra| extra.value.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HarvestExtra {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResourceRef {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ResourceRef {
    pub fn url(&self) -> Option<&str> {
        non_empty(self.url.as_deref())
    }

    pub fn format(&self) -> Option<&str> {
        non_empty(self.format.as_deref())
    }

    pub fn description(&self) -> Option<&str> {
        non_empty(self.description.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success(u64),
    Failure(FetchFailure),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    NotFound,
    Status(u16),
    Transport(String),
    Write(String),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::NotFound => write!(f, "not found"),
            FetchFailure::Status(status) => write!(f, "status {status}"),
            FetchFailure::Transport(message) => write!(f, "{message}"),
            FetchFailure::Write(detail) => write!(f, "write error: {detail}"),
        }
    }
}

/// Where a record's files end up after the directory has been ensured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryPlacement {
    Created(Utf8PathBuf),
    Existing(Utf8PathBuf),
    /// The record directory could not be created; files go into the root instead.
    Fallback(Utf8PathBuf),
}

impl DirectoryPlacement {
    pub fn dir(&self) -> &Utf8Path {
        match self {
            DirectoryPlacement::Created(dir)
            | DirectoryPlacement::Existing(dir)
            | DirectoryPlacement::Fallback(dir) => dir,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, DirectoryPlacement::Fallback(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extra(key: &str, value: &str) -> HarvestExtra {
        HarvestExtra {
            key: Some(key.to_string()),
            value: Some(value.to_string()),
        }
    }

    #[test]
    fn first_harvest_object_id_wins() {
        let record = CatalogRecord {
            title: Some("t".to_string()),
            name: "r1".to_string(),
            extras: Some(vec![
                extra("source_hash", "abc"),
                extra(HARVEST_OBJECT_KEY, "first"),
                extra(HARVEST_OBJECT_KEY, "second"),
            ]),
            resources: Some(Vec::new()),
        };
        assert_eq!(record.harvest_object_id(), Some("first"));
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let resource = ResourceRef {
            url: Some(String::new()),
            format: Some(String::new()),
            description: Some(String::new()),
        };
        assert_eq!(resource.url(), None);
        assert_eq!(resource.format(), None);
        assert_eq!(resource.description(), None);
    }
}
