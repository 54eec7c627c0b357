use std::sync::LazyLock;

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;

use crate::domain::{CatalogRecord, ResourceRef};

pub const HARVEST_OBJECT_FILE: &str = "data.json";
const DEFAULT_EXTENSION: &str = "txt";

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9a-zA-Z]+").expect("literal pattern"));

/// Output layout rooted at the harvest directory (`data/imls` by default).
///
/// Every record gets `root/<name>/`; its resources land there named after the
/// resource description, or `<name>.<format>` when no description is present.
#[derive(Debug, Clone)]
pub struct Layout {
    root: Utf8PathBuf,
    harvest_url_prefix: String,
}

impl Layout {
    pub fn new(root: impl Into<Utf8PathBuf>, harvest_url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            harvest_url_prefix: harvest_url_prefix.into(),
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn record_dir(&self, record: &CatalogRecord) -> Utf8PathBuf {
        self.root.join(&record.name)
    }

    pub fn resource_path(
        &self,
        dir: &Utf8Path,
        record: &CatalogRecord,
        resource: &ResourceRef,
    ) -> Utf8PathBuf {
        dir.join(resource_file_name(record, resource))
    }

    pub fn harvest_object_path(&self, dir: &Utf8Path) -> Utf8PathBuf {
        dir.join(HARVEST_OBJECT_FILE)
    }

    pub fn harvest_object_url(&self, harvest_object_id: &str) -> String {
        format!("{}{}", self.harvest_url_prefix, harvest_object_id)
    }
}

pub fn resource_file_name(record: &CatalogRecord, resource: &ResourceRef) -> String {
    if let Some(description) = resource.description() {
        return description.to_string();
    }
    let ext = resource
        .format()
        .map(str::to_lowercase)
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    format!("{}.{ext}", record.name)
}

/// Display form of a title; never used for paths.
pub fn clean_title(title: &str) -> String {
    NON_ALPHANUMERIC.replace_all(title, "_").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_title_collapses_runs() {
        assert_eq!(
            clean_title("Public Libraries Survey, FY 2014"),
            "Public_Libraries_Survey_FY_2014"
        );
        assert_eq!(clean_title("--a--"), "_a_");
    }
}
