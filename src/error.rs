use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum HarvestError {
    #[error("could not write to log file: {0}")]
    LogOpen(PathBuf),

    #[error("can't open catalog file: {0}")]
    CatalogUnreadable(PathBuf),

    #[error("failed to decode catalog: {0}")]
    CatalogMalformed(String),

    #[error("record {0} is missing its 'extras' section")]
    #[diagnostic(help("every catalog result must carry an extras list, even an empty one"))]
    MissingExtras(String),

    #[error("record {0} is missing its 'resources' section")]
    #[diagnostic(help("every catalog result must carry a resources list, even an empty one"))]
    MissingResources(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),
}
