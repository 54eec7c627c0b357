use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::domain::Catalog;
use crate::error::HarvestError;

pub struct CatalogLoader;

impl CatalogLoader {
    pub fn load(path: &Path) -> Result<Catalog, HarvestError> {
        let file =
            File::open(path).map_err(|_| HarvestError::CatalogUnreadable(path.to_path_buf()))?;
        Self::parse(BufReader::new(file))
    }

    pub fn parse<R: Read>(reader: R) -> Result<Catalog, HarvestError> {
        serde_json::from_reader(reader)
            .map_err(|err| HarvestError::CatalogMalformed(err.to_string()))
    }
}
