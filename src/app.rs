use std::fs;
use std::thread;

use chrono::Local;
use serde::Serialize;

use crate::catalog::CatalogLoader;
use crate::config::HarvestConfig;
use crate::domain::{
    Catalog, CatalogRecord, DirectoryPlacement, FetchOutcome, HARVEST_OBJECT_KEY,
};
use crate::error::HarvestError;
use crate::fetcher::ResourceFetcher;
use crate::layout::{HARVEST_OBJECT_FILE, Layout, clean_title};
use crate::run_log::LineSink;

#[derive(Debug, Clone, Default, Serialize)]
pub struct HarvestSummary {
    pub records: Vec<RecordSummary>,
    pub downloaded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub bytes: u64,
}

impl HarvestSummary {
    fn absorb(&mut self, record: RecordSummary) {
        self.downloaded += record.downloaded;
        self.failed += record.failed;
        self.skipped += record.skipped;
        self.bytes += record.bytes;
        self.records.push(record);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordSummary {
    pub name: String,
    pub directory: String,
    pub fallback: bool,
    /// `None` when the record carries no harvest object id.
    pub harvest_object: Option<bool>,
    pub downloaded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub bytes: u64,
}

impl RecordSummary {
    fn new(record: &CatalogRecord, placement: &DirectoryPlacement) -> Self {
        Self {
            name: record.name.clone(),
            directory: placement.dir().to_string(),
            fallback: placement.is_fallback(),
            harvest_object: None,
            downloaded: 0,
            failed: 0,
            skipped: 0,
            bytes: 0,
        }
    }
}

pub struct Harvester<F: ResourceFetcher> {
    config: HarvestConfig,
    layout: Layout,
    fetcher: F,
}

impl<F: ResourceFetcher> Harvester<F> {
    pub fn new(config: HarvestConfig, fetcher: F) -> Self {
        let layout = config.layout();
        Self {
            config,
            layout,
            fetcher,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Loads the catalog and harvests every record in order.
    ///
    /// Stops at the first fatal condition: an unreadable or undecodable catalog, or a
    /// record without `extras` or `resources`. Per-resource failures are only logged.
    pub fn run(&self, sink: &mut dyn LineSink) -> Result<HarvestSummary, HarvestError> {
        sink.emit(&format!("Harvest started at {}", timestamp()));
        sink.emit(&format!(
            "Cooldown time between calls {}",
            self.config.cooldown.as_secs_f64()
        ));

        let catalog_path = self.config.catalog_path();
        let catalog = match CatalogLoader::load(catalog_path.as_std_path()) {
            Ok(catalog) => catalog,
            Err(err) => {
                match &err {
                    HarvestError::CatalogMalformed(reason) => sink.emit(&format!(
                        "Error: Can't decode file: {catalog_path} ({reason})"
                    )),
                    _ => sink.emit(&format!("Error: Can't open file: {catalog_path}")),
                }
                sink.emit("Exiting");
                return Err(err);
            }
        };
        sink.emit(&format!("Read in file: {catalog_path}"));

        let summary = self.harvest_catalog(&catalog, sink)?;
        sink.emit(&format!("Harvest ended at {}", timestamp()));
        Ok(summary)
    }

    pub fn harvest_catalog(
        &self,
        catalog: &Catalog,
        sink: &mut dyn LineSink,
    ) -> Result<HarvestSummary, HarvestError> {
        let mut summary = HarvestSummary::default();
        for record in catalog.records() {
            summary.absorb(self.harvest_record(record, sink)?);
        }
        Ok(summary)
    }

    pub fn harvest_record(
        &self,
        record: &CatalogRecord,
        sink: &mut dyn LineSink,
    ) -> Result<RecordSummary, HarvestError> {
        sink.emit(&format!(
            "Found result title: {} ({})",
            record.title(),
            clean_title(record.title())
        ));

        let placement = self.ensure_directory(record, sink);
        let dir = placement.dir();
        let mut summary = RecordSummary::new(record, &placement);

        if record.extras.is_none() {
            sink.emit("Could not find expected results in catalog! Missing 'extras' section. Exiting");
            return Err(HarvestError::MissingExtras(record.name.clone()));
        }

        if let Some(extra) = record.harvest_object_extra() {
            match extra.value.as_deref() {
                Some(id) => {
                    let url = self.layout.harvest_object_url(id);
                    let path = self.layout.harvest_object_path(dir);
                    let outcome = self.fetcher.fetch(&url, path.as_std_path());
                    sink.emit(&describe(
                        &format!("Downloading {HARVEST_OBJECT_FILE} ... "),
                        &outcome,
                    ));
                    summary.harvest_object = Some(outcome.is_success());
                }
                None => {
                    sink.emit(&format!(
                        "Skipping {HARVEST_OBJECT_FILE}: {HARVEST_OBJECT_KEY} has no value"
                    ));
                    summary.harvest_object = Some(false);
                }
            }
        }

        let Some(resources) = record.resources.as_deref() else {
            sink.emit(
                "Could not find expected results in catalog! Missing 'resources' section. Exiting",
            );
            return Err(HarvestError::MissingResources(record.name.clone()));
        };

        for resource in resources {
            let Some(url) = resource.url() else {
                sink.emit("Could not find url for resource!");
                summary.skipped += 1;
                continue;
            };
            let path = self.layout.resource_path(dir, record, resource);

            thread::sleep(self.config.cooldown);
            let outcome = self.fetcher.fetch(url, path.as_std_path());
            sink.emit(&describe(
                &format!("Downloading {url} as {path} ... "),
                &outcome,
            ));
            match outcome {
                FetchOutcome::Success(size) => {
                    summary.downloaded += 1;
                    summary.bytes += size;
                }
                FetchOutcome::Failure(_) => summary.failed += 1,
            }
        }

        Ok(summary)
    }

    /// Creates `root/<name>` if needed. On failure the record falls back to the root.
    pub fn ensure_directory(
        &self,
        record: &CatalogRecord,
        sink: &mut dyn LineSink,
    ) -> DirectoryPlacement {
        let dir = self.layout.record_dir(record);
        if dir.is_dir() {
            sink.emit(&format!("Found existing directory: {dir}"));
            return DirectoryPlacement::Existing(dir);
        }
        match fs::create_dir_all(&dir) {
            Ok(()) => {
                sink.emit(&format!("Created directory: {dir}"));
                DirectoryPlacement::Created(dir)
            }
            Err(err) => {
                let root = self.layout.root().to_path_buf();
                sink.emit(&format!("Error: Can't create directory: {dir} ({err})"));
                sink.emit(&format!(
                    "Warning: Writing to parent directory instead: {root}"
                ));
                DirectoryPlacement::Fallback(root)
            }
        }
    }
}

fn describe(prefix: &str, outcome: &FetchOutcome) -> String {
    match outcome {
        FetchOutcome::Success(size) => format!("{prefix}success! File size {size} bytes"),
        FetchOutcome::Failure(reason) => format!("{prefix}failed: {reason}"),
    }
}

fn timestamp() -> String {
    Local::now().format("%Y%m%d-%H%M%S").to_string()
}
