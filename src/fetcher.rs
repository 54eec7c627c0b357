use std::fs;
use std::path::Path;

use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::domain::{FetchFailure, FetchOutcome};
use crate::error::HarvestError;

pub trait ResourceFetcher {
    /// Single GET of `url`, body written to `destination` (overwriting it).
    fn fetch(&self, url: &str, destination: &Path) -> FetchOutcome;
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, HarvestError> {
        let client = Client::builder()
            .build()
            .map_err(|err| HarvestError::HttpClient(err.to_string()))?;
        Ok(Self { client })
    }
}

impl ResourceFetcher for HttpFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> FetchOutcome {
        let response = match self.client.get(url).send() {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(%url, error = %err, "request failed");
                return FetchOutcome::Failure(FetchFailure::Transport(err.to_string()));
            }
        };

        let status = response.status();
        tracing::debug!(%url, status = status.as_u16(), "response received");
        if status == StatusCode::NOT_FOUND {
            return FetchOutcome::Failure(FetchFailure::NotFound);
        }
        if !status.is_success() {
            return FetchOutcome::Failure(FetchFailure::Status(status.as_u16()));
        }

        let body = match response.bytes() {
            Ok(body) => body,
            Err(err) => return FetchOutcome::Failure(FetchFailure::Transport(err.to_string())),
        };
        write_body(&body, destination)
    }
}

/// Writes the buffered body and reports the size the filesystem holds afterwards.
pub fn write_body(body: &[u8], destination: &Path) -> FetchOutcome {
    let written = fs::write(destination, body).and_then(|()| fs::metadata(destination));
    match written {
        Ok(meta) => FetchOutcome::Success(meta.len()),
        Err(err) => {
            tracing::debug!(path = %destination.display(), error = %err, "write failed");
            FetchOutcome::Failure(FetchFailure::Write(err.to_string()))
        }
    }
}
