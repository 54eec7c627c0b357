mod common;

use assert_matches::assert_matches;

use common::http_server::{self, Route};
use imls_harvest::domain::{FetchFailure, FetchOutcome};
use imls_harvest::fetcher::{HttpFetcher, ResourceFetcher};

#[test]
fn success_writes_body_and_reports_file_size() {
    let base = http_server::start(vec![("/y.bin", Route::ok(b"\x00\x01binary payload"))]);
    let temp = tempfile::tempdir().unwrap();
    let target = temp.path().join("r1.bin");

    let fetcher = HttpFetcher::new().unwrap();
    let outcome = fetcher.fetch(&format!("{base}/y.bin"), &target);

    let on_disk = std::fs::metadata(&target).unwrap().len();
    assert_eq!(outcome, FetchOutcome::Success(on_disk));
    assert_eq!(std::fs::read(&target).unwrap(), b"\x00\x01binary payload");
}

#[test]
fn not_found_writes_nothing() {
    let base = http_server::start(Vec::new());
    let temp = tempfile::tempdir().unwrap();
    let target = temp.path().join("missing.csv");

    let fetcher = HttpFetcher::new().unwrap();
    let outcome = fetcher.fetch(&format!("{base}/missing.csv"), &target);

    assert_eq!(outcome, FetchOutcome::Failure(FetchFailure::NotFound));
    assert_eq!(FetchFailure::NotFound.to_string(), "not found");
    assert!(!target.exists());
}

#[test]
fn other_status_is_reported() {
    let base = http_server::start(vec![("/broken", Route::status(500))]);
    let temp = tempfile::tempdir().unwrap();
    let target = temp.path().join("broken.txt");

    let fetcher = HttpFetcher::new().unwrap();
    let outcome = fetcher.fetch(&format!("{base}/broken"), &target);

    assert_eq!(outcome, FetchOutcome::Failure(FetchFailure::Status(500)));
    assert!(!target.exists());
}

#[test]
fn connection_refused_is_transport_failure() {
    let temp = tempfile::tempdir().unwrap();
    let target = temp.path().join("gone.txt");

    let fetcher = HttpFetcher::new().unwrap();
    let outcome = fetcher.fetch(&http_server::dead_url(), &target);

    assert_matches!(outcome, FetchOutcome::Failure(FetchFailure::Transport(_)));
}

#[test]
fn unwritable_destination_is_write_failure() {
    let base = http_server::start(vec![("/ok", Route::ok(b"body"))]);
    let temp = tempfile::tempdir().unwrap();
    let target = temp.path().join("no-such-dir").join("ok.txt");

    let fetcher = HttpFetcher::new().unwrap();
    let outcome = fetcher.fetch(&format!("{base}/ok"), &target);

    assert_matches!(outcome, FetchOutcome::Failure(FetchFailure::Write(_)));
}
