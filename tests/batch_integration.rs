//! Integration tests for the batch pipeline against mock HTTP servers.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use channel_puller::backoff::BackoffConfig;
use channel_puller::batch::BatchProcessor;
use channel_puller::fetch::{FetchConfig, HttpTransport, RetryingFetcher};
use channel_puller::input::{NOT_YOUTUBE_URL, WorkItem};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::fixtures::{VIDEO_PAGE, VIDEO_PAGE_CHANNEL, VIDEO_PAGE_TITLE};
use support::socket_guard::start_mock_server_or_skip;

fn processor(timeout: Duration, max_retries: u32) -> BatchProcessor {
    let transport = Arc::new(HttpTransport::new().unwrap());
    let config = FetchConfig {
        timeout,
        backoff: BackoffConfig::fixed(Duration::ZERO, max_retries),
    };
    BatchProcessor::new(RetryingFetcher::new(transport, config))
}

fn data_lines(path: &std::path::Path) -> Vec<String> {
    let content = fs::read_to_string(path).unwrap();
    assert!(content.starts_with('\u{feff}'), "missing BOM");
    content.lines().skip(1).map(ToString::to_string).collect()
}

#[tokio::test]
async fn test_batch_extracts_channel_from_page() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/watch"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(VIDEO_PAGE.to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = format!("{}/watch", mock_server.uri());
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("channels.csv");

    let report = processor(Duration::from_secs(5), 2)
        .process_to_file(&[WorkItem::valid(&source)], &dest, &())
        .await
        .unwrap();

    assert_eq!(report.stats.succeeded(), 1);
    assert_eq!(
        data_lines(&dest),
        vec![format!("{source},{VIDEO_PAGE_CHANNEL},\"{VIDEO_PAGE_TITLE}\",")]
    );
}

#[tokio::test]
async fn test_batch_mixes_invalid_failed_and_successful_rows() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(VIDEO_PAGE.to_vec()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ok = format!("{}/ok", mock_server.uri());
    let broken = format!("{}/broken", mock_server.uri());
    let items = vec![
        WorkItem::invalid("https://vimeo.com/1", NOT_YOUTUBE_URL),
        WorkItem::valid(&broken),
        WorkItem::valid(&ok),
    ];
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("channels.csv");

    let report = processor(Duration::from_secs(5), 3)
        .process_to_file(&items, &dest, &())
        .await
        .unwrap();

    assert_eq!(report.stats.invalid(), 1);
    assert_eq!(report.stats.failed(), 1);
    assert_eq!(report.stats.succeeded(), 1);
    assert_eq!(report.stats.retried(), 0);

    let lines = data_lines(&dest);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "https://vimeo.com/1,,,Not YouTube URL");
    assert_eq!(lines[1], format!("{broken},,,HTTP 500 fetching {broken}"));
    assert!(lines[2].starts_with(&format!("{ok},{VIDEO_PAGE_CHANNEL},")));
}

#[tokio::test]
async fn test_batch_slow_page_exhausts_retries() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(VIDEO_PAGE.to_vec())
                .set_delay(Duration::from_secs(3)),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let source = format!("{}/slow", mock_server.uri());
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("channels.csv");

    let report = processor(Duration::from_millis(300), 1)
        .process_to_file(&[WorkItem::valid(&source)], &dest, &())
        .await
        .unwrap();

    assert_eq!(report.stats.failed(), 1);
    assert_eq!(report.stats.retried(), 1);
    let lines = data_lines(&dest);
    assert!(
        lines[0].starts_with(&format!("{source},,,retry limit exceeded after 2 attempts")),
        "got {lines:?}"
    );
}

#[tokio::test]
async fn test_batch_failure_to_stage_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("missing").join("channels.csv");

    let err = processor(Duration::from_secs(1), 0)
        .process_to_file(&[WorkItem::invalid("x", "invalid input")], &dest, &())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("cannot create staging file"));
    assert!(!dest.exists());
}
