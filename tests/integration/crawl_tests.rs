//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! extract -> dispatch -> summarize pipeline end-to-end.

use miles::config::{Config, CrawlRequest, FileTypeCatalog};
use miles::crawler::{crawl, download_url, extract_links, Coordinator, Dispatcher};
use miles::output::{ProgressReporter, SilentReporter, BYTES_PER_MEGABYTE};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Records every progress notice it receives
#[derive(Default)]
struct RecordingReporter {
    urls: Mutex<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn download_started(&self, url: &str) {
        self.urls.lock().unwrap().push(url.to_string());
    }
}

fn client() -> reqwest::Client {
    miles::crawler::build_http_client(&Default::default()).expect("Failed to build client")
}

/// Mounts a GET route returning `body` with the given status
async fn mount_bytes(server: &MockServer, route: &str, status: u16, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_bytes(body))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_two_jpg_crawl_end_to_end() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // One absolute link, one relative link
    mount_page(
        &mock_server,
        "/gallery/",
        format!(
            "<html><body>\n<img src=\"{}/static/absolute.jpg\">\n<img src=\"images/relative.jpg\">\n</body></html>",
            base_url
        ),
    )
    .await;
    mount_bytes(&mock_server, "/static/absolute.jpg", 200, vec![7u8; 40_000]).await;
    mount_bytes(&mock_server, "/gallery/images/relative.jpg", 200, vec![9u8; 13_696]).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let catalog = FileTypeCatalog::builtin();
    let request = CrawlRequest::new(
        &format!("{}/gallery/", base_url),
        &["jpg"],
        dir.path(),
        2,
        &catalog,
    )
    .expect("Invalid request");

    let reporter = Arc::new(RecordingReporter::default());
    let coordinator = Coordinator::new(&Config::default(), catalog)
        .expect("Failed to create coordinator")
        .with_reporter(reporter.clone());
    let summary = coordinator.run(&request).await.expect("Crawl failed");

    let expected_mb = (40_000 + 13_696) as f64 / BYTES_PER_MEGABYTE;
    assert_eq!(summary.files_downloaded, 2);
    assert!((summary.megabytes_downloaded - expected_mb).abs() < 0.01);
    assert!(summary.elapsed_seconds > 0.0);
    assert!(
        (summary.bandwidth_mbps - summary.megabytes_downloaded / summary.elapsed_seconds).abs()
            < 0.01
    );

    assert_eq!(
        std::fs::metadata(dir.path().join("absolute.jpg")).unwrap().len(),
        40_000
    );
    assert_eq!(
        std::fs::metadata(dir.path().join("relative.jpg")).unwrap().len(),
        13_696
    );

    let mut notices = reporter.urls.lock().unwrap().clone();
    notices.sort();
    assert_eq!(
        notices,
        vec![
            format!("{}/gallery/images/relative.jpg", base_url),
            format!("{}/static/absolute.jpg", base_url),
        ]
    );
}

#[tokio::test]
async fn test_empty_selection_scans_all_types() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        [
            "<img src=\"a.jpg\">",
            "<audio src=\"b.mp3\"></audio>",
            "<a href=\"c.pdf\">paper</a>",
            "<img src=\"d.png\">",
        ]
        .join("\n"),
    )
    .await;
    for (route, size) in [("/a.jpg", 10), ("/b.mp3", 20), ("/c.pdf", 30), ("/d.png", 40)] {
        mount_bytes(&mock_server, route, 200, vec![1u8; size]).await;
    }

    let dir = tempfile::tempdir().unwrap();
    let catalog = FileTypeCatalog::builtin();
    let request =
        CrawlRequest::new::<&str>(&format!("{}/", base_url), &[], dir.path(), 3, &catalog).unwrap();
    assert_eq!(request.file_types(), ["jpg", "mp3", "pdf", "png"]);

    let coordinator = Coordinator::new(&Config::default(), catalog)
        .unwrap()
        .with_reporter(Arc::new(SilentReporter));
    let summary = coordinator.run(&request).await.unwrap();

    assert_eq!(summary.files_downloaded, 4);
    assert!((summary.megabytes_downloaded - 100.0 / BYTES_PER_MEGABYTE).abs() < 1e-9);
}

#[tokio::test]
async fn test_page_without_matches() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        "<html><body><p>No files here</p><a href=\"/about\">About</a></body></html>".to_string(),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let catalog = FileTypeCatalog::builtin();
    let request =
        CrawlRequest::new(&format!("{}/", base_url), &["jpg"], dir.path(), 4, &catalog).unwrap();

    let summary = crawl(&Config::default(), catalog, &request).await.unwrap();

    assert_eq!(summary.files_downloaded, 0);
    assert_eq!(format!("{:.2}", summary.megabytes_downloaded), "0.00");
    assert!(summary.bandwidth_mbps.is_finite());
    assert_eq!(summary.bandwidth_mbps, 0.0);
}

#[tokio::test]
async fn test_failed_downloads_reduce_totals() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        "<a href=\"ok.pdf\">ok</a>\n<a href=\"missing.pdf\">missing</a>\n<a href=\"broken.pdf\">broken</a>"
            .to_string(),
    )
    .await;
    mount_bytes(&mock_server, "/ok.pdf", 200, b"%PDF-1.4".to_vec()).await;
    mount_bytes(&mock_server, "/broken.pdf", 500, Vec::new()).await;
    // /missing.pdf is not mounted: wiremock answers 404

    let dir = tempfile::tempdir().unwrap();
    let catalog = FileTypeCatalog::builtin();
    let request =
        CrawlRequest::new(&format!("{}/", base_url), &["pdf"], dir.path(), 2, &catalog).unwrap();

    let coordinator = Coordinator::new(&Config::default(), catalog)
        .unwrap()
        .with_reporter(Arc::new(SilentReporter));
    let summary = coordinator.run(&request).await.unwrap();

    assert_eq!(summary.files_downloaded, 1);
    assert!(dir.path().join("ok.pdf").exists());
    assert!(!dir.path().join("missing.pdf").exists());
    assert!(!dir.path().join("broken.pdf").exists());
}

#[tokio::test]
async fn test_extract_links_from_page_with_http_error() {
    let mock_server = MockServer::start().await;
    mount_bytes(&mock_server, "/", 503, b"<img src=\"a.jpg\">".to_vec()).await;

    let page = Url::parse(&format!("{}/", mock_server.uri())).unwrap();
    let links = extract_links(&client(), &page, &["jpg"], &FileTypeCatalog::builtin()).await;
    assert_eq!(links.count(), 0);
}

#[tokio::test]
async fn test_extract_links_unreachable_page() {
    // Start and drop a server so the port is known to be closed
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let page = Url::parse(&format!("{}/", uri)).unwrap();
    let links = extract_links(&client(), &page, &["jpg"], &FileTypeCatalog::builtin()).await;
    assert_eq!(links.count(), 0);
}

#[tokio::test]
async fn test_extract_links_yields_duplicates() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_page(
        &mock_server,
        "/",
        "<a href=\"same.png\"><img src=\"same.png\"></a>".to_string(),
    )
    .await;

    let page = Url::parse(&format!("{}/", base_url)).unwrap();
    let links: Vec<_> = extract_links(&client(), &page, &["png"], &FileTypeCatalog::builtin())
        .await
        .collect();

    let expected = format!("{}/same.png", base_url);
    assert_eq!(links, vec![expected.clone(), expected]);
}

#[tokio::test]
async fn test_download_writes_body() {
    let mock_server = MockServer::start().await;
    let body = b"ID3 not really an mp3".to_vec();
    mount_bytes(&mock_server, "/music/track.mp3", 200, body.clone()).await;

    let dir = tempfile::tempdir().unwrap();
    let url = format!("{}/music/track.mp3", mock_server.uri());
    let reporter = RecordingReporter::default();

    let path = download_url(&client(), &url, dir.path(), &reporter)
        .await
        .unwrap()
        .expect("Download should succeed");

    assert_eq!(path, dir.path().join("track.mp3"));
    assert_eq!(std::fs::read(&path).unwrap(), body);
    assert_eq!(*reporter.urls.lock().unwrap(), vec![url]);
}

#[tokio::test]
async fn test_download_overwrites_existing_file() {
    let mock_server = MockServer::start().await;
    mount_bytes(&mock_server, "/a.png", 200, vec![2u8; 5]).await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.png"), vec![0u8; 500]).unwrap();

    let url = format!("{}/a.png", mock_server.uri());
    let path = download_url(&client(), &url, dir.path(), &SilentReporter)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(std::fs::read(path).unwrap(), vec![2u8; 5]);
}

#[tokio::test]
async fn test_download_failure_creates_no_file() {
    let mock_server = MockServer::start().await;
    mount_bytes(&mock_server, "/gone.jpg", 404, b"not found".to_vec()).await;

    let dir = tempfile::tempdir().unwrap();
    let url = format!("{}/gone.jpg", mock_server.uri());
    let reporter = RecordingReporter::default();

    let result = download_url(&client(), &url, dir.path(), &reporter).await.unwrap();

    assert!(result.is_none());
    assert!(!dir.path().join("gone.jpg").exists());
    // The notice is emitted even when the fetch fails
    assert_eq!(reporter.urls.lock().unwrap().len(), 1);
}

/// Responds with a fixed body and counts the requests it has served
struct CountingResponder {
    served: Arc<AtomicUsize>,
    body: Vec<u8>,
}

impl Respond for CountingResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.served.fetch_add(1, Ordering::SeqCst);
        ResponseTemplate::new(200).set_body_bytes(self.body.clone())
    }
}

/// Notes how many requests the server had served when each notice arrived
struct RequestCountReporter {
    served: Arc<AtomicUsize>,
    seen_at_notice: Mutex<Vec<usize>>,
}

impl ProgressReporter for RequestCountReporter {
    fn download_started(&self, _url: &str) {
        self.seen_at_notice
            .lock()
            .unwrap()
            .push(self.served.load(Ordering::SeqCst));
    }
}

#[tokio::test]
async fn test_download_notice_precedes_request() {
    let mock_server = MockServer::start().await;
    let served = Arc::new(AtomicUsize::new(0));
    Mock::given(method("GET"))
        .and(path("/docs/manual.pdf"))
        .respond_with(CountingResponder {
            served: Arc::clone(&served),
            body: b"%PDF-1.4".to_vec(),
        })
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let url = format!("{}/docs/manual.pdf", mock_server.uri());
    let reporter = RequestCountReporter {
        served: Arc::clone(&served),
        seen_at_notice: Mutex::new(Vec::new()),
    };

    let path = download_url(&client(), &url, dir.path(), &reporter)
        .await
        .unwrap()
        .expect("Download should succeed");

    assert!(path.exists());
    assert_eq!(served.load(Ordering::SeqCst), 1);
    assert_eq!(*reporter.seen_at_notice.lock().unwrap(), vec![0]);
}

#[tokio::test]
async fn test_download_into_missing_directory_is_fatal() {
    let mock_server = MockServer::start().await;
    mount_bytes(&mock_server, "/a.jpg", 200, vec![1u8; 3]).await;

    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let url = format!("{}/a.jpg", mock_server.uri());

    let result = download_url(&client(), &url, &missing, &SilentReporter).await;
    assert!(matches!(result, Err(miles::CrawlError::Io(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_dispatch_preserves_input_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Earlier files answer more slowly, so completion order is reversed
    let count = 6;
    for i in 0..count {
        Mock::given(method("GET"))
            .and(path(format!("/files/{}.pdf", i)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![b'x'; i + 1])
                    .set_delay(Duration::from_millis(((count - i) * 40) as u64)),
            )
            .mount(&mock_server)
            .await;
    }

    let mut urls: Vec<String> = (0..count)
        .map(|i| format!("{}/files/{}.pdf", base_url, i))
        .collect();
    // A failing URL in the middle keeps its slot
    urls.insert(3, format!("{}/files/missing.pdf", base_url));

    for workers in [1, 2, count + 1] {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = Dispatcher::new(
            client(),
            NonZeroUsize::new(workers).unwrap(),
            Arc::new(SilentReporter),
        );

        let results = dispatcher
            .dispatch(urls.clone(), dir.path())
            .await
            .expect("Dispatch failed");

        assert_eq!(results.len(), urls.len(), "workers = {}", workers);
        assert!(results[3].is_none(), "workers = {}", workers);

        let present: Vec<_> = results
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 3)
            .map(|(_, r)| r.as_ref().expect("download should succeed"))
            .collect();
        for (i, path) in present.iter().enumerate() {
            assert_eq!(*path, &dir.path().join(format!("{}.pdf", i)));
            assert_eq!(std::fs::metadata(path).unwrap().len(), (i + 1) as u64);
        }
    }
}

#[tokio::test]
async fn test_catalog_extension_from_config() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        "<img src=\"logo.svg\">\n<img src=\"photo.jpg\">".to_string(),
    )
    .await;
    mount_bytes(&mock_server, "/logo.svg", 200, b"<svg/>".to_vec()).await;
    mount_bytes(&mock_server, "/photo.jpg", 200, vec![0u8; 8]).await;

    let config = miles::config::parse_config(
        r#"
[file-types]
svg = ['<img.*src="?([^" ]+.svg)']
"#,
    )
    .unwrap();
    let catalog = FileTypeCatalog::with_extensions(&config.file_types).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let request =
        CrawlRequest::new(&format!("{}/", base_url), &["svg"], dir.path(), 1, &catalog).unwrap();

    let coordinator = Coordinator::new(&config, catalog)
        .unwrap()
        .with_reporter(Arc::new(SilentReporter));
    let summary = coordinator.run(&request).await.unwrap();

    assert_eq!(summary.files_downloaded, 1);
    assert!(dir.path().join("logo.svg").exists());
    assert!(!dir.path().join("photo.jpg").exists());
}
