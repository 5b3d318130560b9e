//! End-to-end mirror runs against a wiremock-backed serve instance.

mod support;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serve_clone::{
    FileEntry, Mirror, MirrorConfig, MirrorError, NoProgress, ProgressObserver, ScrapeError,
    TransferOutcome, TransferStatus, mirror,
};
use support::socket_guard::{socket_skip_return, start_mock_server_or_skip};
use support::{Item, mount_example_tree, mount_file, mount_listing};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

/// Tracks how many transfers hold a pool slot at once.
#[derive(Default)]
struct ActiveTracker {
    active: AtomicUsize,
    peak: AtomicUsize,
    completed: AtomicUsize,
}

impl ProgressObserver for ActiveTracker {
    fn on_transfer_start(&self, _entry: &FileEntry) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn on_transfer_complete(&self, completed: usize, _outcome: &TransferOutcome) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_max(completed, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_mirror_example_tree_downloads_everything() {
    let Some(server) = start_mock_server_or_skip().await else {
        return socket_skip_return();
    };
    mount_example_tree(&server, 1, 1).await;

    let temp_dir = TempDir::new().unwrap();
    let base_dir = temp_dir.path().join("files");
    let config = MirrorConfig::new(server.uri(), &base_dir);
    let run = mirror(&config, Arc::new(NoProgress)).await.unwrap();

    assert_eq!(run.report.downloaded, 2);
    assert_eq!(run.report.already_present, 0);
    assert_eq!(run.report.failed, 0);
    assert_eq!(
        std::fs::read(base_dir.join("a").join("x.txt")).unwrap(),
        b"x contents"
    );
    assert_eq!(
        std::fs::read(base_dir.join("root.txt")).unwrap(),
        b"root contents"
    );
}

#[tokio::test]
async fn test_mirror_skips_preexisting_file() {
    let Some(server) = start_mock_server_or_skip().await else {
        return socket_skip_return();
    };
    mount_example_tree(&server, 1, 0).await;

    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("root.txt"), b"local copy").unwrap();

    let config = MirrorConfig::new(server.uri(), temp_dir.path());
    let run = mirror(&config, Arc::new(NoProgress)).await.unwrap();

    assert_eq!(run.report.downloaded, 1);
    assert_eq!(run.report.already_present, 1);
    assert_eq!(run.report.failed, 0);
    assert_eq!(
        std::fs::read(temp_dir.path().join("root.txt")).unwrap(),
        b"local copy",
        "existing files are never overwritten"
    );
}

#[tokio::test]
async fn test_mirror_second_run_is_noop() {
    let Some(server) = start_mock_server_or_skip().await else {
        return socket_skip_return();
    };
    // Each file is fetched once across both runs.
    mount_example_tree(&server, 1, 1).await;

    let temp_dir = TempDir::new().unwrap();
    let config = MirrorConfig::new(server.uri(), temp_dir.path());

    let first = mirror(&config, Arc::new(NoProgress)).await.unwrap();
    assert_eq!(first.report.downloaded, 2);

    let second = mirror(&config, Arc::new(NoProgress)).await.unwrap();
    assert_eq!(second.report.downloaded, 0);
    assert_eq!(second.report.already_present, 2);
    assert!(!second.report.has_failures());
}

#[tokio::test]
async fn test_mirror_isolates_single_failure() {
    let Some(server) = start_mock_server_or_skip().await else {
        return socket_skip_return();
    };
    let names = ["f0.txt", "f1.txt", "broken.txt", "f3.txt", "f4.txt"];
    let items: Vec<Item<'_>> = names.iter().map(|name| Item::File(name)).collect();
    mount_listing(&server, "/", &items).await;
    for name in names.iter().filter(|name| **name != "broken.txt") {
        mount_file(&server, &format!("/{name}"), name.as_bytes(), 1).await;
    }
    Mock::given(method("GET"))
        .and(path("/broken.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = MirrorConfig::new(server.uri(), temp_dir.path()).with_concurrency(2);
    let run = mirror(&config, Arc::new(NoProgress)).await.unwrap();

    assert_eq!(run.report.downloaded, 4);
    assert_eq!(run.report.failed, 1);
    assert_eq!(run.report.errors.len(), 1);
    assert!(run.report.errors[0].starts_with("Failed to download - "));
    assert!(run.report.errors[0].contains("/broken.txt"));
    assert!(
        !temp_dir.path().join("broken.txt").exists(),
        "failed transfer must not leave a file behind"
    );
    assert_eq!(run.outcomes[2].status, TransferStatus::Failed);
}

#[tokio::test]
async fn test_mirror_outcome_count_matches_manifest() {
    let Some(server) = start_mock_server_or_skip().await else {
        return socket_skip_return();
    };
    mount_listing(&server, "/", &[Item::Folder("docs"), Item::File("gone.txt")]).await;
    mount_listing(&server, "/docs/", &[Item::File("a.md"), Item::File("b.md")]).await;
    mount_file(&server, "/docs/a.md", b"a", 1).await;
    mount_file(&server, "/docs/b.md", b"b", 1).await;
    Mock::given(method("GET"))
        .and(path("/gone.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = MirrorConfig::new(server.uri(), temp_dir.path());
    let run = mirror(&config, Arc::new(NoProgress)).await.unwrap();

    assert_eq!(run.manifest.files.len(), 3);
    assert_eq!(run.outcomes.len(), run.manifest.files.len());
    assert_eq!(run.report.total(), run.manifest.files.len());
    let entries: Vec<_> = run.outcomes.iter().map(|o| o.entry.clone()).collect();
    assert_eq!(entries, run.manifest.files);
}

#[tokio::test]
async fn test_mirror_respects_concurrency_bound() {
    let Some(server) = start_mock_server_or_skip().await else {
        return socket_skip_return();
    };
    let names: Vec<String> = (0..8).map(|i| format!("slow{i}.bin")).collect();
    let items: Vec<Item<'_>> = names.iter().map(|name| Item::File(name)).collect();
    mount_listing(&server, "/", &items).await;
    for name in &names {
        Mock::given(method("GET"))
            .and(path(format!("/{name}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"payload".to_vec())
                    .set_delay(Duration::from_millis(50)),
            )
            .mount(&server)
            .await;
    }

    for limit in [1, 3] {
        let temp_dir = TempDir::new().unwrap();
        let tracker = Arc::new(ActiveTracker::default());
        let observer: Arc<dyn ProgressObserver> = tracker.clone();
        let config = MirrorConfig::new(server.uri(), temp_dir.path()).with_concurrency(limit);

        let run = mirror(&config, observer).await.unwrap();

        assert_eq!(run.report.downloaded, names.len());
        let peak = tracker.peak.load(Ordering::SeqCst);
        assert!(peak >= 1);
        assert!(peak <= limit, "peak {peak} exceeded limit {limit}");
        assert_eq!(tracker.completed.load(Ordering::SeqCst), names.len());
        assert_eq!(tracker.active.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn test_mirror_nested_listing_failure_aborts_before_downloads() {
    let Some(server) = start_mock_server_or_skip().await else {
        return socket_skip_return();
    };
    mount_listing(&server, "/", &[Item::File("root.txt"), Item::Folder("a")]).await;
    Mock::given(method("GET"))
        .and(path("/a/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_file(&server, "/root.txt", b"never fetched", 0).await;

    let temp_dir = TempDir::new().unwrap();
    let base_dir = temp_dir.path().join("out");
    let config = MirrorConfig::new(server.uri(), &base_dir);
    let result = mirror(&config, Arc::new(NoProgress)).await;

    match result {
        Err(MirrorError::Scrape(ScrapeError::Listing { path, .. })) => {
            assert_eq!(path.to_string(), "/a");
        }
        other => panic!("Expected scrape failure, got: {other:?}"),
    }
    assert!(!base_dir.exists());
}

#[tokio::test]
async fn test_mirror_scrape_is_deterministic() {
    let Some(server) = start_mock_server_or_skip().await else {
        return socket_skip_return();
    };
    mount_listing(
        &server,
        "/",
        &[Item::Folder("b"), Item::File("z.txt"), Item::Folder("a")],
    )
    .await;
    mount_listing(&server, "/b/", &[Item::File("1.txt")]).await;
    mount_listing(&server, "/a/", &[]).await;
    // Every file already exists locally, so no file request is made.
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir_all(temp_dir.path().join("b")).unwrap();
    std::fs::write(temp_dir.path().join("b").join("1.txt"), b"1").unwrap();
    std::fs::write(temp_dir.path().join("z.txt"), b"z").unwrap();

    let config = MirrorConfig::new(server.uri(), temp_dir.path());
    let prepared = Mirror::prepare(&config).await.unwrap();
    let first = prepared.run(Arc::new(NoProgress)).await.unwrap();
    let second = prepared.run(Arc::new(NoProgress)).await.unwrap();

    assert_eq!(first.manifest, second.manifest);
    let folders: Vec<_> = first.manifest.folders.iter().map(ToString::to_string).collect();
    assert_eq!(folders, ["/b", "/a"]);
    let files: Vec<_> = first.manifest.files.iter().map(FileEntry::name).collect();
    assert_eq!(files, ["1.txt", "z.txt"]);
}

#[tokio::test]
async fn test_mirror_percent_encodes_names() {
    let Some(server) = start_mock_server_or_skip().await else {
        return socket_skip_return();
    };
    mount_listing(&server, "/", &[Item::Folder("my docs")]).await;
    mount_listing(&server, "/my%20docs/", &[Item::File("report #1.txt")]).await;
    mount_file(&server, "/my%20docs/report%20%231.txt", b"encoded", 1).await;

    let temp_dir = TempDir::new().unwrap();
    let config = MirrorConfig::new(server.uri(), temp_dir.path());
    let run = mirror(&config, Arc::new(NoProgress)).await.unwrap();

    assert_eq!(run.report.downloaded, 1, "errors: {:?}", run.report.errors);
    assert_eq!(
        std::fs::read(temp_dir.path().join("my docs").join("report #1.txt")).unwrap(),
        b"encoded"
    );
}
