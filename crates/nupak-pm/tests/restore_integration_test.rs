/// Integration tests for the restore pipeline
///
/// These tests drive the fetch-and-materialize flow end to end against a
/// local mock feed: cache freshness behavior, failure handling around the
/// atomic cache replace, and the materialized package layout.

use std::io::{Cursor, Write};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncReadExt;

use nupak_pm::installer::verify_file_sha512;
use nupak_pm::{
    cache_file_path, ContentFetcher, MemoryReport, PackageIdentity, PackageInstaller,
    PackageMaterializer, RemotePackageSource, RestoreError, SourceConfig,
};

use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn package_bytes() -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("Foo.nuspec", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"<package id=\"Foo\"/>").unwrap();
    writer
        .start_file("lib/net6.0/Foo.dll", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"assembly bytes").unwrap();
    writer.finish().unwrap().into_inner()
}

async fn mock_feed_fetcher(cache_root: &std::path::Path) -> (MockServer, ContentFetcher) {
    let server = MockServer::start().await;
    let source = SourceConfig::new(&format!("{}/feed/", server.uri())).unwrap();
    let fetcher =
        ContentFetcher::new(source, cache_root, Arc::new(MemoryReport::new())).unwrap();
    (server, fetcher)
}

async fn read_to_string(mut file: tokio::fs::File) -> String {
    let mut body = String::new();
    file.read_to_string(&mut body).await.unwrap();
    body
}

// ============ Fetch / cache freshness ============

#[tokio::test]
async fn test_fresh_entry_is_served_without_network() {
    let cache = TempDir::new().unwrap();
    let (server, fetcher) = mock_feed_fetcher(cache.path()).await;

    let entry = cache_file_path(
        cache.path(),
        fetcher.source().base_address().as_str(),
        "resource",
    );
    std::fs::create_dir_all(entry.parent().unwrap()).unwrap();
    std::fs::write(&entry, b"cached payload").unwrap();

    let url = format!("{}/feed/resource", server.uri());
    let result = fetcher
        .fetch(&url, "resource", Duration::from_secs(3600))
        .await
        .unwrap();

    assert_eq!(read_to_string(result.body).await, "cached payload");
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_stale_entry_is_refetched() {
    let cache = TempDir::new().unwrap();
    let (server, fetcher) = mock_feed_fetcher(cache.path()).await;

    Mock::given(method("GET"))
        .and(path("/feed/resource"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fresh payload".to_vec()))
        .mount(&server)
        .await;

    let entry = cache_file_path(
        cache.path(),
        fetcher.source().base_address().as_str(),
        "resource",
    );
    std::fs::create_dir_all(entry.parent().unwrap()).unwrap();
    std::fs::write(&entry, b"stale payload").unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let url = format!("{}/feed/resource", server.uri());
    let result = fetcher
        .fetch(&url, "resource", Duration::from_millis(10))
        .await
        .unwrap();

    assert_eq!(read_to_string(result.body).await, "fresh payload");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);

    // The refreshed entry replaced the stale one in place.
    assert_eq!(std::fs::read(&entry).unwrap(), b"fresh payload");
}

#[tokio::test]
async fn test_zero_age_never_persists_into_cache() {
    let cache = TempDir::new().unwrap();
    let (server, fetcher) = mock_feed_fetcher(cache.path()).await;

    Mock::given(method("GET"))
        .and(path("/feed/resource"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"direct payload".to_vec()))
        .mount(&server)
        .await;

    let url = format!("{}/feed/resource", server.uri());
    for _ in 0..2 {
        let result = fetcher.fetch(&url, "resource", Duration::ZERO).await.unwrap();
        assert_eq!(read_to_string(result.body).await, "direct payload");
        assert!(!result.cache_file.starts_with(cache.path()));
        let _ = std::fs::remove_file(&result.cache_file);
    }

    // Every zero-age fetch is a full network round trip.
    assert_eq!(server.received_requests().await.unwrap().len(), 2);

    // Nothing was written under the shared cache root.
    assert_eq!(std::fs::read_dir(cache.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_failed_download_preserves_existing_entry() {
    let cache = TempDir::new().unwrap();
    let (server, fetcher) = mock_feed_fetcher(cache.path()).await;

    Mock::given(method("GET"))
        .and(path("/feed/resource"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let entry = cache_file_path(
        cache.path(),
        fetcher.source().base_address().as_str(),
        "resource",
    );
    std::fs::create_dir_all(entry.parent().unwrap()).unwrap();
    std::fs::write(&entry, b"previous payload").unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let url = format!("{}/feed/resource", server.uri());
    let result = fetcher
        .fetch(&url, "resource", Duration::from_millis(10))
        .await;

    match result {
        Err(RestoreError::HttpStatus { status, .. }) => assert_eq!(status, 500),
        other => panic!("expected HttpStatus error, got {:?}", other.map(|r| r.cache_file)),
    }

    // The failed attempt never replaced the previous entry.
    assert_eq!(std::fs::read(&entry).unwrap(), b"previous payload");
}

// ============ End-to-end restore ============

#[tokio::test]
async fn test_restore_materializes_package_with_sidecar() {
    let cache = TempDir::new().unwrap();
    let store = TempDir::new().unwrap();
    let (server, fetcher) = mock_feed_fetcher(cache.path()).await;

    Mock::given(method("GET"))
        .and(path("/feed/foo/1.0.0/foo.1.0.0.nupkg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(package_bytes()))
        .mount(&server)
        .await;

    let provider = Arc::new(RemotePackageSource::new(fetcher, Duration::from_secs(3600)));
    let report = Arc::new(MemoryReport::new());
    let installer = PackageInstaller::new(
        provider,
        PackageMaterializer::new(report.clone()),
        store.path(),
    );

    let outcome = installer.install("Foo", "1.0.0", false).await.unwrap();
    assert!(!outcome.is_skipped());

    let target = store.path().join("Foo.1.0.0");
    assert_eq!(outcome.path(), target);
    assert!(target.join("Foo.nuspec").exists());
    assert!(target.join("lib/net6.0/Foo.dll").exists());

    let raw_copy = target.join("Foo.1.0.0.nupkg");
    assert_eq!(std::fs::read(&raw_copy).unwrap(), package_bytes());

    let sidecar = std::fs::read_to_string(target.join("Foo.1.0.0.nupkg.sha512")).unwrap();
    assert!(verify_file_sha512(&raw_copy, &sidecar).unwrap());

    // Second install without overwrite is a skip, served from cache.
    let outcome = installer.install("Foo", "1.0.0", false).await.unwrap();
    assert!(outcome.is_skipped());
    assert!(installer.is_materialized(&PackageIdentity::new("Foo", "1.0.0")));

    // The archive was downloaded exactly once; the second resolve was a
    // cache hit and materialization skipped before touching the content.
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_restore_overwrite_replaces_previous_contents() {
    let cache = TempDir::new().unwrap();
    let store = TempDir::new().unwrap();
    let (server, fetcher) = mock_feed_fetcher(cache.path()).await;

    Mock::given(method("GET"))
        .and(path("/feed/foo/1.0.0/foo.1.0.0.nupkg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(package_bytes()))
        .mount(&server)
        .await;

    let provider = Arc::new(RemotePackageSource::new(fetcher, Duration::from_secs(3600)));
    let installer = PackageInstaller::new(
        provider,
        PackageMaterializer::new(Arc::new(MemoryReport::new())),
        store.path(),
    );

    installer.install("Foo", "1.0.0", false).await.unwrap();

    let stale = store.path().join("Foo.1.0.0/leftover.txt");
    std::fs::write(&stale, b"stale").unwrap();

    let outcome = installer.install("Foo", "1.0.0", true).await.unwrap();
    assert!(!outcome.is_skipped());
    assert!(!stale.exists());
    assert!(store.path().join("Foo.1.0.0/Foo.nuspec").exists());
}
