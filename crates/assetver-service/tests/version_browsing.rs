//! End-to-end browsing of an asset: reconcile, filter, page, view, download.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use assetver_core::config::pagination::PaginationConfig;
use assetver_core::types::page_count;
use assetver_entity::asset::{Asset, AssetRef};
use assetver_entity::download::{DownloadEvent, DownloadStatus};
use assetver_entity::file::{FileState, ManifestEntry};
use assetver_entity::version::AssetVersion;
use assetver_service::file::{filter_files, format_file_size};
use assetver_service::{DownloadService, Reconciler, VersionCatalog, VersionSession};
use assetver_storage::catalog::{CatalogDocument, CatalogStore, ManifestRecord};
use assetver_storage::fetch::FileFetcher;
use assetver_storage::providers::LocalBlobStore;

struct World {
    _dir: tempfile::TempDir,
    out: std::path::PathBuf,
    session: VersionSession,
}

fn entry(key: &str, version_id: &str, size: u64) -> ManifestEntry {
    ManifestEntry {
        relative_key: key.to_string(),
        version_id: version_id.to_string(),
        size: Some(size),
        last_modified: Some("2024-06-01T12:00:00Z".to_string()),
        etag: None,
        is_archived: false,
    }
}

async fn world() -> World {
    let dir = tempfile::tempdir().unwrap();
    let blobs = LocalBlobStore::new(dir.path().join("blobs").to_str().unwrap(), 900)
        .await
        .unwrap();

    blobs
        .write_version("site/Docs/readme.txt", "r1", Bytes::from(vec![b'r'; 2048]))
        .await
        .unwrap();
    blobs
        .write_version("site/scan.e57", "s1", Bytes::from(vec![b's'; 4096]))
        .await
        .unwrap();
    blobs
        .write_version("site/photo.png", "p1", Bytes::from(vec![b'p'; 100]))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    blobs.write_delete_marker("site/photo.png", "pm").await.unwrap();

    let mut large = Vec::new();
    for i in 0..101 {
        let key = format!("tiles/t{i:03}.bin");
        blobs
            .write_version(&format!("site/{key}"), "t", Bytes::from_static(b"t"))
            .await
            .unwrap();
        large.push(entry(&key, "t", 1));
    }

    let version = |id: &str| AssetVersion {
        asset_id: "site".to_string(),
        version: id.to_string(),
        date_created: "2024-06-01T12:00:00Z".to_string(),
        comment: Some(format!("v{id}")),
        description: None,
        created_by: "surveyor".to_string(),
        is_current: id == "2",
    };

    let store = CatalogStore::from_document(CatalogDocument {
        assets: vec![Asset {
            database_id: "geo".to_string(),
            asset_id: "site".to_string(),
            asset_name: "Survey site".to_string(),
            base_key: "site/".to_string(),
            is_distributable: true,
            current_version_id: Some("2".to_string()),
        }],
        versions: vec![version("1"), version("2")],
        manifests: vec![
            ManifestRecord {
                asset_id: "site".to_string(),
                asset_version_id: "1".to_string(),
                files: vec![
                    entry("Docs/readme.txt", "r1", 2048),
                    entry("scan.e57", "s1", 4096),
                    entry("photo.png", "p1", 100),
                    entry("old/lost.obj", "gone", 1536),
                ],
            },
            ManifestRecord {
                asset_id: "site".to_string(),
                asset_version_id: "2".to_string(),
                files: large,
            },
        ],
        ..Default::default()
    });

    let blobs = Arc::new(blobs);
    let out = dir.path().join("downloads");
    let session = VersionSession::open(
        VersionCatalog::new(
            Arc::new(store),
            Reconciler::new(blobs.clone()),
            blobs.clone(),
            100,
        ),
        DownloadService::new(blobs, Arc::new(FileFetcher), &out, 2),
        &AssetRef::new("geo", "site"),
        &PaginationConfig::default(),
    )
    .await
    .unwrap();

    World {
        _dir: dir,
        out,
        session,
    }
}

#[tokio::test]
async fn test_effective_states_and_actions() {
    let mut w = world().await;
    let details = w.session.select_version("1").await.unwrap().clone();

    let lost = details.file("old/lost.obj").unwrap();
    assert_eq!(lost.effective_state(), FileState::PermanentlyDeleted);
    assert!(!lost.actions_enabled());
    assert!(w.session.view_file("old/lost.obj").is_err());

    let photo = details.file("photo.png").unwrap();
    assert_eq!(photo.effective_state(), FileState::LatestArchived);
    assert!(w.session.view_file("photo.png").is_ok());

    assert_eq!(format_file_size(lost.size), "1.50 KB");
}

#[tokio::test]
async fn test_filter_identity_and_case() {
    let mut w = world().await;
    let files = w.session.select_version("1").await.unwrap().files.clone();

    assert_eq!(filter_files(&files, ""), files);
    let hits = filter_files(&files, "DOCS");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].relative_key, "Docs/readme.txt");
}

#[tokio::test]
async fn test_hundred_and_one_files_make_six_pages() {
    let mut w = world().await;
    w.session.select_version("2").await.unwrap();
    assert_eq!(page_count(101, 20), 6);

    w.session.set_page(6);
    let page = w.session.visible_page();
    assert_eq!((page.page, page.total_pages, page.items.len()), (6, 6, 1));

    w.session.set_filter_text("t10");
    let filtered = w.session.visible_page();
    assert_eq!(filtered.page, 1);
    assert_eq!(filtered.total_items, 1);
}

#[tokio::test]
async fn test_reselect_resets_filter_and_page() {
    let mut w = world().await;
    w.session.select_version("2").await.unwrap();
    w.session.set_filter_text("tiles");
    w.session.set_page(4);

    w.session.select_version("1").await.unwrap();
    assert_eq!(w.session.filter_text(), "");
    assert_eq!(w.session.visible_page().page, 1);
    assert_eq!(w.session.visible_page().total_items, 4);
}

#[tokio::test]
async fn test_concurrent_downloads_complete_independently() {
    let mut w = world().await;
    w.session.select_version("1").await.unwrap();

    assert!(w.session.download("old/lost.obj").is_err());

    let readme = w.session.download("Docs/readme.txt").unwrap();
    let scan = w.session.download("scan.e57").unwrap();
    let (readme, scan) = tokio::join!(readme.finish(), scan.finish());

    assert!(matches!(readme, DownloadEvent::Complete { bytes: 2048, .. }));
    assert!(matches!(scan, DownloadEvent::Complete { bytes: 4096, .. }));

    let readme_progress = w.session.download_progress("Docs/readme.txt").unwrap();
    let scan_progress = w.session.download_progress("scan.e57").unwrap();
    assert_eq!(readme_progress.status, DownloadStatus::Complete);
    assert_eq!(readme_progress.bytes_loaded, 2048);
    assert_eq!(scan_progress.bytes_loaded, 4096);
    assert_eq!(scan_progress.percent, 100);

    assert_eq!(std::fs::read(w.out.join("readme.txt")).unwrap().len(), 2048);
    assert_eq!(std::fs::read(w.out.join("scan.e57")).unwrap().len(), 4096);
}
