//! End-to-end flows: drop files on disk, then rearrange the board.

use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dropboard_core::pipeline::append_as_completed;
use dropboard_core::{
    BoardError, Config, DragSession, Dropboard, FileDiscovery, FileHandle, ImageRecord,
    IngestError, IngestEvent, IngestResult, ReorderError,
};
use image::{DynamicImage, ImageFormat};

fn write_image(dir: &Path, name: &str, format: ImageFormat, size: u32) -> PathBuf {
    let path = dir.join(name);
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::new_rgb8(size, size)
        .write_to(&mut buffer, format)
        .unwrap();
    std::fs::write(&path, buffer.into_inner()).unwrap();
    path
}

fn quick_config() -> Config {
    let mut config = Config::default();
    config.thumbnail.enabled = false;
    config
}

async fn names(board: &Dropboard) -> Vec<String> {
    board
        .snapshot()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.file_name)
        .collect()
}

#[tokio::test]
async fn drop_directory_appends_one_record_per_decodable_file() {
    let dir = tempfile::tempdir().unwrap();
    write_image(dir.path(), "a.png", ImageFormat::Png, 8);
    write_image(dir.path(), "b.jpg", ImageFormat::Jpeg, 8);
    write_image(dir.path(), "c.bmp", ImageFormat::Bmp, 8);
    std::fs::write(dir.path().join("broken.png"), b"\x89PNG\r\n\x1a\nnot really").unwrap();
    std::fs::write(dir.path().join("readme.txt"), b"not an image").unwrap();

    let board = Dropboard::new(quick_config());
    let handles = FileDiscovery::new().discover(&[dir.path().to_path_buf()]);
    assert_eq!(handles.len(), 5);

    let report = board.drop_files(handles).await.unwrap();

    assert_eq!(report.rejected, ["readme.txt"]);
    assert_eq!(report.submitted, 4);
    assert_eq!(report.failed, 1);
    assert_eq!(report.appended_count(), 3);

    let snapshot = board.snapshot().await.unwrap();
    assert_eq!(snapshot.len(), 3);
    let ids: HashSet<_> = snapshot.iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), 3);

    let media_types: HashSet<_> = snapshot
        .iter()
        .map(|r| r.content.media_type.as_str())
        .collect();
    assert_eq!(
        media_types,
        HashSet::from(["image/png", "image/jpeg", "image/bmp"])
    );
    for record in &snapshot {
        let prefix = format!("data:{};base64,", record.content.media_type);
        assert!(record.content.data_uri.starts_with(&prefix));
    }
}

#[tokio::test]
async fn corrupt_file_beside_valid_file_yields_exactly_one_record() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_image(dir.path(), "good.png", ImageFormat::Png, 4);
    let bad = dir.path().join("bad.png");
    std::fs::write(&bad, [0u8; 64]).unwrap();

    let board = Dropboard::new(quick_config());
    let mut failures = Vec::new();
    let report = board
        .drop_files_with(
            vec![FileHandle::from_path(bad), FileHandle::from_path(good)],
            |event| {
                if let IngestEvent::Failed { name, .. } = event {
                    failures.push(name.clone());
                }
            },
        )
        .await
        .unwrap();

    assert_eq!(report.appended_count(), 1);
    assert_eq!(failures, ["bad.png"]);
    assert_eq!(names(&board).await, ["good.png"]);
}

#[tokio::test]
async fn ids_stay_unique_across_batches() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_image(dir.path(), "same.png", ImageFormat::Png, 4);

    let board = Dropboard::new(quick_config());
    for _ in 0..3 {
        board
            .drop_files(vec![FileHandle::from_path(&path)])
            .await
            .unwrap();
    }

    let order = board.order().await.unwrap();
    assert_eq!(order.len(), 3);
    assert_eq!(order.iter().collect::<HashSet<_>>().len(), 3);

    // Same bytes, same hash, different identity.
    let snapshot = board.snapshot().await.unwrap();
    assert!(snapshot
        .windows(2)
        .all(|w| w[0].content.content_hash == w[1].content.content_hash));
}

#[tokio::test]
async fn slow_decode_lands_after_fast_decode() {
    let board = Dropboard::new(quick_config());
    let record = |name: &str| {
        let content = dropboard_core::ImageContent {
            data_uri: format!("data:image/png;base64,{name}"),
            media_type: "image/png".to_string(),
            width: Some(1),
            height: Some(1),
            byte_len: 1,
            content_hash: name.to_string(),
            thumbnail: None,
        };
        ImageRecord::new(name, content)
    };
    let f1 = record("F1");
    let f2 = record("F2");
    let units = vec![(f1, Duration::from_millis(100)), (f2, Duration::ZERO)]
        .into_iter()
        .map(|(record, latency)| async move {
            tokio::time::sleep(latency).await;
            let result: IngestResult<ImageRecord> = Ok(record);
            (String::new(), result)
        });

    append_as_completed(units, 2, &board.handle(), |_| {})
        .await
        .unwrap();

    assert_eq!(names(&board).await, ["F2", "F1"]);
}

#[tokio::test]
async fn moves_follow_single_element_semantics() {
    let dir = tempfile::tempdir().unwrap();
    let mut handles = Vec::new();
    for name in ["A.png", "B.png", "C.png", "D.png"] {
        handles.push(FileHandle::from_path(write_image(
            dir.path(),
            name,
            ImageFormat::Png,
            2,
        )));
    }

    let mut config = quick_config();
    config.ingest.max_concurrent_decodes = 1;
    let board = Dropboard::new(config);
    board.drop_files(handles).await.unwrap();
    assert_eq!(names(&board).await, ["A.png", "B.png", "C.png", "D.png"]);

    board.move_image(2, 0).await.unwrap();
    assert_eq!(names(&board).await, ["C.png", "A.png", "B.png", "D.png"]);

    board.move_image(0, 3).await.unwrap();
    assert_eq!(names(&board).await, ["A.png", "B.png", "D.png", "C.png"]);

    assert!(!board.move_image(1, 1).await.unwrap());

    let err = board.move_image(4, 0).await.unwrap_err();
    assert!(matches!(
        err,
        BoardError::Reorder(ReorderError::OutOfRange { index: 4, len: 4 })
    ));
    assert_eq!(names(&board).await, ["A.png", "B.png", "D.png", "C.png"]);
}

#[tokio::test]
async fn drag_across_board_moves_one_item() {
    let dir = tempfile::tempdir().unwrap();
    let handles: Vec<_> = ["A.png", "B.png", "C.png"]
        .into_iter()
        .map(|name| FileHandle::from_path(write_image(dir.path(), name, ImageFormat::Png, 2)))
        .collect();

    let mut config = quick_config();
    config.ingest.max_concurrent_decodes = 1;
    let board = Dropboard::new(config);
    board.drop_files(handles).await.unwrap();
    let id_a = board.order().await.unwrap()[0];

    let mut drag = DragSession::start(0);
    for hover in [0, 1, 1, 2] {
        board.hover(&mut drag, hover).await.unwrap();
    }

    assert_eq!(names(&board).await, ["B.png", "C.png", "A.png"]);
    assert_eq!(board.order().await.unwrap()[2], id_a);

    let store = board.into_store().await.unwrap();
    assert_eq!(store.position(id_a), Some(2));
}

#[tokio::test]
async fn missing_file_counts_as_failure() {
    let board = Dropboard::new(quick_config());
    let report = board
        .drop_files(vec![FileHandle::from_path("/nope/missing.png")])
        .await
        .unwrap();
    assert_eq!(report.failed, 1);
    assert!(board.snapshot().await.unwrap().is_empty());

    // Errors carry the path so callers can surface them.
    let err = IngestError::FileNotFound(PathBuf::from("/nope/missing.png"));
    assert!(err.to_string().contains("missing.png"));
}

#[tokio::test]
async fn nameless_png_and_svg_both_reach_the_board() {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::new_rgb8(3, 2)
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"/>"#.to_vec();

    let board = Dropboard::new(quick_config());
    let report = board
        .drop_files(vec![
            FileHandle::from_bytes("scan", None, buffer.into_inner()),
            FileHandle::from_bytes("logo.svg", Some("image/svg+xml"), svg),
        ])
        .await
        .unwrap();

    assert!(report.rejected.is_empty());
    assert_eq!((report.appended_count(), report.failed), (2, 0));

    let snapshot = board.snapshot().await.unwrap();
    let scan = snapshot.iter().find(|r| r.file_name == "scan").unwrap();
    assert_eq!(scan.content.media_type, "image/png");
    assert_eq!(scan.content.width, Some(3));
    let logo = snapshot.iter().find(|r| r.file_name == "logo.svg").unwrap();
    assert_eq!(logo.content.media_type, "image/svg+xml");
    assert!(logo.content.width.is_none());
}
