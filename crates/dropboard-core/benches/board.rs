//! Benchmarks for board moves and single-file ingestion.
//!
//! Run with: cargo bench -p dropboard-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dropboard_core::{move_element, Config, FileHandle, Ingestor};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

fn benchmark_move_element(c: &mut Criterion) {
    let mut items: Vec<u32> = (0..1000).collect();

    c.bench_function("move_element_1000_end_to_end", |b| {
        b.iter(|| {
            move_element(&mut items, black_box(0), black_box(999)).unwrap();
            move_element(&mut items, black_box(999), black_box(0)).unwrap();
        })
    });
}

fn benchmark_prepare(c: &mut Criterion) {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::new_rgb8(640, 480)
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    let bytes = buffer.into_inner();

    let rt = tokio::runtime::Runtime::new().unwrap();

    for (label, thumbnails) in [("prepare_png_640", true), ("prepare_png_640_no_thumb", false)] {
        let mut config = Config::default();
        config.thumbnail.enabled = thumbnails;
        let ingestor = Ingestor::new(&config);

        c.bench_function(label, |b| {
            b.iter(|| {
                let handle = FileHandle::from_bytes("bench.png", None, bytes.clone());
                let _ = rt.block_on(ingestor.prepare(black_box(handle)));
            })
        });
    }
}

criterion_group!(benches, benchmark_move_element, benchmark_prepare);
criterion_main!(benches);
