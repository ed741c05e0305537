use std::io::Cursor;

use super::*;
use crate::frames::source::MemoryFrameSource;

fn png_bytes(w: u32, h: u32, rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([rgb[0], rgb[1], rgb[2], 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn store_of(n: usize) -> FrameStore {
    FrameStore::from_paths((1..=n).map(|i| format!("f-{i:03}.png")))
}

#[test]
fn preload_all_counts_failures_toward_completion() {
    let mut src = MemoryFrameSource::new();
    for i in [1usize, 2, 4] {
        src.insert(&format!("f-{i:03}.png"), png_bytes(4, 2, [10, 20, 30]))
            .unwrap();
    }
    src.insert("f-005.png", b"corrupt".to_vec()).unwrap();

    let mut store = store_of(5);
    let mut ticks = Vec::new();
    let summary = Preloader::new(Arc::new(src))
        .with_threads(Some(2))
        .preload_all(&mut store, |t| ticks.push(t))
        .unwrap();

    assert_eq!(
        summary,
        PreloadSummary {
            total: 5,
            loaded: 3,
            failed: 2
        }
    );
    assert_eq!(ticks.len(), 5);
    assert_eq!(ticks.iter().filter(|t| t.resolved).count(), 1);
    assert_eq!(ticks.last().unwrap().percent, 100);
    assert!(ticks.windows(2).all(|w| w[0].completed < w[1].completed));

    assert_eq!(store.get(0).unwrap().intrinsic_size(), Some((4, 2)));
    assert_eq!(store.get(2).unwrap().state(), FrameState::Failed);
    assert_eq!(store.get(4).unwrap().state(), FrameState::Failed);
    assert_eq!(store.count_in_state(FrameState::Pending), 0);
}

#[test]
fn preload_all_on_empty_store_resolves_immediately() {
    let mut store = FrameStore::default();
    let mut ticks = 0;
    let summary = Preloader::new(Arc::new(MemoryFrameSource::new()))
        .preload_all(&mut store, |_| ticks += 1)
        .unwrap();
    assert_eq!(summary, PreloadSummary::default());
    assert_eq!(ticks, 0);
}

#[test]
fn job_yields_each_index_exactly_once() {
    let mut src = MemoryFrameSource::new();
    for i in 1..=8usize {
        src.insert(&format!("f-{i:03}.png"), png_bytes(1, 1, [i as u8, 0, 0]))
            .unwrap();
    }
    let store = store_of(8);
    let mut job = Preloader::new(Arc::new(src)).start(&store).unwrap();
    assert_eq!(job.total(), 8);

    let mut seen = Vec::new();
    while let Some(done) = job.next_blocking() {
        assert!(done.result.is_ok());
        seen.push(done.index);
    }
    seen.sort_unstable();
    assert_eq!(seen, (0..8).collect::<Vec<_>>());
    assert!(job.is_finished());
    assert!(job.try_next().is_none());
}

#[test]
fn zero_threads_is_rejected() {
    let store = store_of(1);
    let err = Preloader::new(Arc::new(MemoryFrameSource::new()))
        .with_threads(Some(0))
        .start(&store)
        .unwrap_err();
    assert!(err.to_string().contains("validation error:"));
}
