use std::sync::Arc;

use super::*;
use crate::{
    foundation::core::{Rect, SurfaceSize},
    foundation::error::ReelError,
    frames::store::DecodedFrame,
    render::surface::{RecordingSurface, SurfaceCommand},
};

fn decoded(w: u32, h: u32) -> DecodedFrame {
    DecodedFrame {
        width: w,
        height: h,
        rgba8_premul: Arc::new(vec![255; (w * h * 4) as usize]),
    }
}

fn store_with(results: Vec<Option<DecodedFrame>>) -> FrameStore {
    let mut store = FrameStore::from_paths((0..results.len()).map(|i| format!("{i}.png")));
    for (i, r) in results.into_iter().enumerate() {
        match r {
            Some(d) => assert!(store.settle(i, Ok(d))),
            None => assert!(store.settle(i, Err(ReelError::load("gone")))),
        }
    }
    store
}

#[test]
fn draw_clears_then_paints_cover_fit() {
    let store = store_with(vec![Some(decoded(400, 200))]);
    let mut r = Renderer::new(RecordingSurface::new(SurfaceSize::new(800, 600)));

    let out = r.draw_index(&store, 0);
    let DrawOutcome::Painted { index, fit } = out else {
        panic!("expected paint, got {out:?}");
    };
    assert_eq!(index, 0);
    assert_eq!(fit.scale, 3.0);
    assert_eq!(
        r.surface().commands(),
        &[
            SurfaceCommand::Clear,
            SurfaceCommand::Draw {
                key: 0,
                dest: Rect::new(-200.0, 0.0, 1000.0, 600.0)
            }
        ]
    );
}

#[test]
fn absent_failed_and_pending_frames_are_skipped_silently() {
    let mut store = store_with(vec![None, Some(decoded(0, 0))]);
    let pending = FrameStore::from_paths(vec!["p.png".to_string()]);
    let mut r = Renderer::new(RecordingSurface::new(SurfaceSize::new(10, 10)));

    assert_eq!(r.draw_index(&store, 0), DrawOutcome::Skipped);
    assert_eq!(r.draw_index(&store, 1), DrawOutcome::Skipped);
    assert_eq!(r.draw_index(&store, 99), DrawOutcome::Skipped);
    assert_eq!(r.draw_index(&pending, 0), DrawOutcome::Skipped);
    assert!(r.surface().commands().is_empty());

    store = FrameStore::default();
    assert_eq!(r.draw_index(&store, 0), DrawOutcome::Skipped);
}

#[test]
fn resize_sets_backing_and_layout_then_redraws_current() {
    let store = store_with(vec![Some(decoded(16, 9)), Some(decoded(16, 9))]);
    let mut r = Renderer::new(RecordingSurface::default());
    let vp = Viewport::new(640.0, 360.0, 2.0).unwrap();

    let out = r.resize(vp, &store, Some(1));
    assert!(matches!(out, DrawOutcome::Painted { index: 1, .. }));
    assert_eq!(r.surface().backing_size(), SurfaceSize::new(1280, 720));
    assert_eq!(r.surface().layout(), SurfaceLayout::FillViewport);
    assert_eq!(
        &r.surface().commands()[..2],
        &[
            SurfaceCommand::Resize {
                size: SurfaceSize::new(1280, 720)
            },
            SurfaceCommand::Layout {
                layout: SurfaceLayout::FillViewport
            }
        ]
    );
}

#[test]
fn resize_before_first_draw_uses_frame_zero() {
    let store = store_with(vec![Some(decoded(2, 2)), Some(decoded(2, 2))]);
    let mut r = Renderer::new(RecordingSurface::default());
    r.resize(Viewport::new(10.0, 10.0, 1.0).unwrap(), &store, None);
    assert_eq!(r.surface().drawn_keys(), vec![0]);
}
