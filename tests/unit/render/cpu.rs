use super::*;
use crate::render::geometry::cover_fit;

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> DecodedFrame {
    let mut bytes = Vec::with_capacity((w * h * 4) as usize);
    for _ in 0..(w * h) {
        bytes.extend_from_slice(&rgba);
    }
    DecodedFrame {
        width: w,
        height: h,
        rgba8_premul: Arc::new(bytes),
    }
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= 2)
}

#[test]
fn new_surface_is_transparent() {
    let s = PixmapSurface::new(SurfaceSize::new(3, 2)).unwrap();
    assert_eq!(s.data().len(), 3 * 2 * 4);
    assert!(s.data().iter().all(|&b| b == 0));
    assert_eq!(s.pixel(3, 0), None);
}

#[test]
fn draw_cover_fit_fills_every_pixel() {
    let mut s = PixmapSurface::new(SurfaceSize::new(8, 4)).unwrap();
    let img = solid(2, 1, [200, 40, 10, 255]);
    let fit = cover_fit(s.backing_size().to_kurbo(), crate::foundation::core::Size::new(2.0, 1.0))
        .unwrap();
    s.draw_image(0, &img, fit.dest).unwrap();

    for y in 0..4 {
        for x in 0..8 {
            let px = s.pixel(x, y).unwrap();
            assert!(close(px, [200, 40, 10, 255]), "({x},{y}) = {px:?}");
        }
    }

    s.clear();
    assert!(s.data().iter().all(|&b| b == 0));
}

#[test]
fn resize_discards_contents() {
    let mut s = PixmapSurface::new(SurfaceSize::new(2, 2)).unwrap();
    let img = solid(1, 1, [9, 9, 9, 255]);
    s.draw_image(0, &img, Rect::new(0.0, 0.0, 2.0, 2.0)).unwrap();
    assert!(s.data().iter().any(|&b| b != 0));

    s.set_backing_size(SurfaceSize::new(4, 4)).unwrap();
    assert_eq!(s.snapshot().data.len(), 4 * 4 * 4);
    assert!(s.data().iter().all(|&b| b == 0));
}

#[test]
fn empty_surface_draw_is_noop() {
    let mut s = PixmapSurface::new(SurfaceSize::new(0, 0)).unwrap();
    let img = solid(1, 1, [1, 2, 3, 255]);
    s.draw_image(0, &img, Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();
    assert!(s.data().is_empty());
}

#[test]
fn oversized_surface_is_a_render_error() {
    let err = PixmapSurface::new(SurfaceSize::new(70_000, 1)).unwrap_err();
    assert!(err.to_string().contains("render error:"));
}

#[test]
fn mismatched_frame_bytes_are_rejected() {
    let mut s = PixmapSurface::new(SurfaceSize::new(2, 2)).unwrap();
    let bad = DecodedFrame {
        width: 2,
        height: 2,
        rgba8_premul: Arc::new(vec![0; 3]),
    };
    assert!(s.draw_image(0, &bad, Rect::new(0.0, 0.0, 2.0, 2.0)).is_err());
}
