use std::{io::Cursor, sync::Arc};

use super::*;
use crate::{
    controller::animation::Phase,
    foundation::core::SurfaceSize,
    frames::source::MemoryFrameSource,
    render::cpu::PixmapSurface,
};

fn solid_png(rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([rgb[0], rgb[1], rgb[2], 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn host_reports_container_geometry_relative_to_scroll() {
    let mut host = HeadlessHost::new(Viewport::new(800.0, 600.0, 1.0).unwrap(), 100.0, 2000.0);
    assert_eq!(host.intro_scroll_end(), 1500.0);

    host.scroll_to(400.0);
    let g = host.container_geometry();
    assert_eq!(g.top, -300.0);
    assert_eq!(g.bottom, 1700.0);
    assert_eq!(g.height, 2000.0);

    host.scroll_to(-50.0);
    assert_eq!(host.scroll_y(), 0.0);
}

#[test]
fn host_timers_fire_in_due_order() {
    let mut host = HeadlessHost::new(Viewport::new(1.0, 1.0, 1.0).unwrap(), 0.0, 1.0);
    host.set_timeout(Duration::from_millis(30), TimerTask::RemoveLoader);
    host.set_timeout(Duration::from_millis(10), TimerTask::RemoveLoader);
    assert!(host.advance_time(Duration::from_millis(5)).is_empty());
    assert_eq!(host.advance_time(Duration::from_millis(5)).len(), 1);
    assert_eq!(host.pending_timers(), 1);
    assert_eq!(host.advance_time(Duration::from_millis(100)).len(), 1);
}

#[test]
fn host_frame_requests_are_single_slot() {
    let mut host = HeadlessHost::new(Viewport::new(1.0, 1.0, 1.0).unwrap(), 0.0, 1.0);
    host.request_animation_frame();
    host.request_animation_frame();
    assert_eq!(host.frame_requests_total(), 2);
    assert!(host.take_frame_request());
    assert!(!host.take_frame_request());
}

#[test]
fn page_paints_scrolled_frame_into_pixmap() {
    let cfg = AnimatorConfig {
        total_frames: 2,
        path_prefix: "seq/".to_string(),
        extension: ".png".to_string(),
        ..AnimatorConfig::default()
    };
    let mut src = MemoryFrameSource::new();
    src.insert(&cfg.frame_path(1), solid_png([255, 0, 0])).unwrap();
    src.insert(&cfg.frame_path(2), solid_png([0, 0, 255])).unwrap();

    let host = HeadlessHost::new(Viewport::new(8.0, 4.0, 1.0).unwrap(), 0.0, 12.0);
    let surface = PixmapSurface::new(SurfaceSize::default()).unwrap();
    let mut page = HeadlessPage::new(cfg, surface, host).unwrap();
    page.start(&Preloader::new(Arc::new(src))).unwrap();
    page.wait_until_ready();
    assert_eq!(page.controller().phase(), Phase::Ready);

    page.advance_frame();
    let red = page.controller().surface().pixel(4, 2).unwrap();
    assert!(red[0] > 200 && red[2] < 50, "{red:?}");

    let end = page.host().intro_scroll_end();
    page.scroll_to(end);
    let sample = page.advance_frame().unwrap();
    assert_eq!(sample.frame_index, 1);
    assert!(sample.past_intro);
    let blue = page.controller().surface().pixel(4, 2).unwrap();
    assert!(blue[2] > 200 && blue[0] < 50, "{blue:?}");

    page.resize(Viewport::new(4.0, 4.0, 2.0).unwrap());
    assert_eq!(
        page.controller().surface().backing_size(),
        SurfaceSize::new(8, 8)
    );
    assert!(page.controller().surface().pixel(7, 7).unwrap()[2] > 200);

    page.advance_time(Duration::from_millis(600));
    assert!(page.host().loader().removed);
}
