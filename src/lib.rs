//! Scrollreel plays an image sequence in step with page scroll.
//!
//! A numbered run of frame images is loaded up front, then the scroll position of a tall
//! "intro" container is mapped to a frame index, an overlay opacity and a navbar toggle on
//! every rendering frame.
//!
//! # Pipeline overview
//!
//! 1. **Preload**: `FrameStore + FrameSource -> PreloadJob` (decodes on a rayon pool, reports
//!    each settled frame over a channel; failures count as settled)
//! 2. **Map**: `ContainerGeometry + viewport height -> ScrollSample`
//! 3. **Render**: `ScrollSample::frame_index -> Surface` (cover-fit, backing size = viewport ×
//!    device pixel ratio)
//!
//! [`AnimationController`] ties the three together against an abstract [`Host`] (viewport,
//! container geometry, loader and navbar chrome, animation-frame and timer scheduling).
//! [`HeadlessHost`] and [`HeadlessPage`] provide an in-memory page for tools and tests.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single-threaded state**: only decoding runs off the controller thread.
//! - **Premultiplied RGBA8**: decoded frames and surfaces hold premultiplied pixels.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod config;
mod controller;
mod foundation;
mod frames;
mod headless;
mod preload;
mod render;
mod scroll;

pub use config::model::AnimatorConfig;
pub use controller::animation::{AnimationController, AnimationState, ControllerStats, Phase};
pub use controller::host::{Host, HostEvent, NavState, TimerTask};
pub use foundation::core::{
    Affine, ContainerGeometry, Point, Rect, Size, SurfaceSize, Vec2, Viewport,
};
pub use foundation::error::{ReelError, ReelResult};
pub use frames::decode::decode_frame;
pub use frames::source::{FrameSource, FsFrameSource, MemoryFrameSource, normalize_rel_path};
pub use frames::store::{DecodedFrame, Frame, FrameState, FrameStore};
pub use headless::page::{HeadlessHost, HeadlessPage, LoaderState};
pub use preload::preloader::{FrameCompletion, PreloadJob, PreloadSummary, Preloader};
pub use preload::progress::{PreloadProgress, PreloadTick};
pub use render::cpu::{PixmapSurface, SurfaceSnapshot};
pub use render::geometry::{CoverFit, cover_fit};
pub use render::renderer::{DrawOutcome, Renderer};
pub use render::surface::{RecordingSurface, Surface, SurfaceCommand, SurfaceLayout};
pub use scroll::mapper::{ScrollMapper, ScrollSample};
