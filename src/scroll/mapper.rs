use crate::{config::model::AnimatorConfig, foundation::core::ContainerGeometry};

/// Everything derived from one scroll position.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ScrollSample {
    /// Normalized progress through the container, in `[0, 1]`.
    pub progress: f64,
    /// 0-based frame to show.
    pub frame_index: usize,
    /// Intro overlay opacity, in `[0, 1]`.
    pub overlay_opacity: f64,
    /// The container bottom has (nearly) reached the viewport bottom.
    pub past_intro: bool,
}

/// Maps container/viewport geometry to progress, frame index and UI signals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollMapper {
    total_frames: usize,
    fade_start: f64,
    fade_span: f64,
    past_intro_tolerance: f64,
}

impl ScrollMapper {
    /// Mapper for `total_frames` frames with the stock fade band (0.1..0.4) and 50-unit
    /// past-intro tolerance.
    pub fn new(total_frames: usize) -> Self {
        Self::from_config(&AnimatorConfig {
            total_frames,
            ..AnimatorConfig::default()
        })
    }

    /// Mapper using the frame count, fade band and tolerance of `cfg`.
    pub fn from_config(cfg: &AnimatorConfig) -> Self {
        Self {
            total_frames: cfg.total_frames,
            fade_start: cfg.fade_start,
            fade_span: cfg.fade_span,
            past_intro_tolerance: cfg.past_intro_tolerance,
        }
    }

    /// Number of frames mapped onto.
    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    /// Sample the scroll state for `container` inside a viewport of `viewport_height`.
    pub fn sample(&self, container: ContainerGeometry, viewport_height: f64) -> ScrollSample {
        let progress = self.progress(container.top, container.height, viewport_height);
        ScrollSample {
            progress,
            frame_index: self.frame_index(progress),
            overlay_opacity: self.overlay_opacity(progress),
            past_intro: self.past_intro(container.bottom, viewport_height),
        }
    }

    /// `clamp(-top / (height - viewport_height), 0, 1)`.
    ///
    /// A container no taller than the viewport has nothing to scroll through and counts as
    /// fully scrolled (`1.0`).
    pub fn progress(&self, container_top: f64, container_height: f64, viewport_height: f64) -> f64 {
        let scrollable = container_height - viewport_height;
        if !(scrollable > 0.0) {
            return 1.0;
        }
        let raw = -container_top / scrollable;
        if raw.is_nan() {
            return 0.0;
        }
        raw.clamp(0.0, 1.0)
    }

    /// `clamp(floor(progress * N), 0, N - 1)`.
    pub fn frame_index(&self, progress: f64) -> usize {
        let last = self.total_frames.saturating_sub(1);
        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        ((p * self.total_frames as f64).floor() as usize).min(last)
    }

    /// `1 - clamp((progress - fade_start) / fade_span, 0, 1)`.
    pub fn overlay_opacity(&self, progress: f64) -> f64 {
        let t = ((progress - self.fade_start) / self.fade_span).clamp(0.0, 1.0);
        1.0 - t
    }

    /// `container_bottom <= viewport_height + tolerance`.
    pub fn past_intro(&self, container_bottom: f64, viewport_height: f64) -> bool {
        container_bottom <= viewport_height + self.past_intro_tolerance
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/mapper.rs"]
mod tests;
