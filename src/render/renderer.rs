use crate::{
    foundation::core::{Size, Viewport},
    frames::store::{Frame, FrameStore},
    render::geometry::{CoverFit, cover_fit},
    render::surface::{Surface, SurfaceLayout},
};

/// What a draw request did.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DrawOutcome {
    /// The surface was cleared and the frame painted at `fit`.
    Painted {
        /// 0-based frame index.
        index: usize,
        /// Placement used.
        fit: CoverFit,
    },
    /// Nothing was touched: the frame is absent, unloaded, failed, or has no usable size.
    Skipped,
}

/// Paints frames onto a [`Surface`] with cover-fit scaling.
///
/// Drawing never fails: surface errors are logged and reported as [`DrawOutcome::Skipped`].
#[derive(Debug)]
pub struct Renderer<S: Surface> {
    surface: S,
}

impl<S: Surface> Renderer<S> {
    /// Wrap `surface`.
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    /// The underlying surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the underlying surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Give the surface back.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Clear the surface and paint `frame` (at 0-based `index`) cover-fit to the backing size.
    pub fn draw(&mut self, index: usize, frame: Option<&Frame>) -> DrawOutcome {
        let Some(frame) = frame else {
            return DrawOutcome::Skipped;
        };
        let Some(decoded) = frame.decoded().filter(|d| d.has_usable_size()) else {
            return DrawOutcome::Skipped;
        };

        let surface = self.surface.backing_size().to_kurbo();
        let intrinsic = Size::new(f64::from(decoded.width), f64::from(decoded.height));
        let Some(fit) = cover_fit(surface, intrinsic) else {
            return DrawOutcome::Skipped;
        };

        self.surface.clear();
        if let Err(err) = self.surface.draw_image(index, decoded, fit.dest) {
            tracing::warn!(index, error = %err, "surface rejected frame paint");
            return DrawOutcome::Skipped;
        }
        DrawOutcome::Painted { index, fit }
    }

    /// Draw the slot at `index` of `store`.
    pub fn draw_index(&mut self, store: &FrameStore, index: usize) -> DrawOutcome {
        self.draw(index, store.get(index))
    }

    /// Match the surface to `viewport` and repaint `current` (or frame 0 before any draw).
    ///
    /// Backing resolution is `viewport × device_pixel_ratio`; layout fills the viewport.
    pub fn resize(
        &mut self,
        viewport: Viewport,
        store: &FrameStore,
        current: Option<usize>,
    ) -> DrawOutcome {
        let size = viewport.backing_size();
        if let Err(err) = self.surface.set_backing_size(size) {
            tracing::warn!(
                width = size.width,
                height = size.height,
                error = %err,
                "surface rejected resize"
            );
        }
        self.surface.set_layout(SurfaceLayout::FillViewport);
        tracing::debug!(width = size.width, height = size.height, "surface resized");
        self.draw_index(store, current.unwrap_or(0))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
