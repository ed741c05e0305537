use crate::foundation::error::{ReelError, ReelResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Browser-style viewport: CSS-pixel size plus device pixel density.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Viewport width in layout units.
    pub width: f64,
    /// Viewport height in layout units.
    pub height: f64,
    /// Device pixels per layout unit.
    pub device_pixel_ratio: f64,
}

impl Viewport {
    /// Build a viewport, rejecting non-finite or negative sizes and non-positive densities.
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> ReelResult<Self> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(ReelError::validation(
                "viewport size must be finite and >= 0",
            ));
        }
        if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
            return Err(ReelError::validation(
                "device_pixel_ratio must be finite and > 0",
            ));
        }
        Ok(Self {
            width,
            height,
            device_pixel_ratio,
        })
    }

    /// Backing-store resolution for a surface that fills this viewport.
    ///
    /// Fractional device pixels are truncated, matching how canvas backing sizes are
    /// assigned from floating-point values.
    pub fn backing_size(self) -> SurfaceSize {
        fn to_px(v: f64) -> u32 {
            if v.is_finite() && v > 0.0 {
                v.min(f64::from(u32::MAX)) as u32
            } else {
                0
            }
        }

        SurfaceSize {
            width: to_px(self.width * self.device_pixel_ratio),
            height: to_px(self.height * self.device_pixel_ratio),
        }
    }
}

/// Bounding geometry of the tracked scroll container, relative to the viewport top.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContainerGeometry {
    /// Distance from viewport top to container top (negative once scrolled past).
    pub top: f64,
    /// Distance from viewport top to container bottom.
    pub bottom: f64,
    /// Full layout height of the container.
    pub height: f64,
}

impl ContainerGeometry {
    /// Geometry for a container whose top sits at `top` and spans `height`.
    pub fn from_top_and_height(top: f64, height: f64) -> Self {
        Self {
            top,
            bottom: top + height,
            height,
        }
    }
}

/// Integer backing size of a drawing surface in device pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// Construct a size from explicit dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `true` when either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Size as floating-point `kurbo` geometry.
    pub fn to_kurbo(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
