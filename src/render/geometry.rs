use crate::foundation::core::{Rect, Size};

/// Placement of an image scaled to cover a target rectangle.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CoverFit {
    /// Uniform scale applied to the intrinsic size.
    pub scale: f64,
    /// Destination rectangle in surface coordinates; may extend past the surface edges.
    pub dest: Rect,
}

/// Scale `intrinsic` uniformly so it fully covers `surface`, centered on both axes.
///
/// `scale = max(sw / iw, sh / ih)`; excess is cropped symmetrically. Returns `None` when the
/// intrinsic size has a zero or non-finite dimension.
pub fn cover_fit(surface: Size, intrinsic: Size) -> Option<CoverFit> {
    let usable = |v: f64| v.is_finite() && v > 0.0;
    if !usable(intrinsic.width) || !usable(intrinsic.height) {
        return None;
    }

    let scale = (surface.width / intrinsic.width).max(surface.height / intrinsic.height);
    let dw = intrinsic.width * scale;
    let dh = intrinsic.height * scale;
    let dx = (surface.width - dw) / 2.0;
    let dy = (surface.height - dh) / 2.0;

    Some(CoverFit {
        scale,
        dest: Rect::new(dx, dy, dx + dw, dy + dh),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;
