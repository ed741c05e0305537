use std::{collections::HashMap, sync::Arc};

use crate::{
    foundation::core::{Rect, SurfaceSize},
    foundation::error::{ReelError, ReelResult},
    frames::store::DecodedFrame,
    render::surface::{Surface, SurfaceLayout},
};

#[derive(Clone)]
struct ImagePaint {
    paint: vello_cpu::Image,
    w: u32,
    h: u32,
}

/// CPU raster surface powered by `vello_cpu`.
///
/// Pixels are premultiplied RGBA8, row-major. Decoded frames are converted to paints once and
/// cached by key, so repeated redraws of the same frame only rasterize.
pub struct PixmapSurface {
    size: SurfaceSize,
    layout: SurfaceLayout,
    pixmap: Option<vello_cpu::Pixmap>,
    ctx: Option<vello_cpu::RenderContext>,
    paint_cache: HashMap<usize, ImagePaint>,
}

impl std::fmt::Debug for PixmapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapSurface")
            .field("size", &self.size)
            .field("layout", &self.layout)
            .field("cached_paints", &self.paint_cache.len())
            .finish()
    }
}

/// Copy of a surface's pixels.
#[derive(Clone, Debug)]
pub struct SurfaceSnapshot {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl PixmapSurface {
    /// Allocate a transparent surface of `size`.
    pub fn new(size: SurfaceSize) -> ReelResult<Self> {
        let mut out = Self {
            size: SurfaceSize::default(),
            layout: SurfaceLayout::default(),
            pixmap: None,
            ctx: None,
            paint_cache: HashMap::new(),
        };
        out.set_backing_size(size)?;
        Ok(out)
    }

    /// Current layout sizing.
    pub fn layout(&self) -> SurfaceLayout {
        self.layout
    }

    /// Premultiplied RGBA8 pixel bytes; empty for a zero-sized surface.
    pub fn data(&self) -> &[u8] {
        self.pixmap
            .as_ref()
            .map(|pm| pm.data_as_u8_slice())
            .unwrap_or(&[])
    }

    /// Premultiplied RGBA8 value of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = ((y as usize) * (self.size.width as usize) + (x as usize)) * 4;
        let px = self.data().get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Copy the current pixels out.
    pub fn snapshot(&self) -> SurfaceSnapshot {
        SurfaceSnapshot {
            width: self.size.width,
            height: self.size.height,
            data: self.data().to_vec(),
            premultiplied: true,
        }
    }

    fn paint_for(&mut self, key: usize, image: &DecodedFrame) -> ReelResult<ImagePaint> {
        if let Some(p) = self.paint_cache.get(&key)
            && p.w == image.width
            && p.h == image.height
        {
            return Ok(p.clone());
        }
        let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
        let paint = ImagePaint {
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            w: image.width,
            h: image.height,
        };
        self.paint_cache.insert(key, paint.clone());
        Ok(paint)
    }
}

impl Surface for PixmapSurface {
    fn backing_size(&self) -> SurfaceSize {
        self.size
    }

    fn set_backing_size(&mut self, size: SurfaceSize) -> ReelResult<()> {
        let (w, h) = pixmap_dims(size.width, size.height)?;
        self.size = size;
        self.pixmap = if size.is_empty() {
            None
        } else {
            Some(vello_cpu::Pixmap::new(w, h))
        };
        if self
            .ctx
            .as_ref()
            .is_some_and(|ctx| ctx.width() != w || ctx.height() != h)
        {
            self.ctx = None;
        }
        Ok(())
    }

    fn set_layout(&mut self, layout: SurfaceLayout) {
        self.layout = layout;
    }

    fn clear(&mut self) {
        if let Some(pm) = self.pixmap.as_mut() {
            pm.data_as_u8_slice_mut().fill(0);
        }
    }

    fn draw_image(&mut self, key: usize, image: &DecodedFrame, dest: Rect) -> ReelResult<()> {
        if self.pixmap.is_none() || !image.has_usable_size() {
            return Ok(());
        }
        let p = self.paint_for(key, image)?;

        let (w, h) = pixmap_dims(self.size.width, self.size.height)?;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();

        let sx = dest.width() / f64::from(p.w);
        let sy = dest.height() / f64::from(p.h);
        let tr = vello_cpu::kurbo::Affine::translate((dest.x0, dest.y0))
            * vello_cpu::kurbo::Affine::scale_non_uniform(sx, sy);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(tr);
        ctx.set_paint(p.paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(p.w),
            f64::from(p.h),
        ));
        ctx.flush();

        if let Some(pm) = self.pixmap.as_mut() {
            ctx.render_to_pixmap(pm);
        }
        self.ctx = Some(ctx);
        Ok(())
    }
}

fn pixmap_dims(width: u32, height: u32) -> ReelResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::render(format!("surface width {width} exceeds u16")))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::render(format!("surface height {height} exceeds u16")))?;
    Ok((w, h))
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Pixmap> {
    let (w, h) = pixmap_dims(width, height)?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ReelError::render("frame byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; decoded frames are already premultiplied.
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
        .collect::<Vec<_>>();
    let may_have_opacities = pixels.iter().any(|px| px.a != 255);
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
