use std::sync::Arc;

use anyhow::Context;

use crate::{foundation::error::ReelResult, frames::store::DecodedFrame};

/// Decode encoded image bytes (JPEG, PNG, ...) into premultiplied RGBA8.
pub fn decode_frame(bytes: &[u8]) -> ReelResult<DecodedFrame> {
    let dyn_img = image::load_from_memory(bytes).context("decode frame image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(DecodedFrame {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((u16::from(px[0]) * a + 127) / 255) as u8;
        px[1] = ((u16::from(px[1]) * a + 127) / 255) as u8;
        px[2] = ((u16::from(px[2]) * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frames/decode.rs"]
mod tests;
