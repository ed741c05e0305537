use crate::{
    foundation::core::{Rect, SurfaceSize},
    foundation::error::ReelResult,
    frames::store::DecodedFrame,
};

/// Layout (CSS) sizing of a drawing surface, independent of its backing resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceLayout {
    /// Layout size follows the backing size.
    #[default]
    Intrinsic,
    /// 100% of the viewport width and height.
    FillViewport,
}

/// A 2D immediate-mode drawing target, the host's canvas.
pub trait Surface {
    /// Current backing resolution in device pixels.
    fn backing_size(&self) -> SurfaceSize;

    /// Change the backing resolution. Like a canvas, this discards existing contents.
    fn set_backing_size(&mut self, size: SurfaceSize) -> ReelResult<()>;

    /// Change the layout sizing.
    fn set_layout(&mut self, layout: SurfaceLayout);

    /// Clear every pixel to transparent.
    fn clear(&mut self);

    /// Paint `image` stretched into `dest`. `key` identifies the image for paint caching.
    fn draw_image(&mut self, key: usize, image: &DecodedFrame, dest: Rect) -> ReelResult<()>;
}

/// One call recorded by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SurfaceCommand {
    /// [`Surface::set_backing_size`].
    Resize {
        /// New backing size.
        size: SurfaceSize,
    },
    /// [`Surface::set_layout`].
    Layout {
        /// New layout sizing.
        layout: SurfaceLayout,
    },
    /// [`Surface::clear`].
    Clear,
    /// [`Surface::draw_image`].
    Draw {
        /// Image key (0-based frame index).
        key: usize,
        /// Destination rectangle.
        dest: Rect,
    },
}

/// Surface that paints nothing and records every command, for tracing and tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    size: SurfaceSize,
    layout: SurfaceLayout,
    commands: Vec<SurfaceCommand>,
}

impl RecordingSurface {
    /// Start with the given backing size.
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Commands recorded so far, oldest first.
    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    /// Drain recorded commands.
    pub fn take_commands(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Current layout sizing.
    pub fn layout(&self) -> SurfaceLayout {
        self.layout
    }

    /// Keys of every draw, in order.
    pub fn drawn_keys(&self) -> Vec<usize> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                SurfaceCommand::Draw { key, .. } => Some(*key),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn backing_size(&self) -> SurfaceSize {
        self.size
    }

    fn set_backing_size(&mut self, size: SurfaceSize) -> ReelResult<()> {
        self.size = size;
        self.commands.push(SurfaceCommand::Resize { size });
        Ok(())
    }

    fn set_layout(&mut self, layout: SurfaceLayout) {
        self.layout = layout;
        self.commands.push(SurfaceCommand::Layout { layout });
    }

    fn clear(&mut self) {
        self.commands.push(SurfaceCommand::Clear);
    }

    fn draw_image(&mut self, key: usize, _image: &DecodedFrame, dest: Rect) -> ReelResult<()> {
        self.commands.push(SurfaceCommand::Draw { key, dest });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
