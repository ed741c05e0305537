use std::sync::Arc;

use crate::{config::model::AnimatorConfig, foundation::error::ReelResult};

#[derive(Clone, Debug)]
/// Decoded raster frame in premultiplied RGBA8 form.
pub struct DecodedFrame {
    /// Intrinsic width in pixels.
    pub width: u32,
    /// Intrinsic height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl DecodedFrame {
    /// `true` when both intrinsic dimensions are non-zero.
    pub fn has_usable_size(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Observable load state of one frame slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameState {
    /// No load attempt has completed yet.
    Pending,
    /// Decoded successfully.
    Loaded,
    /// The load attempt completed with an error.
    Failed,
}

#[derive(Clone, Debug)]
enum Slot {
    Pending,
    Loaded(DecodedFrame),
    Failed(Arc<str>),
}

/// One still image of the sequence, addressed by its 1-based `number`.
#[derive(Clone, Debug)]
pub struct Frame {
    number: usize,
    path: String,
    slot: Slot,
}

impl Frame {
    /// 1-based position within the sequence.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Resource path the frame is loaded from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Current load state.
    pub fn state(&self) -> FrameState {
        match self.slot {
            Slot::Pending => FrameState::Pending,
            Slot::Loaded(_) => FrameState::Loaded,
            Slot::Failed(_) => FrameState::Failed,
        }
    }

    /// Decoded pixels, available only after a successful load.
    pub fn decoded(&self) -> Option<&DecodedFrame> {
        match &self.slot {
            Slot::Loaded(d) => Some(d),
            _ => None,
        }
    }

    /// Intrinsic `(width, height)`, if the frame decoded to a non-empty image.
    pub fn intrinsic_size(&self) -> Option<(u32, u32)> {
        self.decoded()
            .filter(|d| d.has_usable_size())
            .map(|d| (d.width, d.height))
    }

    /// Failure message recorded for a failed load.
    pub fn failure(&self) -> Option<&str> {
        match &self.slot {
            Slot::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Fixed-size, index-addressable sequence of frame slots.
///
/// Slots are created once and never removed or reordered; the only mutation is a pending slot
/// settling to loaded or failed.
#[derive(Clone, Debug, Default)]
pub struct FrameStore {
    frames: Vec<Frame>,
}

impl FrameStore {
    /// Create `cfg.total_frames` pending slots with their resource paths.
    pub fn from_config(cfg: &AnimatorConfig) -> Self {
        Self::from_paths((1..=cfg.total_frames).map(|n| cfg.frame_path(n)))
    }

    /// Create pending slots for an explicit, ordered list of resource paths.
    pub fn from_paths(paths: impl IntoIterator<Item = String>) -> Self {
        let frames = paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| Frame {
                number: i + 1,
                path,
                slot: Slot::Pending,
            })
            .collect();
        Self { frames }
    }

    /// Number of slots (`N`), fixed at construction.
    pub fn count(&self) -> usize {
        self.frames.len()
    }

    /// `true` for an empty sequence.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Slot at 0-based `index`; `None` when out of range.
    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Iterate slots in sequence order.
    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    /// Number of slots in `state`.
    pub fn count_in_state(&self, state: FrameState) -> usize {
        self.frames.iter().filter(|f| f.state() == state).count()
    }

    /// Settle a pending slot with a load result.
    ///
    /// Returns `false` (and leaves the slot untouched) when `index` is out of range or the
    /// slot already settled.
    pub(crate) fn settle(&mut self, index: usize, result: ReelResult<DecodedFrame>) -> bool {
        let Some(frame) = self.frames.get_mut(index) else {
            return false;
        };
        if !matches!(frame.slot, Slot::Pending) {
            return false;
        }
        frame.slot = match result {
            Ok(decoded) => Slot::Loaded(decoded),
            Err(err) => Slot::Failed(Arc::from(err.to_string())),
        };
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frames/store.rs"]
mod tests;
