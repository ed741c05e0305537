use std::{fs::File, io::BufReader, path::Path, time::Duration};

use anyhow::Context;

use crate::foundation::error::{ReelError, ReelResult};

/// Static configuration of one scroll-driven frame sequence.
///
/// Every field has a default, so an empty JSON object (`{}`) is a valid config describing the
/// stock 210-frame `images/ezgif-frame-NNN.jpg` sequence.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimatorConfig {
    /// Number of frames in the sequence (`N`).
    pub total_frames: usize,
    /// Path prefix prepended to every zero-padded frame number.
    pub path_prefix: String,
    /// Extension appended after the frame number, including the dot.
    pub extension: String,
    /// Minimum digit count of the frame number in resource paths.
    pub pad_width: usize,
    /// Progress at which the overlay starts fading out.
    pub fade_start: f64,
    /// Progress span over which the overlay fades from opaque to transparent.
    pub fade_span: f64,
    /// Slack (layout units) below the viewport bottom that still counts as "past intro".
    pub past_intro_tolerance: f64,
    /// Grace period between marking the loader done and removing it.
    pub loader_removal_delay_ms: u64,
    /// Worker count for the decode pool; `None` uses the rayon default.
    pub decode_threads: Option<usize>,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            total_frames: 210,
            path_prefix: "images/ezgif-frame-".to_string(),
            extension: ".jpg".to_string(),
            pad_width: 3,
            fade_start: 0.1,
            fade_span: 0.3,
            past_intro_tolerance: 50.0,
            loader_removal_delay_ms: 600,
            decode_threads: None,
        }
    }
}

impl AnimatorConfig {
    /// Read and validate a JSON config file.
    pub fn from_json_path(path: &Path) -> ReelResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| ReelError::serde(format!("parse config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check invariants the mapper and preloader rely on.
    pub fn validate(&self) -> ReelResult<()> {
        if self.pad_width == 0 {
            return Err(ReelError::validation("pad_width must be >= 1"));
        }
        if self.extension.trim().is_empty() {
            return Err(ReelError::validation("extension must be non-empty"));
        }
        if !self.fade_start.is_finite() || !(0.0..=1.0).contains(&self.fade_start) {
            return Err(ReelError::validation("fade_start must be within [0, 1]"));
        }
        if !self.fade_span.is_finite() || self.fade_span <= 0.0 || self.fade_span > 1.0 {
            return Err(ReelError::validation("fade_span must be within (0, 1]"));
        }
        if !self.past_intro_tolerance.is_finite() {
            return Err(ReelError::validation("past_intro_tolerance must be finite"));
        }
        if self.decode_threads == Some(0) {
            return Err(ReelError::validation(
                "decode_threads must be >= 1 when set",
            ));
        }
        Ok(())
    }

    /// Resource path for the 1-based frame `number`, e.g. `images/ezgif-frame-007.jpg`.
    pub fn frame_path(&self, number: usize) -> String {
        format!(
            "{}{:0width$}{}",
            self.path_prefix,
            number,
            self.extension,
            width = self.pad_width
        )
    }

    /// Loader removal grace period as a [`Duration`].
    pub fn loader_removal_delay(&self) -> Duration {
        Duration::from_millis(self.loader_removal_delay_ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
