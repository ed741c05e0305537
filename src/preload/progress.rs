/// Snapshot reported after each completed load attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PreloadTick {
    /// Attempts completed so far (successes and failures).
    pub completed: usize,
    /// Total attempts expected.
    pub total: usize,
    /// `round(completed / total * 100)`.
    pub percent: u32,
    /// `true` only on the tick that completed the whole sequence.
    pub resolved: bool,
}

impl PreloadTick {
    /// Loader text, e.g. `"42%"`.
    pub fn label(&self) -> String {
        format!("{}%", self.percent)
    }
}

/// Counting join over `total` independent load attempts.
///
/// Every attempt counts exactly once whether it succeeded or failed; the join resolves exactly
/// once, when the count reaches `total`.
#[derive(Clone, Debug)]
pub struct PreloadProgress {
    total: usize,
    completed: usize,
    failed: usize,
    resolved: bool,
}

impl PreloadProgress {
    /// Start a join over `total` attempts.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            failed: 0,
            resolved: false,
        }
    }

    /// Record one completed attempt.
    ///
    /// Completions beyond `total` are ignored and never re-resolve the join.
    pub fn record(&mut self, succeeded: bool) -> PreloadTick {
        if self.completed < self.total {
            self.completed += 1;
            if !succeeded {
                self.failed += 1;
            }
        }
        let resolved = self.try_resolve();
        PreloadTick {
            completed: self.completed,
            total: self.total,
            percent: self.percent(),
            resolved,
        }
    }

    /// Resolve the join if every attempt completed and it has not resolved yet.
    ///
    /// An empty join resolves on the first call.
    pub fn try_resolve(&mut self) -> bool {
        if self.resolved || self.completed < self.total {
            return false;
        }
        self.resolved = true;
        true
    }

    /// Completion percentage in `0..=100`.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u32
    }

    /// Attempts completed so far.
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Attempts that completed with a failure.
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Total attempts expected.
    pub fn total(&self) -> usize {
        self.total
    }

    /// `true` once the join has resolved.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preload/progress.rs"]
mod tests;
