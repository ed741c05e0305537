use std::sync::Arc;

use crossbeam_channel::{Receiver, TryRecvError};
use rayon::prelude::*;

use crate::{
    foundation::error::{ReelError, ReelResult},
    frames::decode::decode_frame,
    frames::source::FrameSource,
    frames::store::{DecodedFrame, FrameState, FrameStore},
    preload::progress::{PreloadProgress, PreloadTick},
};

/// Outcome of one load attempt, delivered back to the owning thread.
#[derive(Debug)]
pub struct FrameCompletion {
    /// 0-based slot index.
    pub index: usize,
    /// Decoded frame or the absorbed failure.
    pub result: ReelResult<DecodedFrame>,
}

/// Final counts of a finished preload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct PreloadSummary {
    /// Slots in the store.
    pub total: usize,
    /// Slots that decoded successfully.
    pub loaded: usize,
    /// Slots whose load attempt failed.
    pub failed: usize,
}

/// Issues concurrent load+decode requests for every slot of a [`FrameStore`].
#[derive(Clone)]
pub struct Preloader {
    source: Arc<dyn FrameSource>,
    threads: Option<usize>,
}

impl std::fmt::Debug for Preloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preloader")
            .field("threads", &self.threads)
            .finish_non_exhaustive()
    }
}

impl Preloader {
    /// Load frames through `source` on the global rayon pool.
    pub fn new(source: Arc<dyn FrameSource>) -> Self {
        Self {
            source,
            threads: None,
        }
    }

    /// Use a dedicated pool with `threads` workers (`None` = global pool).
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// Start loading every slot of `store`; completions arrive through the returned job.
    ///
    /// Requests are independent and complete in no particular order.
    #[tracing::instrument(skip_all, fields(frames = store.count()))]
    pub fn start(&self, store: &FrameStore) -> ReelResult<PreloadJob> {
        let requests: Vec<(usize, String)> = store
            .iter()
            .enumerate()
            .map(|(i, f)| (i, f.path().to_string()))
            .collect();
        let total = requests.len();
        let (tx, rx) = crossbeam_channel::unbounded();

        let pool = match self.threads {
            Some(n) => Some(build_thread_pool(n)?),
            None => None,
        };

        let source = Arc::clone(&self.source);
        let work = move || {
            requests
                .into_par_iter()
                .for_each_with(tx, |tx, (index, path)| {
                    let result = source.load(&path).and_then(|bytes| decode_frame(&bytes));
                    if let Err(err) = &result {
                        tracing::warn!(index, path = %path, error = %err, "frame load failed");
                    }
                    // Receiver dropped means nobody is waiting anymore.
                    let _ = tx.send(FrameCompletion { index, result });
                });
        };
        match &pool {
            Some(pool) => pool.spawn(work),
            None => rayon::spawn(work),
        }

        Ok(PreloadJob {
            total,
            rx,
            seen: vec![false; total],
            received: 0,
            _pool: pool,
        })
    }

    /// Blocking counting join: load every slot, settle it into `store` and report progress
    /// through `on_tick` after each completion.
    ///
    /// Never fails because of an individual frame; failures count toward completion.
    pub fn preload_all(
        &self,
        store: &mut FrameStore,
        mut on_tick: impl FnMut(PreloadTick),
    ) -> ReelResult<PreloadSummary> {
        let mut job = self.start(store)?;
        let mut progress = PreloadProgress::new(store.count());
        while let Some(done) = job.next_blocking() {
            let ok = done.result.is_ok();
            if store.settle(done.index, done.result) {
                on_tick(progress.record(ok));
            }
        }
        progress.try_resolve();

        Ok(PreloadSummary {
            total: store.count(),
            loaded: store.count_in_state(FrameState::Loaded),
            failed: store.count_in_state(FrameState::Failed),
        })
    }
}

/// Handle on an in-flight preload.
///
/// Yields exactly one [`FrameCompletion`] per slot. If the decode workers go away early, the
/// missing slots are reported as failures so the join still completes.
pub struct PreloadJob {
    total: usize,
    rx: Receiver<FrameCompletion>,
    seen: Vec<bool>,
    received: usize,
    _pool: Option<rayon::ThreadPool>,
}

impl std::fmt::Debug for PreloadJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreloadJob")
            .field("total", &self.total)
            .field("received", &self.received)
            .finish_non_exhaustive()
    }
}

impl PreloadJob {
    /// Completions expected in total.
    pub fn total(&self) -> usize {
        self.total
    }

    /// `true` once every slot has been reported.
    pub fn is_finished(&self) -> bool {
        self.received >= self.total
    }

    /// Next completion if one is ready, without blocking.
    pub fn try_next(&mut self) -> Option<FrameCompletion> {
        if self.is_finished() {
            return None;
        }
        match self.rx.try_recv() {
            Ok(done) => self.accept(done),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => self.synthesize_missing(),
        }
    }

    /// Next completion, blocking until one arrives; `None` once every slot was reported.
    pub fn next_blocking(&mut self) -> Option<FrameCompletion> {
        while !self.is_finished() {
            match self.rx.recv() {
                Ok(done) => {
                    if let Some(done) = self.accept(done) {
                        return Some(done);
                    }
                }
                Err(_) => return self.synthesize_missing(),
            }
        }
        None
    }

    fn accept(&mut self, done: FrameCompletion) -> Option<FrameCompletion> {
        let slot = self.seen.get_mut(done.index)?;
        if *slot {
            return None;
        }
        *slot = true;
        self.received += 1;
        tracing::trace!(
            index = done.index,
            ok = done.result.is_ok(),
            received = self.received,
            total = self.total,
            "frame settled"
        );
        Some(done)
    }

    fn synthesize_missing(&mut self) -> Option<FrameCompletion> {
        let index = self.seen.iter().position(|s| !*s)?;
        self.accept(FrameCompletion {
            index,
            result: Err(ReelError::load(
                "decode worker exited before completing frame",
            )),
        })
    }
}

fn build_thread_pool(threads: usize) -> ReelResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(ReelError::validation(
            "decode threads must be >= 1 when set",
        ));
    }

    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("scrollreel-decode-{i}"))
        .build()
        .map_err(|e| ReelError::load(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/preload/preloader.rs"]
mod tests;
