use crate::{
    config::model::AnimatorConfig,
    controller::host::{Host, HostEvent, NavState, TimerTask},
    foundation::error::{ReelError, ReelResult},
    frames::store::FrameStore,
    preload::preloader::{FrameCompletion, PreloadJob, Preloader},
    preload::progress::PreloadProgress,
    render::renderer::{DrawOutcome, Renderer},
    render::surface::Surface,
    scroll::mapper::{ScrollMapper, ScrollSample},
};

/// Lifecycle phase of an [`AnimationController`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Constructed, not started.
    Initializing,
    /// Frames are loading; resize is live, scroll is not.
    Preloading,
    /// Steady state: scroll drives frames.
    Ready,
}

/// Mutable animation state owned by the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct AnimationState {
    /// Frame currently shown; `None` until the first draw after preloading.
    pub current_frame: Option<usize>,
    /// Load attempts completed (successes and failures).
    pub loaded_count: usize,
    /// A scroll computation is waiting for its animation frame.
    pub redraw_scheduled: bool,
}

/// Counters describing scroll coalescing and redraw work.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ControllerStats {
    /// Scroll events received while the scroll listener was registered.
    pub scroll_events: u64,
    /// Scroll events dropped because a computation was already scheduled.
    pub coalesced_scrolls: u64,
    /// Progress computations run in animation frames.
    pub computations: u64,
    /// Frame redraws requested by computations (frame index changed).
    pub redraws: u64,
    /// Resize events handled.
    pub resizes: u64,
}

#[derive(Clone, Copy, Debug, Default)]
struct Listeners {
    resize: bool,
    scroll: bool,
}

/// Orchestrates preloading, scroll mapping and redraws for one frame sequence.
///
/// Single-threaded: every method runs on the thread that owns the controller, so state
/// mutations never interleave. Decode completions are pulled in with [`poll`](Self::poll) or
/// [`wait_until_ready`](Self::wait_until_ready).
pub struct AnimationController<S: Surface, H: Host> {
    config: AnimatorConfig,
    mapper: ScrollMapper,
    store: FrameStore,
    renderer: Renderer<S>,
    host: H,
    phase: Phase,
    state: AnimationState,
    progress: PreloadProgress,
    job: Option<PreloadJob>,
    listeners: Listeners,
    stats: ControllerStats,
    last_sample: Option<ScrollSample>,
}

impl<S: Surface, H: Host> std::fmt::Debug for AnimationController<S, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationController")
            .field("phase", &self.phase)
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<S: Surface, H: Host> AnimationController<S, H> {
    /// Build a controller for the sequence described by `config`.
    pub fn new(config: AnimatorConfig, surface: S, host: H) -> ReelResult<Self> {
        config.validate()?;
        let store = FrameStore::from_config(&config);
        Ok(Self {
            mapper: ScrollMapper::from_config(&config),
            progress: PreloadProgress::new(store.count()),
            store,
            renderer: Renderer::new(surface),
            host,
            phase: Phase::Initializing,
            state: AnimationState::default(),
            job: None,
            listeners: Listeners::default(),
            stats: ControllerStats::default(),
            last_sample: None,
            config,
        })
    }

    /// Initializing → preloading: size and draw the surface, listen for resizes, start
    /// loading every frame through `preloader`.
    #[tracing::instrument(skip_all, fields(frames = self.store.count()))]
    pub fn start(&mut self, preloader: &Preloader) -> ReelResult<()> {
        if self.phase != Phase::Initializing {
            return Err(ReelError::validation("controller already started"));
        }

        self.renderer
            .resize(self.host.viewport(), &self.store, self.state.current_frame);
        self.listeners.resize = true;

        self.job = Some(preloader.start(&self.store)?);
        self.phase = Phase::Preloading;
        tracing::debug!("preloading");

        if self.progress.try_resolve() {
            self.enter_ready();
        }
        Ok(())
    }

    /// Apply every decode completion that is already available. Returns how many were
    /// applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Some(done) = self.job.as_mut().and_then(PreloadJob::try_next) {
            self.apply_completion(done);
            applied += 1;
        }
        applied
    }

    /// Block until the preload resolves and the controller is ready.
    pub fn wait_until_ready(&mut self) {
        while let Some(done) = self.job.as_mut().and_then(PreloadJob::next_blocking) {
            self.apply_completion(done);
        }
    }

    /// Dispatch one host event.
    pub fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::Resize => self.on_resize(),
            HostEvent::Scroll => self.on_scroll(),
            HostEvent::AnimationFrame => {
                self.on_animation_frame();
            }
            HostEvent::Timer(task) => self.on_timer(task),
        }
    }

    /// Resize listener: re-match the surface to the viewport and redraw the current frame.
    pub fn on_resize(&mut self) {
        if !self.listeners.resize {
            return;
        }
        self.stats.resizes += 1;
        self.renderer
            .resize(self.host.viewport(), &self.store, self.state.current_frame);
    }

    /// Scroll listener: schedule at most one computation per animation frame.
    pub fn on_scroll(&mut self) {
        if !self.listeners.scroll {
            return;
        }
        self.stats.scroll_events += 1;
        if self.state.redraw_scheduled {
            self.stats.coalesced_scrolls += 1;
            return;
        }
        self.state.redraw_scheduled = true;
        self.host.request_animation_frame();
    }

    /// Animation-frame callback: map progress, redraw on frame change, update overlay and nav.
    ///
    /// Returns `None` when no computation was scheduled.
    pub fn on_animation_frame(&mut self) -> Option<ScrollSample> {
        if !self.state.redraw_scheduled {
            return None;
        }

        let viewport = self.host.viewport();
        let sample = self
            .mapper
            .sample(self.host.container_geometry(), viewport.height);
        self.stats.computations += 1;

        if self.state.current_frame != Some(sample.frame_index) {
            self.state.current_frame = Some(sample.frame_index);
            self.stats.redraws += 1;
            if let DrawOutcome::Skipped = self.renderer.draw_index(&self.store, sample.frame_index)
            {
                tracing::trace!(index = sample.frame_index, "frame unavailable, kept previous");
            }
        }

        self.host.set_overlay_opacity(sample.overlay_opacity);
        self.host
            .set_nav_state(NavState::from_past_intro(sample.past_intro));
        tracing::trace!(
            progress = sample.progress,
            frame = sample.frame_index,
            opacity = sample.overlay_opacity,
            past_intro = sample.past_intro,
            "scroll tick"
        );

        self.state.redraw_scheduled = false;
        self.last_sample = Some(sample);
        Some(sample)
    }

    /// Timer callback.
    pub fn on_timer(&mut self, task: TimerTask) {
        match task {
            TimerTask::RemoveLoader => {
                self.host.remove_loader();
                tracing::debug!("loader removed");
            }
        }
    }

    fn apply_completion(&mut self, done: FrameCompletion) {
        let ok = done.result.is_ok();
        if !self.store.settle(done.index, done.result) {
            return;
        }
        self.state.loaded_count += 1;
        let tick = self.progress.record(ok);
        self.host.set_loader_progress(&tick.label());
        if tick.resolved {
            self.enter_ready();
        }
    }

    fn enter_ready(&mut self) {
        self.job = None;
        self.host.mark_loader_done();
        self.host
            .set_timeout(self.config.loader_removal_delay(), TimerTask::RemoveLoader);

        self.state.current_frame = Some(0);
        self.renderer.draw_index(&self.store, 0);

        self.listeners.scroll = true;
        self.phase = Phase::Ready;
        tracing::debug!(
            loaded = self.state.loaded_count,
            failed = self.progress.failed(),
            "ready"
        );

        self.on_scroll();
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current animation state.
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Coalescing and redraw counters.
    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    /// Result of the most recent computation.
    pub fn last_sample(&self) -> Option<ScrollSample> {
        self.last_sample
    }

    /// Preload join state.
    pub fn progress(&self) -> &PreloadProgress {
        &self.progress
    }

    /// Frame slots.
    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    /// Configuration in use.
    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    /// The drawing surface.
    pub fn surface(&self) -> &S {
        self.renderer.surface()
    }

    /// Host collaborators.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access, for drivers that simulate environment changes.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

#[cfg(test)]
#[path = "../../tests/unit/controller/animation.rs"]
mod tests;
