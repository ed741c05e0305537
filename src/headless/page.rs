use std::time::Duration;

use crate::{
    config::model::AnimatorConfig,
    controller::animation::AnimationController,
    controller::host::{Host, HostEvent, NavState, TimerTask},
    foundation::core::{ContainerGeometry, Viewport},
    foundation::error::ReelResult,
    preload::preloader::Preloader,
    render::surface::Surface,
    scroll::mapper::ScrollSample,
};

/// Loader element state as seen by a headless page.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct LoaderState {
    /// Last progress text shown.
    pub label: String,
    /// The "done" class was applied.
    pub done: bool,
    /// The element was removed.
    pub removed: bool,
}

#[derive(Clone, Copy, Debug)]
struct PendingTimer {
    due: Duration,
    task: TimerTask,
}

/// In-memory page: a viewport, an intro container at a fixed document offset, a scroll
/// position, and the chrome the controller drives.
///
/// Animation-frame requests and timers are queued and only fire when the driver advances them.
#[derive(Clone, Debug)]
pub struct HeadlessHost {
    viewport: Viewport,
    container_offset: f64,
    container_height: f64,
    scroll_y: f64,
    loader: LoaderState,
    progress_labels: Vec<String>,
    overlay_opacity: f64,
    nav: NavState,
    frame_requested: bool,
    frame_requests_total: u64,
    now: Duration,
    timers: Vec<PendingTimer>,
}

impl HeadlessHost {
    /// A page whose intro container starts `container_offset` units from the document top and is
    /// `container_height` tall.
    pub fn new(viewport: Viewport, container_offset: f64, container_height: f64) -> Self {
        Self {
            viewport,
            container_offset,
            container_height,
            scroll_y: 0.0,
            loader: LoaderState::default(),
            progress_labels: Vec::new(),
            overlay_opacity: 1.0,
            nav: NavState::default(),
            frame_requested: false,
            frame_requests_total: 0,
            now: Duration::ZERO,
            timers: Vec::new(),
        }
    }

    /// Scroll offset at which the container bottom meets the viewport bottom.
    pub fn intro_scroll_end(&self) -> f64 {
        (self.container_offset + self.container_height - self.viewport.height).max(0.0)
    }

    /// Move the document scroll position (never above the top).
    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_y = if y.is_finite() { y.max(0.0) } else { 0.0 };
    }

    /// Current document scroll position.
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Replace the viewport.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Consume a pending animation-frame request, if any.
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    /// Animation frames requested since construction.
    pub fn frame_requests_total(&self) -> u64 {
        self.frame_requests_total
    }

    /// Advance the clock by `dt`, returning tasks whose delay elapsed, in due order.
    pub fn advance_time(&mut self, dt: Duration) -> Vec<TimerTask> {
        self.now += dt;
        let now = self.now;
        let mut due: Vec<PendingTimer> = Vec::new();
        self.timers.retain(|t| {
            if t.due <= now {
                due.push(*t);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|t| t.due);
        due.into_iter().map(|t| t.task).collect()
    }

    /// Number of timers still waiting.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Loader element state.
    pub fn loader(&self) -> &LoaderState {
        &self.loader
    }

    /// Every progress label shown, oldest first.
    pub fn progress_labels(&self) -> &[String] {
        &self.progress_labels
    }

    /// Current overlay opacity (starts fully opaque).
    pub fn overlay_opacity(&self) -> f64 {
        self.overlay_opacity
    }

    /// Current navbar state.
    pub fn nav(&self) -> NavState {
        self.nav
    }
}

impl Host for HeadlessHost {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn container_geometry(&self) -> ContainerGeometry {
        ContainerGeometry::from_top_and_height(
            self.container_offset - self.scroll_y,
            self.container_height,
        )
    }

    fn set_loader_progress(&mut self, label: &str) {
        self.loader.label = label.to_string();
        self.progress_labels.push(label.to_string());
    }

    fn mark_loader_done(&mut self) {
        self.loader.done = true;
    }

    fn remove_loader(&mut self) {
        self.loader.removed = true;
    }

    fn set_overlay_opacity(&mut self, opacity: f64) {
        self.overlay_opacity = opacity;
    }

    fn set_nav_state(&mut self, nav: NavState) {
        self.nav = nav;
    }

    fn request_animation_frame(&mut self) {
        self.frame_requested = true;
        self.frame_requests_total += 1;
    }

    fn set_timeout(&mut self, delay: Duration, task: TimerTask) {
        self.timers.push(PendingTimer {
            due: self.now + delay,
            task,
        });
    }
}

/// Drives an [`AnimationController`] against a [`HeadlessHost`] the way a browser event loop
/// would: events are dispatched, then rendering frames and timers fire when advanced.
pub struct HeadlessPage<S: Surface> {
    controller: AnimationController<S, HeadlessHost>,
}

impl<S: Surface> HeadlessPage<S> {
    /// Build a page for `config` painting onto `surface`.
    pub fn new(config: AnimatorConfig, surface: S, host: HeadlessHost) -> ReelResult<Self> {
        Ok(Self {
            controller: AnimationController::new(config, surface, host)?,
        })
    }

    /// Start the controller (initial draw, resize listener, preload).
    pub fn start(&mut self, preloader: &Preloader) -> ReelResult<()> {
        self.controller.start(preloader)
    }

    /// Block until every frame settled and the controller is ready.
    pub fn wait_until_ready(&mut self) {
        self.controller.wait_until_ready();
    }

    /// Scroll the document and dispatch a scroll event.
    pub fn scroll_to(&mut self, y: f64) {
        self.controller.host_mut().scroll_to(y);
        self.controller.handle(HostEvent::Scroll);
    }

    /// Dispatch a scroll event without moving.
    pub fn dispatch_scroll(&mut self) {
        self.controller.handle(HostEvent::Scroll);
    }

    /// Change the viewport and dispatch a resize event.
    pub fn resize(&mut self, viewport: Viewport) {
        self.controller.host_mut().set_viewport(viewport);
        self.controller.handle(HostEvent::Resize);
    }

    /// One event-loop turn at a rendering opportunity: apply ready decode completions, then run
    /// the pending animation-frame callback if one was requested.
    pub fn advance_frame(&mut self) -> Option<ScrollSample> {
        self.controller.poll();
        if self.controller.host_mut().take_frame_request() {
            self.controller.on_animation_frame()
        } else {
            None
        }
    }

    /// Advance the page clock and fire due timers.
    pub fn advance_time(&mut self, dt: Duration) {
        for task in self.controller.host_mut().advance_time(dt) {
            self.controller.handle(HostEvent::Timer(task));
        }
    }

    /// The controller.
    pub fn controller(&self) -> &AnimationController<S, HeadlessHost> {
        &self.controller
    }

    /// The simulated page.
    pub fn host(&self) -> &HeadlessHost {
        self.controller.host()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/headless/page.rs"]
mod tests;
