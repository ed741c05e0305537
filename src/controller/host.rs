use std::time::Duration;

use crate::foundation::core::{ContainerGeometry, Viewport};

/// Navbar chrome state; both flags follow the past-intro signal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct NavState {
    /// The navbar is visible.
    pub shown: bool,
    /// The navbar uses its scrolled styling.
    pub scrolled: bool,
}

impl NavState {
    /// Nav state for a past-intro flag.
    pub fn from_past_intro(past_intro: bool) -> Self {
        Self {
            shown: past_intro,
            scrolled: past_intro,
        }
    }
}

/// Deferred work the controller asks the host to run later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerTask {
    /// Remove the loader element once its fade-out finished.
    RemoveLoader,
}

/// Events the host delivers to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// The viewport changed size.
    Resize,
    /// The page scrolled.
    Scroll,
    /// A rendering-frame callback requested via [`Host::request_animation_frame`] fired.
    AnimationFrame,
    /// A timer registered via [`Host::set_timeout`] fired.
    Timer(TimerTask),
}

/// Environment collaborators consumed by the animation controller: geometry queries, page
/// chrome, and the two deferral primitives.
///
/// Implementations only record or apply what they are told; all policy lives in the
/// controller.
pub trait Host {
    /// Current viewport size and pixel density.
    fn viewport(&self) -> Viewport;

    /// Current bounding geometry of the tracked intro container.
    fn container_geometry(&self) -> ContainerGeometry;

    /// Show loader progress text such as `"42%"`.
    fn set_loader_progress(&mut self, label: &str);

    /// Put the loader into its "done" (fading out) state.
    fn mark_loader_done(&mut self);

    /// Remove the loader from the page.
    fn remove_loader(&mut self);

    /// Set the intro overlay opacity.
    fn set_overlay_opacity(&mut self, opacity: f64);

    /// Apply the navbar "show"/"scrolled" toggles.
    fn set_nav_state(&mut self, nav: NavState);

    /// Ask for one [`HostEvent::AnimationFrame`] at the next rendering opportunity.
    fn request_animation_frame(&mut self);

    /// Ask for one [`HostEvent::Timer`] carrying `task` after `delay`.
    fn set_timeout(&mut self, delay: Duration, task: TimerTask);
}
