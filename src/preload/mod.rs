pub(crate) mod preloader;
pub(crate) mod progress;
