pub(crate) mod animation;
pub(crate) mod host;
