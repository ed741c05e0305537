pub(crate) mod cpu;
pub(crate) mod geometry;
pub(crate) mod renderer;
pub(crate) mod surface;
