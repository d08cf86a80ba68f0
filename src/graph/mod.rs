pub(crate) mod clamp;
#[allow(clippy::module_inception)]
pub(crate) mod graph;
pub(crate) mod instance;
