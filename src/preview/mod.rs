pub(crate) mod composite;
pub(crate) mod filter;
pub(crate) mod plan;
pub(crate) mod playback;
pub(crate) mod render;
pub(crate) mod surface;
