pub(crate) mod apply;
pub(crate) mod engine;
pub(crate) mod queue;
pub(crate) mod timer;
pub(crate) mod topology;
