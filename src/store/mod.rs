pub(crate) mod bridge;
pub(crate) mod json_file;
pub(crate) mod locate;
pub(crate) mod model;
pub(crate) mod project_store;
