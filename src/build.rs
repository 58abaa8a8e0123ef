//! Build passes run by [`crate::Bundle::build`], in order: source resolution, asset extraction,
//! renaming, duplicate reduction and the plugin phase.

pub(crate) mod dedup;
pub(crate) mod extract;
pub(crate) mod options;
pub(crate) mod pipeline;
pub(crate) mod rename;
pub(crate) mod resolve;
