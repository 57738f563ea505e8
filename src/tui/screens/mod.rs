//! TUI screen drawing functions.

pub(crate) mod form;
pub(crate) mod result;
