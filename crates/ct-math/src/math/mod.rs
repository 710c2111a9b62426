//! Core math modules.

pub mod share;
pub mod summary;
