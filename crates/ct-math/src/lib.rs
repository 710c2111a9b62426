//! Care tiering math utilities.

pub mod math;

pub use math::share::*;
pub use math::summary::*;
