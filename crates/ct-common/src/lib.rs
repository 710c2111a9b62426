//! Care tiering common types, IDs, and errors.
//!
//! This crate provides foundational types shared across the workspace:
//! - Claims domain records (events, diagnoses) and the tier labels
//! - Member and run identity types
//! - The unified error type with stable error codes
//! - Schema versioning and output format selectors

pub mod error;
pub mod event;
pub mod id;
pub mod output;
pub mod schema;
pub mod tier;

pub use error::{Error, Result};
pub use event::{Diagnosis, Event, EventType};
pub use id::{MemberId, RunId};
pub use output::{OutputFormat, RosterFormat};
pub use schema::SCHEMA_VERSION;
pub use tier::{Tier, TieredMember};
