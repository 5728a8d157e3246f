//! Load job execution engine.
//!
//! Contains the in-memory job registry that handlers read from, and the
//! driver that runs each job's timeline on its own Tokio task and writes
//! the resulting state changes back into the registry.

pub mod driver;
pub mod registry;

pub use driver::{JobDriver, JobTimeline};
pub use registry::JobRegistry;
