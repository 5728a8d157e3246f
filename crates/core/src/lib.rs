//! Domain types and pure logic for the mock warehouse load service.
//!
//! Nothing in this crate touches the network or spawns tasks: the job record
//! and its state machine live in [`job`], the data-quality rules in
//! [`quality`].

pub mod error;
pub mod job;
pub mod quality;
pub mod types;
