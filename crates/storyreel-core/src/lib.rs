//! Shared abstractions for the Storyreel story viewer.
//!
//! This crate defines the seams every other crate depends on: time,
//! host scheduling, rendering, and blob storage. It contains no
//! infrastructure code.

pub mod blob;
pub mod clock;
pub mod command;
pub mod error;
pub mod render;
pub mod scheduler;
