//! Stories bounded context.
//!
//! Responsible for the ordered, append-only story sequence and for turning
//! an upload into a story ready to be appended.

pub mod application;
pub mod domain;
