//! Image blob storage for the Storyreel story viewer.
//!
//! Blobs live only as long as the process: sessions are ephemeral and
//! nothing is written to disk.

pub mod memory_blob_store;
