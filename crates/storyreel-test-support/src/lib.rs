//! Shared test mocks and utilities for the Storyreel story viewer.

mod blob;
mod clock;
mod host;
mod render;
mod scheduler;

pub use blob::FailingBlobStore;
pub use clock::{ManualClock, epoch};
pub use host::ManualHost;
pub use render::{RecordingRenderer, RenderEvent};
pub use scheduler::{DEFAULT_FRAME_INTERVAL, ManualScheduler};
