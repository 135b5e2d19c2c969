//! Story playback engine.
//!
//! A host-agnostic state machine that plays stories full-screen in
//! sequence. The host supplies a [`Clock`](storyreel_core::clock::Clock), a
//! [`Scheduler`](storyreel_core::scheduler::Scheduler) for frames and
//! deadlines, and a [`ViewRenderer`](storyreel_core::render::ViewRenderer);
//! the [`controller::PlaybackController`] does the rest.

pub mod commands;
pub mod config;
pub mod controller;
pub mod input;
pub mod timer;
