//! # trigger-spool
//!
//! Single-consumer trigger execution engine for live-stream platform events.
//!
//! Events (chat messages, subs, raids, poll results, timers, music events...)
//! are queued, classified into canonical trigger keys, gated by permissions
//! and cooldowns, then run through an ordered sequence of overlay, chat and
//! music actions. Newer dispatches preempt stale in-flight sequences.

pub mod collab;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod model;
pub mod telemetry;
pub mod text;

pub use error::{Error, Result};
