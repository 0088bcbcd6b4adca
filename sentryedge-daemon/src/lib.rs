//! SentryEdge daemon library.
//!
//! This library exposes internal modules for integration testing.
//! In production, `sentryedge-daemon` is used as a binary (main.rs).

pub mod app;
pub mod bootstrap;
pub mod cli;
pub mod logging;
pub mod metrics_server;
