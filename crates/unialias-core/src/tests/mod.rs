//! Test module for unialias-core
//!
//! Covers the parts that only make sense together:
//! - Selection wrap-around and last-query-wins as properties
//! - Window launcher registry, idempotent open and creation failures
//! - Theme convergence across windows over the event channel
//! - Main window keyboard contract and full type-navigate-confirm flows
//! - Settings and dataset management windows

mod fixtures;
mod main_window_tests;
