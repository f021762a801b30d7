//! `Leadbox` - contact-form storage with a relational/file fallback
//!
//! This crate is the persistence and analytics core behind a small
//! marketing site's contact form: a record store that transparently runs
//! on a relational engine or a flat JSON file, pure aggregation functions
//! for the admin dashboard, and a service boundary that turns everything
//! into `{success, ...}` response envelopes.

// Deny the lints that are almost always bugs
#![deny(
    unsafe_code,
    unsafe_op_in_unsafe_fn,
    unreachable_code,
    unreachable_patterns,
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::dbg_macro,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    future_incompatible,
    rust_2018_idioms,
)]
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
    clippy::missing_errors_doc,        // Will add gradually
    clippy::missing_panics_doc,        // Will add gradually
)]

/// Analytics aggregation over in-memory contact rows
pub mod analytics;
/// Configuration management for storage and retention settings
pub mod config;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;
/// CSV/JSON export rendering
pub mod export;
/// Notification dispatcher seam
pub mod notify;
/// Response-envelope service boundary
pub mod service;
/// Record store trait, backends and fallback selector
pub mod store;

#[cfg(test)]
pub mod test_utils;
