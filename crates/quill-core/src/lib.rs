//! Core library for the Quill blog client.
//!
//! HTTP access, session storage, the client-side store and its persistence.
//! The TUI and the CLI are thin shells over this crate.

pub mod api;
pub mod config;
pub mod i18n;
pub mod logging;
pub mod models;
pub mod persist;
pub mod present;
pub mod session;
pub mod store;
