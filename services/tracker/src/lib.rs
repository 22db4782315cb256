//! services/tracker/src/lib.rs
//!
//! Library half of the `tracker` binary: storage adapters, the session and
//! document stores, input validation and the command-line layer.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod stores;
pub mod validation;
