//! Core types, configuration, diagnostics, and error handling for gitdelta.
//!
//! This crate provides the shared foundation used by all other gitdelta crates:
//! - [`DeltaError`]: unified error type using `thiserror`
//! - [`DeltaConfig`]: configuration loaded from `.gitdelta.toml`
//! - [`DiagnosticSink`]: injected collector for "warn and continue" parse events
//! - [`CommandRunner`]: the contract for running external git commands

pub mod command;
mod config;
pub mod diagnostics;
mod error;
mod types;

pub use command::{CommandOutput, CommandRunner};
pub use config::{DeltaConfig, GitConfig, GraphConfig};
pub use diagnostics::{Diagnostic, DiagnosticSink, Diagnostics, Severity, TracingSink};
pub use error::DeltaError;
pub use types::OutputFormat;

/// A convenience `Result` type for gitdelta operations.
pub type Result<T> = std::result::Result<T, DeltaError>;
