//! Core types, configuration, and errors for the scout file finder.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - [`FileRecord`] - a matched path plus its modification timestamp
//! - [`ExtensionFilter`] - extension-set matching with a wildcard sentinel
//! - [`FindConfig`] / [`BackendKind`] - the immutable scan request
//! - [`ConfigError`] - configuration validation errors

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod extensions;
pub mod record;

pub use config::{BackendKind, FindConfig};
pub use error::ConfigError;
pub use extensions::ExtensionFilter;
pub use record::{mtime_millis, FileRecord};
