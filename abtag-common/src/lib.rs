//! # abtag common library
//!
//! Shared code for the AcousticBrainz tagging crates:
//! - Error types
//! - TOML configuration loading
//! - Logging initialization

pub mod config;
pub mod error;
pub mod logging;

pub use config::{AcousticBrainzConfig, LoggingConfig, TomlConfig};
pub use error::{Error, Result};
