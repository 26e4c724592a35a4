//! Test Helper Utilities
//!
//! Shared utilities for testing abtag-plugin

#![allow(dead_code)]

pub mod log_capture;
pub mod manual_webservice;

pub use log_capture::{LogCapture, LogRecord};
pub use manual_webservice::ManualWebService;

use abtag_plugin::host::tags;
use abtag_plugin::{Metadata, SharedMetadata};

pub const RECORDING_A: &str = "2f1b2c3d-4e5f-4a6b-8c7d-9e0f1a2b3c4d";
pub const RECORDING_B: &str = "c0ffee00-1234-4abc-9def-0123456789ab";
pub const RECORDING_C: &str = "deadbeef-0000-4000-8000-000000000001";

/// Track metadata holding a title and recording id
pub fn track(title: &str, recording_id: &str) -> SharedMetadata {
    let mut m = Metadata::new();
    m.set(tags::TITLE, title);
    m.set(tags::RECORDING_ID, recording_id);
    m.into_shared()
}
