//! Common test utilities for synec integration tests.
//!
//! This module provides:
//! - `TestConsumer`: a consumer project with sibling source packages in a temp dir
//! - `RecordingInstaller`: a `PackageInstaller` that copies instead of calling npm
//! - `EventLog`: an event sink that keeps every emitted event

#![allow(dead_code)]

pub mod consumer;
pub mod installer;

pub use consumer::*;
pub use installer::*;

use std::time::{Duration, Instant};

/// Poll `condition` until it holds or `timeout` passes.
pub fn wait_for(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    condition()
}
