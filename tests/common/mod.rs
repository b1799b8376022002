//! Common test utilities and helpers
//!
//! This module provides shared functionality used across integration tests:
//! - Binary path resolution (via `get_builder_binary`)
//! - A scratch project with a recording fake `cmake` (via `helpers`)

pub(crate) mod helpers;

// Re-export for convenient access
#[allow(unused_imports)]
pub(crate) use helpers::{FakeProject, get_builder_binary, output_text};
