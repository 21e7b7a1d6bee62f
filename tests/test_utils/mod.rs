//! Test Utilities and Mocks
//!
//! Console fixtures backed by an in-memory sink and collaborators that
//! record what they were asked to do.

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_collaborators;

pub use fixtures::{start_console, test_config, TestConsole};
pub use mock_collaborators::RecordingCollaborators;
