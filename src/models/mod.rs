//! Core data models for Cyder
//!
//! The parsed form of a console input line and the items that travel
//! through the printing queue.

pub mod command;
pub mod printable;

// Re-exports for convenience
pub use command::{InputSource, ParsedCommand};
pub use printable::{Component, Icon, Printable};
