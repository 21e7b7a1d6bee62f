//! Built-in classifier groups
//!
//! One module per [`GroupKind`](super::classifier::GroupKind). Each exposes a
//! `group()` constructor returning its matchers in evaluation order.

pub mod audio;
pub mod fallback;
pub mod frame;
pub mod general_commands;
pub mod general_prints;
pub mod image_prints;
pub mod openers;
pub mod widgets;

use super::classifier::{ClassifierGroup, HandlerContext};

/// Every built-in group
pub fn all() -> Vec<ClassifierGroup> {
    vec![
        general_prints::group(),
        image_prints::group(),
        widgets::group(),
        frame::group(),
        openers::group(),
        audio::group(),
        general_commands::group(),
        fallback::group(),
    ]
}

/// Print a usage line and report the command as handled
pub(crate) fn usage(ctx: &HandlerContext<'_>, text: &str) -> anyhow::Result<bool> {
    ctx.printer.println(format!("Usage: {}", text));
    Ok(true)
}
