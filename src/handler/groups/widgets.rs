//! Widget windows, looked up in the widget registry

use tracing::info;

use crate::handler::classifier::{ClassifierGroup, GroupKind, Matcher, Trigger};

pub fn group() -> ClassifierGroup {
    ClassifierGroup::new(
        GroupKind::Widgets,
        vec![Matcher::new("widget", Trigger::Always, |cmd, ctx| {
            let Some(widget) = ctx.widgets.find(&cmd.lowercase_text()) else {
                return Ok(false);
            };
            info!("Opening widget {}", widget.name);
            ctx.console.collaborators.open_widget(widget.name)?;
            Ok(true)
        })],
    )
}
