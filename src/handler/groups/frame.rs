//! Console frame placement and title

use crate::collaborators::FramePosition;
use crate::handler::classifier::{ClassifierGroup, GroupKind, Matcher, Trigger};

const POSITIONS: &[(&[&str], FramePosition)] = &[
    (&["top left", "topleft"], FramePosition::TopLeft),
    (&["top right", "topright"], FramePosition::TopRight),
    (&["bottom left", "bottomleft"], FramePosition::BottomLeft),
    (&["bottom right", "bottomright"], FramePosition::BottomRight),
    (&["middle", "center", "centre"], FramePosition::Center),
];

pub fn group() -> ClassifierGroup {
    let mut matchers: Vec<Matcher> = POSITIONS
        .iter()
        .map(|(phrases, position)| {
            let (phrases, position) = (*phrases, *position);
            Matcher::new(position.label(), Trigger::Exact(phrases), move |_, ctx| {
                ctx.console.collaborators.move_frame(position)?;
                Ok(true)
            })
        })
        .collect();

    matchers.push(Matcher::new(
        "frame title",
        Trigger::Verb(&["frametitle", "consoletitle"]),
        |cmd, ctx| {
            if cmd.arg_count() == 0 {
                return super::usage(ctx, "frametitle <title>");
            }
            ctx.console.collaborators.set_frame_title(&cmd.rest())?;
            Ok(true)
        },
    ));

    ClassifierGroup::new(GroupKind::FrameMovement, matchers)
}
