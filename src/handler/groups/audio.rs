//! Audio clips

use crate::handler::classifier::{ClassifierGroup, GroupKind, Matcher, Trigger};

/// Clip shortcuts: trigger phrases and the clip they play
pub const CLIPS: &[(&[&str], &str)] = &[
    (&["bad apple", "badapple"], "badapple"),
    (&["blackbird"], "blackbird"),
    (&["hello there"], "hellothere"),
    (&["windows startup"], "windowsstartup"),
    (&["beep"], "beep"),
    (&["toy story", "you've got a friend in me"], "toystory"),
    (&["earthquake"], "earthquake"),
];

pub fn group() -> ClassifierGroup {
    let mut matchers: Vec<Matcher> = CLIPS
        .iter()
        .map(|(phrases, clip)| {
            let (phrases, clip) = (*phrases, *clip);
            Matcher::new(clip, Trigger::Exact(phrases), move |_, ctx| {
                ctx.console.collaborators.play_audio(clip)?;
                Ok(true)
            })
        })
        .collect();

    matchers.push(Matcher::new(
        "stop audio",
        Trigger::Exact(&["stopaudio", "stop audio", "stop music", "stopmusic"]),
        |_, ctx| {
            ctx.console.collaborators.stop_audio();
            Ok(true)
        },
    ));

    ClassifierGroup::new(GroupKind::Audio, matchers)
}
