//! Image prints and commands that start background activities

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::collaborators::Collaborators;
use crate::console::activity::YOUTUBE_ACTIVITY;
use crate::console::{bletchy, CancellationToken, Printer};
use crate::handler::classifier::{ClassifierGroup, GroupKind, Matcher, Trigger};
use crate::models::Icon;

/// Characters a video id is drawn from
const VIDEO_ID_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
/// Length of a video id
pub const VIDEO_ID_LEN: usize = 11;
/// Pause between probes
const PROBE_INTERVAL: Duration = Duration::from_millis(250);

/// Random candidate video id
pub fn random_video_id<R: Rng>(rng: &mut R) -> String {
    (0..VIDEO_ID_LEN)
        .map(|_| VIDEO_ID_ALPHABET[rng.gen_range(0..VIDEO_ID_ALPHABET.len())] as char)
        .collect()
}

pub fn group() -> ClassifierGroup {
    ClassifierGroup::new(
        GroupKind::ImagePrints,
        vec![
            Matcher::new("logo", Trigger::Exact(&["logo", "cyder"]), |_, ctx| {
                ctx.printer.print_icon(Icon::new("cyder_logo"));
                ctx.printer.println("");
                Ok(true)
            }),
            Matcher::new("bletchy", Trigger::Verb(&["bletchy"]), |cmd, ctx| {
                if cmd.arg_count() == 0 {
                    return super::usage(ctx, "bletchy <text>");
                }
                bletchy::start(ctx.console, &cmd.rest());
                Ok(true)
            }),
            Matcher::new(
                "youtube",
                Trigger::Exact(&["youtube", "random youtube", "youtube thread"]),
                |_, ctx| {
                    let printer = ctx.printer.clone();
                    let collaborators = Arc::clone(&ctx.console.collaborators);
                    ctx.console.activities.spawn(YOUTUBE_ACTIVITY, move |token| {
                        probe_videos(printer, collaborators, token)
                    });
                    Ok(true)
                },
            ),
            Matcher::new("stopscript", Trigger::Exact(&["stopscript"]), |_, ctx| {
                if ctx.console.activities.cancel(YOUTUBE_ACTIVITY).is_some() {
                    ctx.printer.println("YouTube script stopped");
                } else {
                    ctx.printer.println("No script is running");
                }
                Ok(true)
            }),
        ],
    )
}

/// Probe random ids until one resolves or the activity is cancelled
async fn probe_videos(
    printer: Printer,
    collaborators: Arc<dyn Collaborators>,
    token: CancellationToken,
) {
    printer.println("Searching for a random video, type stopscript to cancel");
    let mut attempts = 0u64;
    while !token.is_cancelled() {
        let id = random_video_id(&mut rand::thread_rng());
        attempts += 1;
        debug!("Probing video id {}", id);

        if collaborators.probe_video(&id).await {
            let url = format!("https://www.youtube.com/watch?v={}", id);
            info!("Found video {} after {} attempts", id, attempts);
            printer.println(format!("Found a video: {}", url));
            if let Err(e) = collaborators.open_url(&url) {
                debug!("Could not open {}: {}", url, e);
            }
            return;
        }

        if !token.sleep(PROBE_INTERVAL).await {
            break;
        }
    }
    debug!("Video probe cancelled after {} attempts", attempts);
}
