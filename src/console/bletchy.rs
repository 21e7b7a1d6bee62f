//! Bletchy text scramble effect
//!
//! Reveals a target string one character at a time through random noise.
//! Each frame is printed on the priority lane as a carriage-return line, so
//! the console overwrites the previous frame in place.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::activity::{CancellationToken, BLETCHY_ACTIVITY};
use super::printer::Printer;
use super::ConsoleShared;

const NOISE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Noise frames shown before each character locks in
pub const ITERATIONS_PER_CHAR: usize = 3;

/// Longest text the effect will animate
pub const MAX_TARGET_CHARS: usize = 120;

/// Delay between frames
pub const FRAME_DELAY: Duration = Duration::from_millis(40);

/// Frames of the effect, generated one at a time
#[derive(Debug)]
pub struct Frames<R> {
    chars: Vec<char>,
    rng: R,
    step: usize,
}

/// Frames for `target`, ending with the target itself
pub fn frames<R: Rng>(target: &str, rng: R) -> Frames<R> {
    Frames {
        chars: target.chars().collect(),
        rng,
        step: 0,
    }
}

impl<R> Frames<R> {
    fn total(&self) -> usize {
        self.chars.len() * ITERATIONS_PER_CHAR + 1
    }
}

impl<R: Rng> Iterator for Frames<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.step >= self.total() {
            return None;
        }
        let revealed = self.step / ITERATIONS_PER_CHAR;
        self.step += 1;

        let rng = &mut self.rng;
        let frame = self
            .chars
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                if i < revealed || c.is_whitespace() {
                    c
                } else {
                    NOISE[rng.gen_range(0..NOISE.len())] as char
                }
            })
            .collect();
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total() - self.step;
        (left, Some(left))
    }
}

impl<R: Rng> ExactSizeIterator for Frames<R> {}

/// The part of `target` the effect animates
pub fn clip_target(target: &str) -> String {
    target.chars().take(MAX_TARGET_CHARS).collect()
}

/// Start the bletchy animation as a named background activity.
///
/// Text past [`MAX_TARGET_CHARS`] is cut off.
pub fn start(console: &ConsoleShared, target: &str) -> CancellationToken {
    let printer = console.printer();
    let target = clip_target(target);
    console.activities.spawn(BLETCHY_ACTIVITY, move |token| {
        animate(printer, target, StdRng::from_entropy(), token)
    })
}

async fn animate(printer: Printer, target: String, rng: StdRng, token: CancellationToken) {
    for frame in frames(&target, rng) {
        if token.is_cancelled() {
            break;
        }
        printer.print_priority(format!("\r{}", frame));
        if !token.sleep(FRAME_DELAY).await {
            break;
        }
    }
    // Always settle on the target so an escape leaves readable output
    printer.println_priority(format!("\r{}", target));
}
