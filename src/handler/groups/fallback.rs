//! Last-resort interpretations: URLs, math, preference toggles and tests

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::error::Error;
use crate::handler::classifier::{ClassifierGroup, GroupKind, Matcher, Trigger};
use crate::handler::math;
use crate::models::ParsedCommand;
use crate::preferences::find_preference;

static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:(https?)://[^\s/$.?#][^\s]*|www\.[a-z0-9-]+(?:\.[a-z0-9-]+)+(?:/\S*)?|[a-z0-9-]+(?:\.[a-z0-9-]+)*\.(?:com|org|net|io|dev|edu|gov|rs)(?:/\S*)?)$",
    )
    .expect("valid regex")
});

/// The input as an openable URL, if it is one
pub fn as_url(text: &str) -> Option<String> {
    let text = text.trim();
    if text.contains(char::is_whitespace) || !URL.is_match(text) {
        return None;
    }
    let lower = text.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Some(text.to_string())
    } else {
        Some(format!("https://{}", text))
    }
}

fn is_url(cmd: &ParsedCommand) -> bool {
    as_url(cmd.text()).is_some()
}

fn is_expression(cmd: &ParsedCommand) -> bool {
    math::looks_like_expression(cmd.text())
}

pub fn group() -> ClassifierGroup {
    ClassifierGroup::new(
        GroupKind::Fallback,
        vec![
            Matcher::new("url", Trigger::Predicate(is_url), |cmd, ctx| {
                let Some(url) = as_url(cmd.text()) else {
                    return Ok(false);
                };
                info!("Opening {}", url);
                ctx.console.collaborators.open_url(&url)?;
                Ok(true)
            }),
            Matcher::new("math function", Trigger::Always, |cmd, ctx| {
                match math::evaluate_function(cmd.text()) {
                    None => Ok(false),
                    Some(Ok(value)) => {
                        ctx.printer.println(value);
                        Ok(true)
                    }
                    Some(Err(Error::Usage { usage })) => super::usage(ctx, &usage),
                    Some(Err(e)) => Err(e.into()),
                }
            }),
            Matcher::new("expression", Trigger::Predicate(is_expression), |cmd, ctx| {
                let value = math::evaluate_expression(cmd.text())?;
                ctx.printer.println(math::format_double(value));
                Ok(true)
            }),
            Matcher::new("preference toggle", Trigger::Always, |cmd, ctx| {
                if find_preference(cmd.text()).is_none() {
                    return Ok(false);
                }
                let (pref, value) = ctx.console.preferences.toggle(cmd.text())?;
                ctx.printer
                    .println(format!("{} set to {}", pref.display_name, value));
                Ok(true)
            }),
            Matcher::new("test", Trigger::Always, |cmd, ctx| {
                let Some(test) = ctx.tests.get(cmd.text()) else {
                    return Ok(false);
                };
                debug!("Running test {}", cmd.text());
                test(ctx)?;
                Ok(true)
            }),
        ],
    )
}
