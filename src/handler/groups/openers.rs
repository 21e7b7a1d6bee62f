//! Websites and web searches

use crate::handler::classifier::{ClassifierGroup, GroupKind, Matcher, Trigger};

/// Site shortcuts: trigger phrases and the page they open
pub const SITES: &[(&[&str], &str)] = &[
    (&["google"], "https://www.google.com"),
    (&["github"], "https://github.com"),
    (&["wikipedia", "wiki"], "https://www.wikipedia.org"),
    (&["reddit"], "https://www.reddit.com"),
    (&["stackoverflow", "stack overflow"], "https://stackoverflow.com"),
    (&["rust docs", "rustdocs"], "https://doc.rust-lang.org/std/"),
    (&["crates", "crates.io"], "https://crates.io"),
    (&["maps", "google maps"], "https://maps.google.com"),
    (&["translate"], "https://translate.google.com"),
];

/// Percent-encode a search query, spaces as `+`
pub fn encode_query(query: &str) -> String {
    let mut encoded = String::with_capacity(query.len());
    for byte in query.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            b' ' => encoded.push('+'),
            other => encoded.push_str(&format!("%{:02X}", other)),
        }
    }
    encoded
}

pub fn group() -> ClassifierGroup {
    let mut matchers: Vec<Matcher> = SITES
        .iter()
        .map(|(phrases, url)| {
            let (phrases, url) = (*phrases, *url);
            Matcher::new(phrases[0], Trigger::Exact(phrases), move |_, ctx| {
                ctx.console.collaborators.open_url(url)?;
                Ok(true)
            })
        })
        .collect();

    matchers.push(Matcher::new(
        "search",
        Trigger::Verb(&["search", "google"]),
        |cmd, ctx| {
            if cmd.arg_count() == 0 {
                return super::usage(ctx, "search <terms>");
            }
            let url = format!("https://www.google.com/search?q={}", encode_query(&cmd.rest()));
            ctx.console.collaborators.open_url(&url)?;
            Ok(true)
        },
    ));

    ClassifierGroup::new(GroupKind::ExternalOpeners, matchers)
}
