//! System and utility commands

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use anyhow::Context;
use chrono::Local;
use tracing::{info, warn};
use uuid::Uuid;

use super::usage;
use crate::collaborators::Rgb;
use crate::handler::classifier::{ClassifierGroup, GroupKind, HandlerContext, Matcher, Trigger};
use crate::preferences::{PreferenceSource, PREFERENCES};

/// Bytes shown by `hexdump` and `bindump`
pub const DUMP_LIMIT: usize = 256;

/// Name of the per-user data file written by `adduser`
pub const USER_DATA_FILE: &str = "userdata.json";

pub fn group() -> ClassifierGroup {
    ClassifierGroup::new(
        GroupKind::GeneralCommands,
        vec![
            Matcher::new("echo", Trigger::Verb(&["echo", "print", "println"]), |cmd, ctx| {
                ctx.printer.println(cmd.rest());
                Ok(true)
            }),
            Matcher::new("help", Trigger::Exact(&["help", "commands", "?"]), |_, ctx| {
                ctx.printer.println("Try typing:");
                for command in ctx.catalog {
                    ctx.printer.println(format!("  {}", command));
                }
                Ok(true)
            }),
            Matcher::new("time", Trigger::Exact(&["time", "date", "clock"]), |_, ctx| {
                let format = if ctx.console.preferences.get_bool("showseconds") {
                    "%A, %B %-d, %Y %-I:%M:%S %p"
                } else {
                    "%A, %B %-d, %Y %-I:%M %p"
                };
                ctx.printer.println(Local::now().format(format));
                Ok(true)
            }),
            Matcher::new("hostname", Trigger::Exact(&["hostname", "computer name"]), |_, ctx| {
                ctx.printer.println(host_name());
                Ok(true)
            }),
            Matcher::new("whoami", Trigger::Exact(&["whoami", "who am i"]), |_, ctx| {
                ctx.printer.println(format!("{}@{}", user_name(), host_name()));
                Ok(true)
            }),
            Matcher::new("sysinfo", Trigger::Exact(&["sysinfo", "system info"]), |_, ctx| {
                print_sysinfo(ctx);
                Ok(true)
            }),
            Matcher::new("uuid", Trigger::Exact(&["uuid", "guid"]), |_, ctx| {
                ctx.printer.println(Uuid::new_v4());
                Ok(true)
            }),
            Matcher::new("hex", Trigger::Verb(&["hex"]), |cmd, ctx| {
                match cmd.arg(0).and_then(|n| n.parse::<i64>().ok()) {
                    Some(n) if cmd.arg_count() == 1 => {
                        ctx.printer.println(format!("0x{:X}", n));
                        Ok(true)
                    }
                    _ => usage(ctx, "hex <integer>"),
                }
            }),
            Matcher::new("bin", Trigger::Verb(&["bin", "binary"]), |cmd, ctx| {
                match cmd.arg(0).and_then(|n| n.parse::<i64>().ok()) {
                    Some(n) if cmd.arg_count() == 1 => {
                        ctx.printer.println(format!("{:b}", n));
                        Ok(true)
                    }
                    _ => usage(ctx, "bin <integer>"),
                }
            }),
            Matcher::new("hexdump", Trigger::Verb(&["hexdump"]), |cmd, ctx| {
                dump(cmd.arg(0), ctx, "hexdump <file>", |b| format!("{:02X}", b), 16)
            }),
            Matcher::new("bindump", Trigger::Verb(&["bindump"]), |cmd, ctx| {
                dump(cmd.arg(0), ctx, "bindump <file>", |b| format!("{:08b}", b), 6)
            }),
            Matcher::new(
                "background color",
                Trigger::Verb(&["backgroundcolor", "bgcolor"]),
                |cmd, ctx| match cmd.arg(0).and_then(Rgb::from_hex) {
                    Some(color) if cmd.arg_count() == 1 => {
                        ctx.console.collaborators.set_background(color)?;
                        Ok(true)
                    }
                    _ => usage(ctx, "backgroundcolor <#rrggbb>"),
                },
            ),
            Matcher::new("pixelate", Trigger::Verb(&["pixelate"]), |cmd, ctx| {
                match cmd.arg(0).and_then(|n| n.parse::<u32>().ok()) {
                    Some(size) if size > 0 && cmd.arg_count() == 1 => {
                        ctx.console.collaborators.pixelate(size)?;
                        Ok(true)
                    }
                    _ => usage(ctx, "pixelate <block size>"),
                }
            }),
            Matcher::new("adduser", Trigger::Verb(&["adduser"]), |cmd, ctx| {
                if cmd.arg_count() == 0 {
                    return usage(ctx, "adduser <name>");
                }
                let name = cmd.rest();
                let id = add_user(&ctx.paths.users_dir, &name)?;
                ctx.printer.println(format!("Created user \"{}\" ({})", name, id));
                Ok(true)
            }),
            Matcher::new("prefs", Trigger::Exact(&["prefs", "preferences"]), |_, ctx| {
                for pref in PREFERENCES {
                    let value = ctx.console.preferences.get_bool(pref.id);
                    ctx.printer
                        .println(format!("{} ({}): {}", pref.display_name, pref.id, value));
                }
                Ok(true)
            }),
            Matcher::new("history", Trigger::Exact(&["history"]), |_, ctx| {
                if ctx.history.is_empty() {
                    ctx.printer.println("No history yet");
                }
                for (i, line) in ctx.history.iter().enumerate() {
                    ctx.printer.println(format!("{:>4}  {}", i + 1, line));
                }
                Ok(true)
            }),
            Matcher::new("pwd", Trigger::Exact(&["pwd"]), |_, ctx| {
                let dir = std::env::current_dir().context("reading working directory")?;
                ctx.printer.println(dir.display());
                Ok(true)
            }),
            Matcher::new("ls", Trigger::Verb(&["ls", "dir"]), |cmd, ctx| {
                let dir = cmd.arg(0).unwrap_or(".");
                match list_dir(Path::new(dir)) {
                    Ok(entries) => ctx.printer.println_all(entries),
                    Err(e) => ctx.printer.println(format!("Cannot list {}: {}", dir, e)),
                }
                Ok(true)
            }),
            Matcher::new("logdir", Trigger::Exact(&["logdir", "logs"]), |_, ctx| {
                ctx.printer.println(ctx.paths.log_dir.display());
                Ok(true)
            }),
            Matcher::new("wipelogs", Trigger::Exact(&["wipelogs"]), |_, ctx| {
                let removed = wipe_dir(&ctx.paths.log_dir)?;
                ctx.printer.println(format!("Removed {} log file(s)", removed));
                Ok(true)
            }),
            Matcher::new("escape", Trigger::Exact(&["escape", "esc", "stop"]), |_, ctx| {
                ctx.console.escape();
                Ok(true)
            }),
            Matcher::new("exit", Trigger::Exact(&["exit", "quit", "close"]), |_, ctx| {
                info!("Exit requested");
                ctx.console.shutdown.cancel();
                Ok(true)
            }),
        ],
    )
}

fn host_name() -> String {
    hostname::get()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string())
}

fn user_name() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

fn print_sysinfo(ctx: &HandlerContext<'_>) {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    ctx.printer.println(format!("OS: {} ({})", std::env::consts::OS, std::env::consts::FAMILY));
    ctx.printer.println(format!("Architecture: {}", std::env::consts::ARCH));
    ctx.printer.println(format!("Processors: {}", cpus));
    ctx.printer.println(format!("Host: {}", host_name()));
    ctx.printer.println(format!("User: {}", user_name()));
    ctx.printer.println(format!("Version: {}", crate::VERSION));
    ctx.printer.println(format!("Session: {}", ctx.console.session_id));
}

/// Print the first bytes of `path` with `render`, `per_line` bytes a line
fn dump(
    path: Option<&str>,
    ctx: &HandlerContext<'_>,
    usage_text: &str,
    render: fn(u8) -> String,
    per_line: usize,
) -> anyhow::Result<bool> {
    let Some(path) = path else {
        return usage(ctx, usage_text);
    };
    let (head, total) = match read_head(Path::new(path), DUMP_LIMIT) {
        Ok(read) => read,
        Err(e) => {
            warn!("Could not read {}: {}", path, e);
            ctx.printer.println(format!("Could not read {}", path));
            return Ok(true);
        }
    };

    for chunk in head.chunks(per_line) {
        let line: Vec<String> = chunk.iter().map(|b| render(*b)).collect();
        ctx.printer.println(line.join(" "));
    }
    let remaining = total.saturating_sub(head.len() as u64);
    if remaining > 0 {
        ctx.printer.println(format!("... {} more bytes", remaining));
    }
    Ok(true)
}

/// Read at most `limit` bytes from the start of `path`, with the file's
/// full length
pub fn read_head(path: &Path, limit: usize) -> io::Result<(Vec<u8>, u64)> {
    let file = File::open(path)?;
    let total = file.metadata()?.len();
    let mut head = Vec::with_capacity(limit);
    file.take(limit as u64).read_to_end(&mut head)?;
    Ok((head, total))
}

/// Create `users_dir/<uuid>/userdata.json` for a new user
pub fn add_user(users_dir: &Path, name: &str) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    let dir = users_dir.join(id.to_string());
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let data = serde_json::json!({
        "uuid": id.to_string(),
        "name": name,
        "created": Local::now().to_rfc3339(),
    });
    let file = dir.join(USER_DATA_FILE);
    fs::write(&file, serde_json::to_string_pretty(&data)?)
        .with_context(|| format!("writing {}", file.display()))?;
    info!("Created user '{}' at {}", name, dir.display());
    Ok(id)
}

/// Sorted entry names of `dir`, directories suffixed with `/`
pub fn list_dir(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_dir() {
            name.push('/');
        }
        entries.push(name);
    }
    entries.sort();
    Ok(entries)
}

/// Delete every file in `dir`, keeping the directory. Missing is empty.
pub fn wipe_dir(dir: &Path) -> anyhow::Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
        removed += 1;
    }
    Ok(removed)
}
