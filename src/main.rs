//! Cyder - a console assistant driven by typed commands
//!
//! Reads commands from stdin, one per line, and renders the console output
//! to stdout with the typewriter effect.

use std::env;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

use cyder::collaborators::SystemCollaborators;
use cyder::config::Config;
use cyder::console::{Console, StdoutSink};
use cyder::handler::InputHandler;
use cyder::models::InputSource;
use cyder::preferences::PreferenceStore;

/// Command line options
#[derive(Debug, Default)]
struct AppArgs {
    /// Configuration file path
    config_path: Option<PathBuf>,
    /// Preference file path, overriding the configured one
    prefs_path: Option<PathBuf>,
    /// Enable debug logging
    debug: bool,
    /// Render output instantly
    no_typing: bool,
}

impl AppArgs {
    /// Parse command line arguments
    fn parse() -> anyhow::Result<Self> {
        let args: Vec<String> = env::args().collect();
        let mut app_args = AppArgs::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    let path = args
                        .get(i + 1)
                        .ok_or_else(|| anyhow::anyhow!("Missing config file path"))?;
                    app_args.config_path = Some(PathBuf::from(path));
                    i += 1;
                }
                "--prefs" | "-p" => {
                    let path = args
                        .get(i + 1)
                        .ok_or_else(|| anyhow::anyhow!("Missing preference file path"))?;
                    app_args.prefs_path = Some(PathBuf::from(path));
                    i += 1;
                }
                "--debug" | "-d" => {
                    app_args.debug = true;
                }
                "--no-typing" => {
                    app_args.no_typing = true;
                }
                "--help" | "-h" => {
                    print_help();
                    process::exit(0);
                }
                "--version" | "-v" => {
                    println!("Cyder v{}", cyder::VERSION);
                    process::exit(0);
                }
                arg if arg.starts_with('-') => {
                    anyhow::bail!("Unknown option: {}", arg);
                }
                _ => {
                    warn!("Ignoring positional argument: {}", args[i]);
                }
            }
            i += 1;
        }

        Ok(app_args)
    }
}

/// Print help information
fn print_help() {
    println!("Cyder - {}", cyder::DESCRIPTION);
    println!();
    println!("USAGE:");
    println!("    cyder [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>    Path to configuration file");
    println!("    -p, --prefs <PATH>     Path to preference file");
    println!("    -d, --debug            Enable debug logging");
    println!("        --no-typing        Print output without the typing animation");
    println!("    -h, --help             Print this help message");
    println!("    -v, --version          Print version information");
    println!();
    println!("CONFIGURATION:");
    println!("    Cyder looks for configuration files in the following order:");
    println!("    1. Path specified with --config");
    println!("    2. $CYDER_CONFIG");
    println!("    3. <config dir>/cyder/config.toml");
    println!("    4. ~/.cyder/config.toml");
    println!("    5. ./.cyder/config.toml");
    println!("    6. Built-in defaults");
    println!();
    println!("ENVIRONMENT:");
    println!("    CYDER_CONFIG    Path to configuration file");
    println!("    CYDER_DEBUG     Enable debug logging (1 or true)");
    println!("    RUST_LOG        Set logging level (error, warn, info, debug, trace)");
}

fn init_logging(args: &AppArgs) {
    let debug_env = env::var("CYDER_DEBUG")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let log_level = if args.debug || debug_env { "debug" } else { "warn" };

    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// Load configuration from file or use defaults
fn load_configuration(args: &AppArgs) -> anyhow::Result<Config> {
    let mut config = match cyder::load_config(args.config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", cyder::handle_startup_error(&e));
            return Err(e.into());
        }
    };

    if args.no_typing {
        debug!("Typing animation disabled from the command line");
        config.console.disable_typing();
    }
    if let Some(path) = &args.prefs_path {
        config.paths.preferences_file = path.clone();
    }
    Ok(config)
}

fn load_preferences(config: &Config) -> Arc<PreferenceStore> {
    let path = &config.paths.preferences_file;
    match PreferenceStore::load(path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("Failed to load preferences from {}: {}", path.display(), e);
            Arc::new(PreferenceStore::in_memory())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = AppArgs::parse().unwrap_or_else(|e| {
        eprintln!("Failed to parse arguments: {}", e);
        print_help();
        process::exit(1);
    });
    init_logging(&args);
    info!("Starting Cyder v{}", cyder::VERSION);

    let config = load_configuration(&args)?;
    let preferences = load_preferences(&config);

    let console = Console::start(
        &config,
        preferences,
        Arc::new(SystemCollaborators),
        Box::new(StdoutSink::new()),
    );
    let mut handler = InputHandler::new(Arc::clone(console.shared()), &config);
    console
        .printer()
        .println(format!("Cyder v{}. Type help to see what I can do.", cyder::VERSION));

    let shutdown = console.shared().shutdown.clone();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    handler.handle(&line, InputSource::User).await;
                }
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    break;
                }
            },
        }
    }

    console.flush().await;
    console.close().await;
    info!("Cyder shutdown complete");
    Ok(())
}
