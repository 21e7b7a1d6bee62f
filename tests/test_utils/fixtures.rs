//! Console fixtures

use std::sync::Arc;
use std::time::Duration;

use cyder::config::{Config, ConsoleConfig, PathsConfig};
use cyder::console::{BufferSink, Console};
use cyder::handler::{HandleOutcome, InputHandler};
use cyder::models::InputSource;
use cyder::preferences::PreferenceStore;
use tempfile::TempDir;

use super::mock_collaborators::RecordingCollaborators;

/// Configuration with instant output and every path inside `dir`
pub fn test_config(dir: &std::path::Path) -> Config {
    Config {
        console: ConsoleConfig::instant(),
        paths: PathsConfig::rooted_at(dir),
        ..Config::default()
    }
}

/// A running console rendering into memory
pub struct TestConsole {
    pub console: Console,
    pub sink: BufferSink,
    pub collaborators: Arc<RecordingCollaborators>,
    pub preferences: Arc<PreferenceStore>,
    pub config: Config,
    pub dir: TempDir,
}

/// Start a console with instant output and file-backed preferences
pub async fn start_console() -> TestConsole {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    start_console_with(dir, config)
}

/// Start a console with a custom configuration
pub fn start_console_with(dir: TempDir, config: Config) -> TestConsole {
    let preferences = Arc::new(PreferenceStore::load(&config.paths.preferences_file).unwrap());
    let collaborators = Arc::new(RecordingCollaborators::new());
    let sink = BufferSink::new();
    let console = Console::start(
        &config,
        Arc::clone(&preferences),
        collaborators.clone(),
        Box::new(sink.clone()),
    );
    TestConsole {
        console,
        sink,
        collaborators,
        preferences,
        config,
        dir,
    }
}

impl TestConsole {
    pub fn handler(&self) -> InputHandler {
        InputHandler::new(Arc::clone(self.console.shared()), &self.config)
    }

    /// Handle a user line and wait until its output is rendered
    pub async fn run(&self, handler: &mut InputHandler, line: &str) -> HandleOutcome {
        let outcome = handler.handle(line, InputSource::User).await;
        self.flush().await;
        outcome
    }

    pub async fn flush(&self) {
        tokio::time::timeout(Duration::from_secs(5), self.console.flush())
            .await
            .expect("console did not drain in time");
    }

    pub fn output(&self) -> String {
        self.sink.text()
    }

    pub fn lines(&self) -> Vec<String> {
        self.sink.lines()
    }

    pub fn last_line(&self) -> String {
        self.lines().last().cloned().unwrap_or_default()
    }
}
