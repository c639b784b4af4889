//! Host editor interface.
//!
//! Controls dispatch commands and report failures through this trait; nothing
//! in the canvas crates talks to the editor runtime any other way.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Errors a host may return from command dispatch
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("Command not registered: {0}")]
    UnknownCommand(String),

    #[error("Command '{id}' failed: {reason}")]
    CommandFailed { id: String, reason: String },
}

/// The editor runtime as seen from controls.
pub trait EditorHost: Send + Sync {
    /// Run a command from the host command registry by identifier
    fn run_command(&self, id: &str) -> Result<(), HostError>;

    /// The host's standard error channel. Must not panic.
    fn report_error(&self, error: &(dyn std::error::Error + 'static));
}

type CommandFn = Arc<dyn Fn() -> Result<(), String> + Send + Sync>;

/// In-process host with a local command table.
///
/// Used for headless embedding and tests. Reported errors are logged and kept so
/// callers can inspect them.
#[derive(Default)]
pub struct LocalEditorHost {
    commands: DashMap<String, CommandFn>,
    reported: Mutex<Vec<String>>,
}

impl LocalEditorHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Re-registering an id replaces the previous handler.
    pub fn register_command<F>(&self, id: impl Into<String>, command: F)
    where
        F: Fn() -> Result<(), String> + Send + Sync + 'static,
    {
        let id = id.into();
        tracing::debug!("Registered command '{}'", id);
        self.commands.insert(id, Arc::new(command));
    }

    pub fn has_command(&self, id: &str) -> bool {
        self.commands.contains_key(id)
    }

    /// Messages passed to `report_error`, oldest first
    pub fn reported_errors(&self) -> Vec<String> {
        self.reported.lock().clone()
    }
}

impl EditorHost for LocalEditorHost {
    fn run_command(&self, id: &str) -> Result<(), HostError> {
        // Clone out of the map so the command may register further commands.
        let command = self
            .commands
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| HostError::UnknownCommand(id.to_string()))?;

        command().map_err(|reason| HostError::CommandFailed {
            id: id.to_string(),
            reason,
        })
    }

    fn report_error(&self, error: &(dyn std::error::Error + 'static)) {
        tracing::error!("{}", error);
        self.reported.lock().push(error.to_string());
    }
}
