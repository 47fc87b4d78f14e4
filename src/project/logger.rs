//! Client-facing log messages.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

/// Severity of a message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Error,
    Warning,
    Info,
    Log,
}

impl MessageType {
    /// Convert to the LSP `MessageType` number.
    pub fn to_lsp(self) -> u32 {
        match self {
            MessageType::Error => 1,
            MessageType::Warning => 2,
            MessageType::Info => 3,
            MessageType::Log => 4,
        }
    }
}

/// Where client log messages go, typically `window/logMessage`.
pub trait LogSink: Send + Sync {
    fn log_message(&self, kind: MessageType, message: &str);
}

/// Forwards client messages to `tracing` when no client is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log_message(&self, kind: MessageType, message: &str) {
        match kind {
            MessageType::Error => tracing::error!("{message}"),
            MessageType::Warning => tracing::warn!("{message}"),
            MessageType::Info => tracing::info!("{message}"),
            MessageType::Log => tracing::debug!("{message}"),
        }
    }
}

/// Tags messages with a component name and drops them unless verbose.
#[derive(Clone)]
pub struct ClientLogger {
    sink: Arc<dyn LogSink>,
    verbose: bool,
    name: SmolStr,
}

impl ClientLogger {
    pub fn new(sink: Arc<dyn LogSink>, verbose: bool, name: impl Into<SmolStr>) -> Self {
        Self {
            sink,
            verbose,
            name: name.into(),
        }
    }

    pub fn log(&self, msg: impl fmt::Display) {
        self.send(MessageType::Log, msg);
    }

    pub fn warn(&self, msg: impl fmt::Display) {
        self.send(MessageType::Warning, msg);
    }

    pub fn info(&self, msg: impl fmt::Display) {
        self.send(MessageType::Info, msg);
    }

    pub fn error(&self, msg: impl fmt::Display) {
        self.send(MessageType::Error, msg);
    }

    fn send(&self, kind: MessageType, msg: impl fmt::Display) {
        if !self.verbose {
            return;
        }
        self.sink.log_message(kind, &format!("[{}] {msg}", self.name));
    }
}

impl fmt::Debug for ClientLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientLogger")
            .field("name", &self.name)
            .field("verbose", &self.verbose)
            .finish()
    }
}
