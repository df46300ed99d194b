use crate::config::EnvmConfig;
use crate::model::{MutationResult, Scope};
use chrono::{DateTime, Utc};

pub mod backups;
pub mod config;
pub mod get;
pub mod path_cmd;
pub mod purge;
pub mod restore;
pub mod set;
pub mod unset;

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// One backup record, pre-parsed for display.
#[derive(Debug, Clone)]
pub struct BackupListing {
    pub id: String,
    pub scope: Scope,
    pub name: String,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Everything a command hands back to the UI layer. Commands never print;
/// the binary decides how results and messages reach the terminal.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub mutation: Option<MutationResult>,
    pub value: Option<String>,
    pub backups: Vec<BackupListing>,
    pub segments: Vec<String>,
    pub purged: Option<usize>,
    pub restored: Option<bool>,
    pub config: Option<EnvmConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_mutation(mut self, mutation: MutationResult) -> Self {
        self.mutation = Some(mutation);
        self
    }

    pub fn with_backups(mut self, backups: Vec<BackupListing>) -> Self {
        self.backups = backups;
        self
    }

    pub fn with_segments(mut self, segments: Vec<String>) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_config(mut self, config: EnvmConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// True unless a mutation or restore in this result failed.
    pub fn succeeded(&self) -> bool {
        self.mutation.as_ref().map(|m| m.ok).unwrap_or(true)
            && self.restored.unwrap_or(true)
    }
}
