use crate::error::EnvmError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a variable lives. `Session` is the process's own environment table
/// (volatile, never backed up); `User` and `System` are persistent media
/// (profile file / system file on POSIX, registry keys on Windows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Session,
    User,
    System,
}

impl Scope {
    pub const ALL: [Scope; 3] = [Scope::Session, Scope::User, Scope::System];

    /// True for scopes whose medium outlives the process, i.e. the scopes
    /// the backup/verify/rollback protocol applies to.
    pub fn is_persistent(&self) -> bool {
        !matches!(self, Scope::Session)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Scope::Session => "session",
            Scope::User => "user",
            Scope::System => "system",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Scope {
    type Err = EnvmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "session" => Ok(Scope::Session),
            "user" => Ok(Scope::User),
            "system" => Ok(Scope::System),
            other => Err(EnvmError::Api(format!(
                "Unknown scope '{}' (expected session, user or system)",
                other
            ))),
        }
    }
}

/// Knobs for a single `set`/`unset`. Backup, verification and rollback all
/// default to on; disabling verification also disables rollback since there
/// is nothing to react to.
#[derive(Debug, Clone, Copy)]
pub struct MutateOptions {
    pub scope: Scope,
    pub backup: bool,
    pub verify: bool,
    pub rollback_on_fail: bool,
}

impl MutateOptions {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            backup: true,
            verify: true,
            rollback_on_fail: true,
        }
    }
}

/// Outcome of a `set` or `unset`.
///
/// `ok` equals the verification outcome, not merely "the write did not
/// throw": a write that lands at the I/O level but fails to verify is
/// reported as failed. `rollback` is `None` when rollback was never
/// attempted; `Some(false)` means it was attempted and failed, leaving the
/// medium in whatever intermediate state the bad write produced.
#[derive(Debug, Clone)]
pub struct MutationResult {
    pub ok: bool,
    pub scope: Scope,
    pub name: String,
    pub previous: Option<String>,
    pub value: Option<String>,
    pub verified: bool,
    pub rollback: Option<bool>,
    pub notes: Vec<String>,
}

impl MutationResult {
    pub fn new(scope: Scope, name: impl Into<String>) -> Self {
        Self {
            ok: false,
            scope,
            name: name.into(),
            previous: None,
            value: None,
            verified: false,
            rollback: None,
            notes: Vec::new(),
        }
    }

    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }
}
