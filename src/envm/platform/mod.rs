//! # Platform Adapters
//!
//! One capability set, two implementations. [`EnvAdapter`] is the seam
//! between everything else and the host's storage media: the process
//! environment table for `session`, a profile/system file on POSIX, the
//! registry on Windows. The host adapter is selected once by [`host`];
//! no other call site branches on platform.
//!
//! Both adapters run the same write-verify-rollback protocol for
//! persistent scopes:
//!
//! 1. read the current medium content (missing medium reads as empty);
//! 2. snapshot it into the [`BackupStore`](crate::backup::BackupStore)
//!    when backup is enabled;
//! 3. apply the change inside the medium's own encoding;
//! 4. re-read the variable and compare against the intended post-state;
//! 5. on mismatch, replay the snapshot back into the medium when rollback
//!    is enabled.
//!
//! `MutationResult.ok` is the verification outcome: an I/O-level success
//! that fails to verify is still a failed mutation.

use crate::backup::BackupStore;
use crate::error::Result;
use crate::model::{MutateOptions, MutationResult, Scope};

pub mod posix;
pub mod windows;

pub use posix::PosixAdapter;
pub use windows::WindowsAdapter;

/// The capability set shared by both platform variants. Callers hold a
/// `&dyn EnvAdapter` and never know which host they are on.
pub trait EnvAdapter: Send + Sync {
    /// PATH-list separator: `:` on POSIX, `;` on Windows.
    fn path_delimiter(&self) -> char;

    /// Case handling for variable names: identity on POSIX, uppercase on
    /// Windows (matching the platform's case-insensitive lookups).
    fn normalize_name(&self, name: &str) -> String;

    /// Literal stored value, `None` when absent. A missing medium (no
    /// profile file, no registry key) reads as absent, not as an error.
    fn get_raw(&self, name: &str, scope: Scope) -> Result<Option<String>>;

    /// Raw value plus one pass of reference substitution against the live
    /// process environment. With `across_scopes`, referenced names the
    /// process table lacks are also looked up in the target scope's medium.
    fn get_expanded(&self, name: &str, scope: Scope, across_scopes: bool)
        -> Result<Option<String>>;

    /// Write `name=value` into the scope's medium under the
    /// write-verify-rollback protocol.
    fn set(
        &self,
        backups: &BackupStore,
        name: &str,
        value: &str,
        opts: &MutateOptions,
    ) -> Result<MutationResult>;

    /// Remove `name` from the scope's medium, symmetric to `set`.
    fn unset(&self, backups: &BackupStore, name: &str, opts: &MutateOptions)
        -> Result<MutationResult>;

    /// Overwrite the scope's medium wholesale with snapshot content.
    /// Returns `false` on any I/O or import failure, and always for
    /// `session` (there is nothing durable to restore).
    fn restore_from_backup(&self, content: &str, scope: Scope) -> bool;
}

/// Build the adapter for the host OS. Called once at startup; everything
/// downstream works through the trait. The path overrides come from the
/// config file and only apply to the POSIX file media.
#[cfg(windows)]
pub fn host(
    _profile_override: Option<&std::path::Path>,
    _system_override: Option<&std::path::Path>,
) -> Box<dyn EnvAdapter> {
    Box::new(WindowsAdapter::new())
}

#[cfg(not(windows))]
pub fn host(
    profile_override: Option<&std::path::Path>,
    system_override: Option<&std::path::Path>,
) -> Box<dyn EnvAdapter> {
    Box::new(PosixAdapter::resolve(profile_override, system_override))
}

/// Session-scope reads hit the process table directly; no I/O, no
/// failure mode.
pub(crate) fn session_get(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Session-scope mutation: the table write cannot meaningfully fail or be
/// rolled back, so the result reports verification forced true.
pub(crate) fn session_set(name: &str, value: Option<&str>) -> MutationResult {
    let mut result = MutationResult::new(Scope::Session, name);
    result.previous = session_get(name);
    result.value = value.map(str::to_string);
    match value {
        Some(v) => std::env::set_var(name, v),
        None => std::env::remove_var(name),
    }
    result.verified = true;
    result.ok = true;
    result.note("process environment table updated (volatile, not persisted)");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_set_and_get() {
        let result = session_set("ENVM_MOD_TEST_A", Some("one"));
        assert!(result.ok && result.verified);
        assert_eq!(result.rollback, None);
        assert_eq!(session_get("ENVM_MOD_TEST_A").as_deref(), Some("one"));

        let result = session_set("ENVM_MOD_TEST_A", None);
        assert!(result.ok);
        assert_eq!(result.previous.as_deref(), Some("one"));
        assert_eq!(session_get("ENVM_MOD_TEST_A"), None);
    }

    #[test]
    fn test_host_adapter_exposes_delimiter() {
        let adapter = host(None, None);
        assert!(adapter.path_delimiter() == ':' || adapter.path_delimiter() == ';');
    }
}
