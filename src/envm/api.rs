//! # API Facade
//!
//! Thin facade over the command layer: the single entry point for every
//! envm operation regardless of the UI driving it. It normalizes inputs,
//! dispatches to the right command function and returns structured
//! `CmdResult` values; business logic lives in `commands/*`, persistence
//! in `platform/*` and `backup`.
//!
//! The facade owns the pieces wired together at startup: the
//! platform adapter selected for the host, one `BackupStore` instance, and
//! the config directory. Tests build their own `EnvmApi` from a
//! `PosixAdapter` with temp paths and an isolated store.

use crate::backup::{BackupStore, RetentionPolicy};
use crate::commands;
use crate::error::Result;
use crate::model::{MutateOptions, Scope};
use crate::platform::EnvAdapter;
use std::path::PathBuf;

pub struct EnvmApi {
    adapter: Box<dyn EnvAdapter>,
    backups: BackupStore,
    config_dir: PathBuf,
}

impl EnvmApi {
    pub fn new(
        adapter: Box<dyn EnvAdapter>,
        backups: BackupStore,
        config_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            adapter,
            backups,
            config_dir: config_dir.into(),
        }
    }

    pub fn adapter(&self) -> &dyn EnvAdapter {
        self.adapter.as_ref()
    }

    pub fn backups(&self) -> &BackupStore {
        &self.backups
    }

    /// Redirect backups for all subsequent operations on this api instance.
    pub fn set_backup_dir(&mut self, dir: impl Into<PathBuf>) {
        self.backups.set_dir(dir);
    }

    pub fn get(
        &self,
        name: &str,
        scope: Scope,
        expand: bool,
        across_scopes: bool,
    ) -> Result<commands::CmdResult> {
        commands::get::run(self.adapter(), name, scope, expand, across_scopes)
    }

    pub fn set(
        &self,
        name: &str,
        value: &str,
        opts: &MutateOptions,
        dry_run: bool,
    ) -> Result<commands::CmdResult> {
        commands::set::run(self.adapter(), &self.backups, name, value, opts, dry_run)
    }

    pub fn unset(
        &self,
        name: &str,
        opts: &MutateOptions,
        dry_run: bool,
    ) -> Result<commands::CmdResult> {
        commands::unset::run(self.adapter(), &self.backups, name, opts, dry_run)
    }

    pub fn list_backups(&self, scope: Option<Scope>) -> Result<commands::CmdResult> {
        commands::backups::run(&self.backups, scope)
    }

    pub fn restore(&self, id: &str) -> Result<commands::CmdResult> {
        commands::restore::run(self.adapter(), &self.backups, id)
    }

    pub fn purge(&self, policy: &RetentionPolicy) -> Result<commands::CmdResult> {
        commands::purge::run(&self.backups, policy)
    }

    pub fn path(
        &self,
        name: &str,
        action: PathAction,
        opts: &MutateOptions,
    ) -> Result<commands::CmdResult> {
        commands::path_cmd::run(self.adapter(), &self.backups, name, action, opts)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.config_dir, action)
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::path_cmd::PathAction;
pub use crate::commands::{BackupListing, CmdMessage, CmdResult, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PosixAdapter;

    fn api(tmp: &tempfile::TempDir) -> EnvmApi {
        let adapter = PosixAdapter::new(tmp.path().join("profile"), tmp.path().join("system"));
        let backups = BackupStore::new(tmp.path().join("backups"));
        EnvmApi::new(Box::new(adapter), backups, tmp.path().join(".envm"))
    }

    #[test]
    fn test_set_get_unset_dispatch() {
        let tmp = tempfile::tempdir().unwrap();
        let api = api(&tmp);
        let opts = MutateOptions::new(Scope::User);

        assert!(api.set("EDITOR", "vim", &opts, false).unwrap().succeeded());
        assert_eq!(
            api.get("EDITOR", Scope::User, false, false)
                .unwrap()
                .value
                .as_deref(),
            Some("vim")
        );
        assert!(api.unset("EDITOR", &opts, false).unwrap().succeeded());
        assert_eq!(api.get("EDITOR", Scope::User, false, false).unwrap().value, None);
    }

    #[test]
    fn test_backup_lifecycle_dispatch() {
        let tmp = tempfile::tempdir().unwrap();
        let api = api(&tmp);
        let opts = MutateOptions::new(Scope::User);

        api.set("A", "1", &opts, false).unwrap();
        api.set("A", "2", &opts, false).unwrap();
        assert_eq!(api.list_backups(None).unwrap().backups.len(), 2);

        let policy = RetentionPolicy {
            max_per_scope: 1,
            max_age_days: 9999,
        };
        assert_eq!(api.purge(&policy).unwrap().purged, Some(1));
        assert_eq!(api.list_backups(None).unwrap().backups.len(), 1);
    }

    #[test]
    fn test_set_backup_dir_redirects_snapshots() {
        let tmp = tempfile::tempdir().unwrap();
        let mut api = api(&tmp);
        api.set_backup_dir(tmp.path().join("elsewhere"));

        let opts = MutateOptions::new(Scope::User);
        api.set("A", "1", &opts, false).unwrap();
        assert_eq!(api.backups().dir(), tmp.path().join("elsewhere"));
        assert_eq!(api.list_backups(None).unwrap().backups.len(), 1);
    }
}
