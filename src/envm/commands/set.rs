use crate::backup::BackupStore;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::MutateOptions;
use crate::platform::EnvAdapter;

pub fn run(
    adapter: &dyn EnvAdapter,
    backups: &BackupStore,
    name: &str,
    value: &str,
    opts: &MutateOptions,
    dry_run: bool,
) -> Result<CmdResult> {
    let name = adapter.normalize_name(name);
    let mut result = CmdResult::default();

    if dry_run {
        let previous = adapter.get_raw(&name, opts.scope)?;
        result.add_message(CmdMessage::info(format!(
            "dry-run: would set {}={} in {} scope (previous: {})",
            name,
            value,
            opts.scope,
            previous.as_deref().unwrap_or("<unset>")
        )));
        return Ok(result);
    }

    let mutation = adapter.set(backups, &name, value, opts)?;
    if mutation.ok {
        result.add_message(CmdMessage::success(format!(
            "Set {} in {} scope",
            name, opts.scope
        )));
    } else {
        result.add_message(CmdMessage::error(format!(
            "Failed to set {} in {} scope",
            name, opts.scope
        )));
    }
    Ok(result.with_mutation(mutation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Scope;
    use crate::platform::PosixAdapter;

    #[test]
    fn test_dry_run_touches_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let adapter = PosixAdapter::new(tmp.path().join("profile"), tmp.path().join("system"));
        let backups = BackupStore::new(tmp.path().join("backups"));

        let result = run(
            &adapter,
            &backups,
            "EDITOR",
            "vim",
            &MutateOptions::new(Scope::User),
            true,
        )
        .unwrap();

        assert!(result.mutation.is_none());
        assert!(!tmp.path().join("profile").exists());
        assert!(backups.list(None).unwrap().is_empty());
        assert!(result.messages[0].content.contains("dry-run"));
    }

    #[test]
    fn test_set_reports_success() {
        let tmp = tempfile::tempdir().unwrap();
        let adapter = PosixAdapter::new(tmp.path().join("profile"), tmp.path().join("system"));
        let backups = BackupStore::new(tmp.path().join("backups"));

        let result = run(
            &adapter,
            &backups,
            "EDITOR",
            "vim",
            &MutateOptions::new(Scope::User),
            false,
        )
        .unwrap();

        assert!(result.succeeded());
        assert!(result.mutation.unwrap().ok);
    }
}
