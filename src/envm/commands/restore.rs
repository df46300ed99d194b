use crate::backup::BackupStore;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::platform::EnvAdapter;

pub fn run(adapter: &dyn EnvAdapter, store: &BackupStore, id: &str) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let restored = store.restore(id, adapter);
    result.restored = Some(restored);
    if restored {
        result.add_message(CmdMessage::success(format!("Restored {}", id)));
    } else {
        result.add_message(CmdMessage::error(format!(
            "Could not restore '{}' (malformed id, unreadable snapshot, or medium rejected it)",
            id
        )));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MutateOptions, Scope};
    use crate::platform::PosixAdapter;
    use std::fs;

    #[test]
    fn test_restore_replays_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let adapter = PosixAdapter::new(tmp.path().join("profile"), tmp.path().join("system"));
        let store = BackupStore::new(tmp.path().join("backups"));
        let opts = MutateOptions::new(Scope::User);

        fs::write(tmp.path().join("profile"), "# before\n").unwrap();
        adapter.set(&store, "EDITOR", "vim", &opts).unwrap();
        let id = store.list(Some(Scope::User)).unwrap().pop().unwrap();

        let result = run(&adapter, &store, &id).unwrap();
        assert_eq!(result.restored, Some(true));
        assert!(result.succeeded());
        assert_eq!(
            fs::read_to_string(tmp.path().join("profile")).unwrap(),
            "# before\n"
        );
    }

    #[test]
    fn test_restore_malformed_id_fails_cleanly() {
        let tmp = tempfile::tempdir().unwrap();
        let adapter = PosixAdapter::new(tmp.path().join("profile"), tmp.path().join("system"));
        let store = BackupStore::new(tmp.path().join("backups"));

        let result = run(&adapter, &store, "garbage").unwrap();
        assert_eq!(result.restored, Some(false));
        assert!(!result.succeeded());
    }
}
