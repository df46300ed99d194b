// These tests drive the POSIX file media through the binary; on a Windows
// host the adapter targets the registry instead, so the suite is unix-only.
#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

/// Every invocation runs in its own sandbox: the profile, system file and
/// backup directory are steered into a temp dir through the ENVM_*
/// overrides, so nothing touches the real host.
fn envm(temp: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("envm").unwrap();
    cmd.current_dir(temp.path())
        .env("ENVM_PROFILE", temp.path().join("profile"))
        .env("ENVM_SYSTEM_FILE", temp.path().join("system"))
        .env("ENVM_BACKUP_DIR", temp.path().join("backups"));
    cmd
}

fn backup_ids(temp: &tempfile::TempDir) -> Vec<String> {
    let dir = temp.path().join("backups");
    if !dir.exists() {
        return Vec::new();
    }
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect()
}

#[test]
fn test_set_get_unset_round_trip() {
    let temp = tempfile::tempdir().unwrap();

    envm(&temp)
        .args(["set", "EDITOR", "vim"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set EDITOR in user scope"));

    envm(&temp)
        .args(["get", "EDITOR"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vim"));

    envm(&temp)
        .args(["unset", "EDITOR"])
        .assert()
        .success();

    envm(&temp)
        .args(["get", "EDITOR"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("not set"));
}

#[test]
fn test_set_writes_managed_block_and_backup() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join("profile"), "# dotfile\n").unwrap();

    envm(&temp)
        .args(["set", "EDITOR", "vim"])
        .assert()
        .success();

    let profile = fs::read_to_string(temp.path().join("profile")).unwrap();
    assert!(profile.starts_with("# dotfile\n"));
    assert!(profile.contains("# envm-begin"));
    assert!(profile.contains("export EDITOR='vim'"));
    assert!(profile.contains("# envm-end"));

    let ids = backup_ids(&temp);
    assert_eq!(ids.len(), 1);
    assert!(ids[0].starts_with("user-EDITOR-"));
    assert!(ids[0].ends_with(".bak"));
    // snapshot holds the pre-mutation content
    let snapshot = fs::read_to_string(temp.path().join("backups").join(&ids[0])).unwrap();
    assert_eq!(snapshot, "# dotfile\n");
}

#[test]
fn test_restore_rewrites_profile() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join("profile"), "# original\n").unwrap();

    envm(&temp)
        .args(["set", "EDITOR", "vim"])
        .assert()
        .success();
    let id = backup_ids(&temp).pop().unwrap();

    envm(&temp)
        .args(["restore", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored"));

    assert_eq!(
        fs::read_to_string(temp.path().join("profile")).unwrap(),
        "# original\n"
    );
}

#[test]
fn test_restore_malformed_id_fails() {
    let temp = tempfile::tempdir().unwrap();
    envm(&temp)
        .args(["restore", "not-a-backup-id"])
        .assert()
        .failure();
}

#[test]
fn test_backups_listing_and_purge() {
    let temp = tempfile::tempdir().unwrap();

    envm(&temp).args(["set", "A", "1"]).assert().success();
    envm(&temp).args(["set", "A", "2"]).assert().success();
    assert_eq!(backup_ids(&temp).len(), 2);

    envm(&temp)
        .args(["backups"])
        .assert()
        .success()
        .stdout(predicate::str::contains("user-A-"));

    envm(&temp)
        .args(["purge", "--max-per-scope", "1", "--max-age-days", "9999"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Purged 1 backup"));

    assert_eq!(backup_ids(&temp).len(), 1);

    // idempotent: nothing further to delete
    envm(&temp)
        .args(["purge", "--max-per-scope", "1", "--max-age-days", "9999"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to purge"));
}

#[test]
fn test_get_expand_uses_live_environment() {
    let temp = tempfile::tempdir().unwrap();

    envm(&temp)
        .args(["set", "TOOLS", "$ENVM_IT_HOME/bin"])
        .assert()
        .success();

    envm(&temp)
        .env("ENVM_IT_HOME", "/home/u")
        .args(["get", "TOOLS", "--expand"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/home/u/bin"));

    // without --expand the literal value comes back
    envm(&temp)
        .env("ENVM_IT_HOME", "/home/u")
        .args(["get", "TOOLS"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$ENVM_IT_HOME/bin"));
}

#[test]
fn test_dry_run_changes_nothing() {
    let temp = tempfile::tempdir().unwrap();

    envm(&temp)
        .args(["set", "EDITOR", "vim", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dry-run"));

    assert!(!temp.path().join("profile").exists());
    assert!(backup_ids(&temp).is_empty());
}

#[test]
fn test_system_scope_uses_system_file() {
    let temp = tempfile::tempdir().unwrap();

    envm(&temp)
        .args(["set", "RUST_LOG", "debug", "--scope", "system"])
        .assert()
        .success();

    let system = fs::read_to_string(temp.path().join("system")).unwrap();
    assert!(system.contains("RUST_LOG='debug'"));
    assert!(!temp.path().join("profile").exists());

    envm(&temp)
        .args(["get", "RUST_LOG", "--scope", "system"])
        .assert()
        .success()
        .stdout(predicate::str::contains("debug"));
}

#[test]
fn test_path_add_and_list() {
    let temp = tempfile::tempdir().unwrap();

    envm(&temp)
        .args(["set", "TOOLPATH", "/usr/bin"])
        .assert()
        .success();

    envm(&temp)
        .args(["path", "add", "/opt/bin", "--name", "TOOLPATH"])
        .assert()
        .success();

    envm(&temp)
        .args(["path", "list", "--name", "TOOLPATH"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("/usr/bin").and(predicate::str::contains("/opt/bin")),
        );
}

#[test]
fn test_session_scope_never_touches_media() {
    let temp = tempfile::tempdir().unwrap();

    envm(&temp)
        .args(["set", "THROWAWAY", "x", "--scope", "session"])
        .assert()
        .success();

    assert!(!temp.path().join("profile").exists());
    assert!(backup_ids(&temp).is_empty());
}

#[test]
fn test_unknown_scope_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    envm(&temp)
        .args(["get", "X", "--scope", "galaxy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown scope"));
}
