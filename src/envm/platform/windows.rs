//! Windows adapter: registry media.
//!
//! `user` scope is `HKCU\Environment`, `system` scope is the machine's
//! `Session Manager\Environment` key. All access shells out to `reg.exe`
//! (query/add/delete/export/import) as blocking external-process calls;
//! a nonzero exit code maps to a failed `MutationResult`, never a thrown
//! error. There is no timeout on the tool; if it hangs, the operation
//! hangs with it. Names are uppercase-normalized before every operation so
//! lookups behave like the platform's own case-insensitive semantics.
//! Reference syntax is `%VAR%`.

use super::{session_get, session_set, EnvAdapter};
use crate::backup::BackupStore;
use crate::error::Result;
use crate::expand;
use crate::model::{MutateOptions, MutationResult, Scope};
use once_cell::sync::Lazy;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::atomic::{AtomicU64, Ordering};

const USER_KEY: &str = r"HKCU\Environment";
const SYSTEM_KEY: &str = r"HKLM\SYSTEM\CurrentControlSet\Control\Session Manager\Environment";

/// Full path to reg.exe, resolved once per process. Falls back to a PATH
/// lookup when `WINDIR` is unset or unusual.
static REG_EXE: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var_os("WINDIR")
        .map(|windir| PathBuf::from(windir).join("System32").join("reg.exe"))
        .filter(|p| p.exists())
        .unwrap_or_else(|| PathBuf::from("reg.exe"))
});

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Default)]
pub struct WindowsAdapter;

impl WindowsAdapter {
    pub fn new() -> Self {
        Self
    }

    fn key_for(scope: Scope) -> Option<&'static str> {
        match scope {
            Scope::Session => None,
            Scope::User => Some(USER_KEY),
            Scope::System => Some(SYSTEM_KEY),
        }
    }

    fn reg(args: &[&str]) -> std::io::Result<Output> {
        Command::new(&*REG_EXE).args(args).output()
    }

    /// Literal value of `name` under `key`; an absent value, absent key or
    /// unreachable tool all read as `None`.
    fn query_value(key: &str, name: &str) -> Option<String> {
        let output = Self::reg(&["query", key, "/v", name]).ok()?;
        if !output.status.success() {
            return None;
        }
        parse_query_output(&String::from_utf8_lossy(&output.stdout), name)
    }

    /// Full export of `key` as decoded text, the medium content the backup
    /// and rollback steps work with. Unreachable keys export as empty.
    fn export_key(key: &str) -> String {
        let path = temp_reg_path("export");
        let content = Self::reg(&["export", key, &path.to_string_lossy(), "/y"])
            .ok()
            .filter(|o| o.status.success())
            .and_then(|_| fs::read(&path).ok())
            .map(|bytes| decode_registry_text(&bytes));
        let _ = fs::remove_file(&path);
        content.unwrap_or_default()
    }

    /// Re-import a previously exported blob into the hive.
    fn import_blob(content: &str) -> bool {
        let path = temp_reg_path("import");
        let ok = fs::write(&path, encode_registry_text(content)).is_ok()
            && Self::reg(&["import", &path.to_string_lossy()])
                .map(|o| o.status.success())
                .unwrap_or(false);
        let _ = fs::remove_file(&path);
        ok
    }

    fn mutate(
        &self,
        backups: &BackupStore,
        name: &str,
        desired: Option<&str>,
        opts: &MutateOptions,
    ) -> Result<MutationResult> {
        let name = self.normalize_name(name);
        let Some(key) = Self::key_for(opts.scope) else {
            return Ok(session_set(&name, desired));
        };

        let mut result = MutationResult::new(opts.scope, name.as_str());
        result.value = desired.map(str::to_string);

        let before = Self::export_key(key);
        result.previous = Self::query_value(key, &name);

        if opts.backup {
            let backup_path = backups.create(opts.scope, &name, &before)?;
            result.note(format!("backup written to {}", backup_path.display()));
        }

        let write_outcome = match desired {
            Some(value) => {
                Some(Self::reg(&["add", key, "/v", &name, "/t", "REG_SZ", "/d", value, "/f"]))
            }
            // removing an already-absent value is a no-op, like the POSIX
            // file media
            None if result.previous.is_none() => None,
            None => Some(Self::reg(&["delete", key, "/v", &name, "/f"])),
        };

        match write_outcome {
            None => result.note(format!("{} already absent from {}", name, key)),
            Some(Err(err)) => {
                result.note(format!("failed to run registry tool: {}", err));
                return Ok(result);
            }
            Some(Ok(output)) if !output.status.success() => {
                result.note(format!(
                    "registry tool exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ));
                return Ok(result);
            }
            Some(Ok(_)) => result.note(format!("wrote {}", key)),
        }

        if opts.verify {
            let observed = Self::query_value(key, &name);
            result.verified = observed.as_deref() == desired;
            if !result.verified {
                result.note("verification mismatch: re-read does not match intended state");
                if opts.rollback_on_fail && opts.backup {
                    let rolled = Self::import_blob(&before);
                    result.rollback = Some(rolled);
                    result.note(if rolled {
                        "rolled back to pre-mutation snapshot".to_string()
                    } else {
                        "rollback failed, key left as written".to_string()
                    });
                } else {
                    result.note("key left as written (rollback disabled or no backup)");
                }
            }
        } else {
            result.verified = true;
            result.note("verification skipped");
        }

        result.ok = result.verified;
        Ok(result)
    }
}

impl EnvAdapter for WindowsAdapter {
    fn path_delimiter(&self) -> char {
        ';'
    }

    fn normalize_name(&self, name: &str) -> String {
        name.to_uppercase()
    }

    fn get_raw(&self, name: &str, scope: Scope) -> Result<Option<String>> {
        let name = self.normalize_name(name);
        match Self::key_for(scope) {
            None => Ok(session_get(&name)),
            Some(key) => Ok(Self::query_value(key, &name)),
        }
    }

    fn get_expanded(
        &self,
        name: &str,
        scope: Scope,
        across_scopes: bool,
    ) -> Result<Option<String>> {
        let name = self.normalize_name(name);
        let Some(raw) = self.get_raw(&name, scope)? else {
            return Ok(None);
        };
        let expanded = expand::expand_windows(&raw, &name, |referenced| {
            session_get(referenced)
                .or_else(|| session_get(&referenced.to_uppercase()))
                .or_else(|| {
                    if across_scopes {
                        self.get_raw(referenced, scope).ok().flatten()
                    } else {
                        None
                    }
                })
        });
        Ok(Some(expanded))
    }

    fn set(
        &self,
        backups: &BackupStore,
        name: &str,
        value: &str,
        opts: &MutateOptions,
    ) -> Result<MutationResult> {
        self.mutate(backups, name, Some(value), opts)
    }

    fn unset(
        &self,
        backups: &BackupStore,
        name: &str,
        opts: &MutateOptions,
    ) -> Result<MutationResult> {
        self.mutate(backups, name, None, opts)
    }

    fn restore_from_backup(&self, content: &str, scope: Scope) -> bool {
        match Self::key_for(scope) {
            None => false,
            Some(_) => Self::import_blob(content),
        }
    }
}

fn temp_reg_path(tag: &str) -> PathBuf {
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("envm-{}-{}-{}.reg", tag, std::process::id(), seq))
}

/// Pick `name`'s value out of `reg query` output. Columns are separated by
/// runs of four spaces:
///
/// ```text
/// HKEY_CURRENT_USER\Environment
///     PATH    REG_EXPAND_SZ    %USERPROFILE%\bin;C:\tools
/// ```
fn parse_query_output(stdout: &str, name: &str) -> Option<String> {
    for line in stdout.lines() {
        let line = line.trim();
        let mut cols = line.splitn(3, "    ").map(str::trim);
        let (Some(col_name), Some(col_type), col_value) = (cols.next(), cols.next(), cols.next())
        else {
            continue;
        };
        if !col_name.eq_ignore_ascii_case(name) || !col_type.starts_with("REG_") {
            continue;
        }
        return Some(col_value.unwrap_or("").to_string());
    }
    None
}

/// `reg export` writes UTF-16LE with a BOM; older tools and tests may hand
/// us plain bytes.
fn decode_registry_text(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xFE {
        let wide: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&wide)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

fn encode_registry_text(content: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in content.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}
