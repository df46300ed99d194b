//! POSIX adapter: text-file media.
//!
//! `user` scope lives in a marker-delimited block inside the user's profile
//! file; everything outside the markers belongs to the user and is preserved
//! verbatim. `system` scope is a flat `NAME='value'` file, one variable per
//! line. Reference syntax is `$VAR` / `${VAR}`.

use super::{session_get, session_set, EnvAdapter};
use crate::backup::BackupStore;
use crate::error::Result;
use crate::expand;
use crate::model::{MutateOptions, MutationResult, Scope};
use directories::BaseDirs;
use std::fs;
use std::path::{Path, PathBuf};

pub const BLOCK_BEGIN: &str = "# envm-begin";
pub const BLOCK_END: &str = "# envm-end";

const DEFAULT_SYSTEM_FILE: &str = "/etc/environment";

pub struct PosixAdapter {
    profile_path: PathBuf,
    system_path: PathBuf,
}

impl PosixAdapter {
    pub fn new(profile_path: impl Into<PathBuf>, system_path: impl Into<PathBuf>) -> Self {
        Self {
            profile_path: profile_path.into(),
            system_path: system_path.into(),
        }
    }

    /// Resolve the media paths. Precedence: `ENVM_PROFILE` /
    /// `ENVM_SYSTEM_FILE` environment overrides (tests and sandboxed
    /// runs), then the config file, then the platform defaults.
    pub fn resolve(profile_override: Option<&Path>, system_override: Option<&Path>) -> Self {
        let profile = std::env::var_os("ENVM_PROFILE")
            .map(PathBuf::from)
            .or_else(|| profile_override.map(Path::to_path_buf))
            .unwrap_or_else(default_profile_path);
        let system = std::env::var_os("ENVM_SYSTEM_FILE")
            .map(PathBuf::from)
            .or_else(|| system_override.map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SYSTEM_FILE));
        Self::new(profile, system)
    }

    pub fn profile_path(&self) -> &Path {
        &self.profile_path
    }

    pub fn system_path(&self) -> &Path {
        &self.system_path
    }

    fn medium_path(&self, scope: Scope) -> Option<&Path> {
        match scope {
            Scope::Session => None,
            Scope::User => Some(&self.profile_path),
            Scope::System => Some(&self.system_path),
        }
    }

    /// Shared body of `set`/`unset`: `desired` is `Some(value)` to write,
    /// `None` to remove.
    fn mutate(
        &self,
        backups: &BackupStore,
        name: &str,
        desired: Option<&str>,
        opts: &MutateOptions,
    ) -> Result<MutationResult> {
        let Some(path) = self.medium_path(opts.scope) else {
            return Ok(session_set(name, desired));
        };

        let mut result = MutationResult::new(opts.scope, name);
        result.value = desired.map(str::to_string);

        let before = read_or_empty(path);
        result.previous = parse_medium(opts.scope, &before, name);

        if opts.backup {
            let backup_path = backups.create(opts.scope, name, &before)?;
            result.note(format!("backup written to {}", backup_path.display()));
        }

        let after = apply_medium(opts.scope, &before, name, desired);
        if let Err(err) = fs::write(path, &after) {
            result.note(format!("write to {} failed: {}", path.display(), err));
            return Ok(result);
        }
        result.note(format!("wrote {}", path.display()));

        if opts.verify {
            let observed = self.get_raw(name, opts.scope)?;
            result.verified = observed.as_deref() == desired;
            if !result.verified {
                result.note("verification mismatch: re-read does not match intended state");
                if opts.rollback_on_fail && opts.backup {
                    match fs::write(path, &before) {
                        Ok(()) => {
                            result.rollback = Some(true);
                            result.note("rolled back to pre-mutation snapshot");
                        }
                        Err(err) => {
                            result.rollback = Some(false);
                            result.note(format!(
                                "rollback failed, medium left as written: {}",
                                err
                            ));
                        }
                    }
                } else {
                    result.note("medium left as written (rollback disabled or no backup)");
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

impl EnvAdapter for PosixAdapter {
    fn path_delimiter(&self) -> char {
        ':'
    }

    fn normalize_name(&self, name: &str) -> String {
        name.to_string()
    }

    fn get_raw(&self, name: &str, scope: Scope) -> Result<Option<String>> {
        match self.medium_path(scope) {
            None => Ok(session_get(name)),
            Some(path) => Ok(parse_medium(scope, &read_or_empty(path), name)),
        }
    }

    fn get_expanded(
        &self,
        name: &str,
        scope: Scope,
        across_scopes: bool,
    ) -> Result<Option<String>> {
        let Some(raw) = self.get_raw(name, scope)? else {
            return Ok(None);
        };
        let expanded = expand::expand_posix(&raw, name, |referenced| {
            session_get(referenced).or_else(|| {
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
        match self.medium_path(scope) {
            None => false,
            Some(path) => fs::write(path, content).is_ok(),
        }
    }
}

/// Unreadable or missing media read as empty content, not as an error.
fn read_or_empty(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}

fn parse_medium(scope: Scope, content: &str, name: &str) -> Option<String> {
    match scope {
        Scope::User => profile_get(content, name),
        Scope::System => system_get(content, name),
        Scope::Session => None,
    }
}

fn apply_medium(scope: Scope, content: &str, name: &str, desired: Option<&str>) -> String {
    match (scope, desired) {
        (Scope::User, Some(value)) => profile_upsert(content, name, value),
        (Scope::User, None) => profile_remove(content, name),
        (Scope::System, Some(value)) => system_upsert(content, name, value),
        (Scope::System, None) => system_remove(content, name),
        (Scope::Session, _) => content.to_string(),
    }
}

fn to_lines(content: &str) -> Vec<String> {
    if content.is_empty() {
        Vec::new()
    } else {
        content.split('\n').map(str::to_string).collect()
    }
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}

fn render_export(name: &str, value: &str) -> String {
    format!("export {}='{}'", name, value)
}

fn render_assign(name: &str, value: &str) -> String {
    format!("{}='{}'", name, value)
}

fn parse_export_line(line: &str) -> Option<(String, String)> {
    let rest = line.trim().strip_prefix("export ")?;
    let (name, value) = rest.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), unquote(value)))
}

fn parse_assign_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.starts_with('#') {
        return None;
    }
    let (name, value) = line.split_once('=')?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some((name.to_string(), unquote(value)))
}

/// Boundaries of the managed block: indexes of the begin and end marker
/// lines.
fn find_block(lines: &[String]) -> Option<(usize, usize)> {
    let begin = lines.iter().position(|l| l.trim() == BLOCK_BEGIN)?;
    let end = lines[begin + 1..]
        .iter()
        .position(|l| l.trim() == BLOCK_END)?
        + begin
        + 1;
    Some((begin, end))
}

fn profile_get(content: &str, name: &str) -> Option<String> {
    let lines = to_lines(content);
    let (begin, end) = find_block(&lines)?;
    lines[begin + 1..end].iter().find_map(|line| {
        parse_export_line(line).and_then(|(n, v)| if n == name { Some(v) } else { None })
    })
}

fn profile_upsert(content: &str, name: &str, value: &str) -> String {
    let entry = render_export(name, value);
    let mut lines = to_lines(content);
    match find_block(&lines) {
        Some((begin, end)) => {
            let existing = (begin + 1..end).find(|&i| {
                parse_export_line(&lines[i]).map(|(n, _)| n).as_deref() == Some(name)
            });
            match existing {
                Some(i) => lines[i] = entry,
                None => lines.insert(end, entry),
            }
        }
        None => {
            // no managed block yet: append one, keeping a trailing newline
            if matches!(lines.last(), Some(l) if l.is_empty()) {
                lines.pop();
            }
            lines.push(BLOCK_BEGIN.to_string());
            lines.push(entry);
            lines.push(BLOCK_END.to_string());
            lines.push(String::new());
        }
    }
    lines.join("\n")
}

fn profile_remove(content: &str, name: &str) -> String {
    let mut lines = to_lines(content);
    if let Some((begin, mut end)) = find_block(&lines) {
        let mut i = begin + 1;
        while i < end {
            if parse_export_line(&lines[i]).map(|(n, _)| n).as_deref() == Some(name) {
                lines.remove(i);
                end -= 1;
            } else {
                i += 1;
            }
        }
    }
    lines.join("\n")
}

fn system_get(content: &str, name: &str) -> Option<String> {
    content.lines().find_map(|line| {
        parse_assign_line(line).and_then(|(n, v)| if n == name { Some(v) } else { None })
    })
}

fn system_upsert(content: &str, name: &str, value: &str) -> String {
    let entry = render_assign(name, value);
    let mut lines = to_lines(content);
    let existing = lines
        .iter()
        .position(|l| parse_assign_line(l).map(|(n, _)| n).as_deref() == Some(name));
    match existing {
        Some(i) => lines[i] = entry,
        None => {
            if matches!(lines.last(), Some(l) if l.is_empty()) {
                lines.pop();
            }
            lines.push(entry);
            lines.push(String::new());
        }
    }
    lines.join("\n")
}

fn system_remove(content: &str, name: &str) -> String {
    let lines: Vec<String> = to_lines(content)
        .into_iter()
        .filter(|l| parse_assign_line(l).map(|(n, _)| n).as_deref() != Some(name))
        .collect();
    lines.join("\n")
}

fn default_profile_path() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".profile"))
        .unwrap_or_else(|| PathBuf::from(".profile"))
}
