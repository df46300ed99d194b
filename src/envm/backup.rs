//! # Backup Store
//!
//! Append-only archive of pre-mutation snapshots. Every record is one file
//! holding the full content of a medium as it was just before a persistent
//! write: the entire profile/system file on POSIX, a registry export of
//! the relevant key on Windows. Records are keyed by
//! `{scope}-{name}-{timestamp}.bak`; the timestamp is RFC 3339 UTC with
//! millisecond precision and `:`/`.` replaced by `-`, which keeps the token
//! fixed-width and zero-padded so plain string sort equals time sort.
//!
//! The store exclusively owns the snapshot files. Adapters only ask it to
//! create records and hand snapshots back by id; retention (count- and
//! age-based purge) lives here too.

use crate::error::Result;
use crate::model::Scope;
use crate::platform::EnvAdapter;
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const BACKUP_EXT: &str = ".bak";

/// Length of `2026-08-07T12-34-56-789Z`.
const TIMESTAMP_TOKEN_LEN: usize = 24;

/// Count- and age-based retention. The two thresholds are independent:
/// a record is removed when it is beyond the `max_per_scope` most recent
/// for its scope OR older than `max_age_days`, whichever triggers first.
/// Each scope's retention is evaluated against only that scope's records.
#[derive(Debug, Clone, Copy)]
pub struct RetentionPolicy {
    pub max_per_scope: usize,
    pub max_age_days: i64,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_per_scope: 20,
            max_age_days: 30,
        }
    }
}

/// The pieces of a backup identifier.
#[derive(Debug, Clone)]
pub struct ParsedBackupId {
    pub scope: Scope,
    pub name: String,
    /// `None` when the embedded token does not parse back to an instant.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Filesystem-safe timestamp token for backup ids.
pub fn timestamp_token(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

fn parse_timestamp_token(token: &str) -> Option<DateTime<Utc>> {
    if token.len() != TIMESTAMP_TOKEN_LEN || !token.is_ascii() {
        return None;
    }
    // 2026-08-07T12-34-56-789Z -> 2026-08-07T12:34:56.789Z
    let mut bytes = token.as_bytes().to_vec();
    bytes[13] = b':';
    bytes[16] = b':';
    bytes[19] = b'.';
    let restored = String::from_utf8(bytes).ok()?;
    DateTime::parse_from_rfc3339(&restored)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Parse `{scope}-{name}-{timestamp}.bak`. Returns `None` when the id does
/// not fit the pattern at all; an id whose shape is right but whose
/// timestamp token is garbage still parses, with `timestamp: None`.
pub fn parse_backup_id(id: &str) -> Option<ParsedBackupId> {
    let stem = id.strip_suffix(BACKUP_EXT)?;
    let (scope_str, rest) = stem.split_once('-')?;
    let scope = Scope::from_str(scope_str).ok()?;
    if rest.len() < TIMESTAMP_TOKEN_LEN + 2
        || !rest.is_char_boundary(rest.len() - TIMESTAMP_TOKEN_LEN)
    {
        return None;
    }
    let (head, token) = rest.split_at(rest.len() - TIMESTAMP_TOKEN_LEN);
    let name = head.strip_suffix('-')?;
    if name.is_empty() {
        return None;
    }
    Some(ParsedBackupId {
        scope,
        name: name.to_string(),
        timestamp: parse_timestamp_token(token),
    })
}

/// File-based snapshot archive rooted at one directory.
///
/// The directory is plain instance state: the CLI builds a single store at
/// startup, tests build as many as they like against temp dirs.
pub struct BackupStore {
    dir: PathBuf,
}

impl BackupStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default location under a project root.
    pub fn default_dir(project_root: &Path) -> PathBuf {
        project_root.join(".backup").join(".envm-backups")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Point the store somewhere else. Affects all subsequent operations on
    /// this instance.
    pub fn set_dir(&mut self, dir: impl Into<PathBuf>) {
        self.dir = dir.into();
    }

    /// Persist `content` verbatim as a new record. Directory creation and
    /// write failures propagate; a backup that silently failed to land
    /// would defeat the rollback guarantee built on top of it.
    pub fn create(&self, scope: Scope, name: &str, content: &str) -> Result<PathBuf> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        let id = format!(
            "{}-{}-{}{}",
            scope,
            name,
            timestamp_token(Utc::now()),
            BACKUP_EXT
        );
        let path = self.dir.join(id);
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Backup ids, optionally filtered to one scope, in directory order.
    /// Callers needing recency order sort by the embedded timestamp (plain
    /// string sort on the id works).
    pub fn list(&self, scope: Option<Scope>) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let prefix = scope.map(|s| format!("{}-", s));
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let id = entry.file_name().to_string_lossy().to_string();
            if !id.ends_with(BACKUP_EXT) {
                continue;
            }
            if let Some(ref p) = prefix {
                if !id.starts_with(p.as_str()) {
                    continue;
                }
            }
            ids.push(id);
        }
        Ok(ids)
    }

    /// Raw snapshot content for an id.
    pub fn read(&self, id: &str) -> Result<String> {
        Ok(fs::read_to_string(self.dir.join(id))?)
    }

    /// Replay a snapshot back into its medium through the given adapter.
    /// A malformed id or unreadable record returns `false` without
    /// touching any medium.
    pub fn restore(&self, id: &str, adapter: &dyn EnvAdapter) -> bool {
        let Some(parsed) = parse_backup_id(id) else {
            return false;
        };
        let Ok(content) = self.read(id) else {
            return false;
        };
        adapter.restore_from_backup(&content, parsed.scope)
    }

    /// Delete records beyond the retention policy; returns how many files
    /// were removed. Idempotent: a second call with the same content and
    /// policy deletes nothing further. Files whose names don't fit the
    /// backup pattern are left alone; a record with an unparseable
    /// timestamp is kept unless it exceeds the count threshold.
    pub fn purge(&self, policy: &RetentionPolicy) -> Result<usize> {
        let mut by_scope: HashMap<Scope, Vec<(String, Option<DateTime<Utc>>)>> = HashMap::new();
        for id in self.list(None)? {
            if let Some(parsed) = parse_backup_id(&id) {
                by_scope
                    .entry(parsed.scope)
                    .or_default()
                    .push((id, parsed.timestamp));
            }
        }

        let cutoff = Utc::now() - TimeDelta::days(policy.max_age_days);
        let mut deleted = 0;
        for group in by_scope.values_mut() {
            // Filename-descending is recency-descending: the timestamp
            // token is fixed-width and zero-padded.
            group.sort_by(|a, b| b.0.cmp(&a.0));
            for (i, (id, timestamp)) in group.iter().enumerate() {
                let beyond_count = i >= policy.max_per_scope;
                let too_old = timestamp.map(|t| t < cutoff).unwrap_or(false);
                if beyond_count || too_old {
                    fs::remove_file(self.dir.join(id))?;
                    deleted += 1;
                }
            }
        }
        Ok(deleted)
    }
}
