//! PATH-like list editing on top of the segment utilities. The delimiter
//! comes from the adapter, so the same code edits `:`-separated lists on
//! POSIX and `;`-separated lists on Windows.

use crate::backup::BackupStore;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{EnvmError, Result};
use crate::model::MutateOptions;
use crate::platform::EnvAdapter;
use crate::segments;

#[derive(Debug, Clone)]
pub enum PathAction {
    List,
    Add(String),
    Remove(String),
    Dedupe,
}

pub fn run(
    adapter: &dyn EnvAdapter,
    backups: &BackupStore,
    name: &str,
    action: PathAction,
    opts: &MutateOptions,
) -> Result<CmdResult> {
    let name = adapter.normalize_name(name);
    let delimiter = adapter.path_delimiter();
    // Windows paths compare case-insensitively
    let case_insensitive = delimiter == ';';

    let current = adapter.get_raw(&name, opts.scope)?.unwrap_or_default();
    let segs = segments::split(&current, delimiter);

    let mut result = CmdResult::default();
    let updated = match action {
        PathAction::List => {
            return Ok(result.with_segments(segs));
        }
        PathAction::Add(segment) => {
            let segment = segment.trim().to_string();
            if !segments::validate(std::slice::from_ref(&segment)) {
                return Err(EnvmError::Api(format!(
                    "Invalid path segment: {:?}",
                    segment
                )));
            }
            let already = segs.iter().any(|s| {
                if case_insensitive {
                    s.eq_ignore_ascii_case(&segment)
                } else {
                    s == &segment
                }
            });
            if already {
                result.add_message(CmdMessage::info(format!(
                    "{} already contains {}",
                    name, segment
                )));
                return Ok(result);
            }
            let mut segs = segs;
            segs.push(segment);
            segs
        }
        PathAction::Remove(segment) => {
            let segment = segment.trim();
            let mut segs = segs;
            let before = segs.len();
            segs.retain(|s| {
                if case_insensitive {
                    !s.eq_ignore_ascii_case(segment)
                } else {
                    s != segment
                }
            });
            if segs.len() == before {
                result.add_message(CmdMessage::info(format!(
                    "{} does not contain {}",
                    name, segment
                )));
                return Ok(result);
            }
            segs
        }
        PathAction::Dedupe => {
            let deduped = segments::unique(&segs, case_insensitive);
            if deduped.len() == segs.len() {
                result.add_message(CmdMessage::info(format!("{} has no duplicates", name)));
                return Ok(result);
            }
            deduped
        }
    };

    let joined = segments::join(&updated, delimiter);
    let mutation = adapter.set(backups, &name, &joined, opts)?;
    if mutation.ok {
        result.add_message(CmdMessage::success(format!(
            "Updated {} in {} scope ({} segments)",
            name,
            opts.scope,
            updated.len()
        )));
    } else {
        result.add_message(CmdMessage::error(format!(
            "Failed to update {} in {} scope",
            name, opts.scope
        )));
    }
    Ok(result.with_mutation(mutation).with_segments(updated))
}
