use crate::backup::BackupStore;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::MutateOptions;
use crate::platform::EnvAdapter;

pub fn run(
    adapter: &dyn EnvAdapter,
    backups: &BackupStore,
    name: &str,
    opts: &MutateOptions,
    dry_run: bool,
) -> Result<CmdResult> {
    let name = adapter.normalize_name(name);
    let mut result = CmdResult::default();

    if dry_run {
        let previous = adapter.get_raw(&name, opts.scope)?;
        result.add_message(CmdMessage::info(format!(
            "dry-run: would unset {} in {} scope (previous: {})",
            name,
            opts.scope,
            previous.as_deref().unwrap_or("<unset>")
        )));
        return Ok(result);
    }

    let mutation = adapter.unset(backups, &name, opts)?;
    if mutation.ok {
        result.add_message(CmdMessage::success(format!(
            "Unset {} in {} scope",
            name, opts.scope
        )));
    } else {
        result.add_message(CmdMessage::error(format!(
            "Failed to unset {} in {} scope",
            name, opts.scope
        )));
    }
    Ok(result.with_mutation(mutation))
}
