use crate::backup::{BackupStore, RetentionPolicy};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;

pub fn run(store: &BackupStore, policy: &RetentionPolicy) -> Result<CmdResult> {
    let purged = store.purge(policy)?;
    let mut result = CmdResult::default();
    result.purged = Some(purged);
    if purged == 0 {
        result.add_message(CmdMessage::info("Nothing to purge."));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Purged {} backup{}.",
            purged,
            if purged == 1 { "" } else { "s" }
        )));
    }
    Ok(result)
}
