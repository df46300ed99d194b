use crate::backup::{parse_backup_id, BackupStore};
use crate::commands::{BackupListing, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Scope;

pub fn run(store: &BackupStore, scope: Option<Scope>) -> Result<CmdResult> {
    let mut ids = store.list(scope)?;
    // directory order is arbitrary; ids sort by recency because the
    // timestamp token is fixed-width
    ids.sort_by(|a, b| b.cmp(a));

    let listings: Vec<BackupListing> = ids
        .into_iter()
        .filter_map(|id| {
            parse_backup_id(&id).map(|parsed| BackupListing {
                id,
                scope: parsed.scope,
                name: parsed.name,
                timestamp: parsed.timestamp,
            })
        })
        .collect();

    let mut result = CmdResult::default().with_backups(listings);
    if result.backups.is_empty() {
        result.add_message(CmdMessage::info("No backups found."));
    }
    Ok(result)
}
