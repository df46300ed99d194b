use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Scope;
use crate::platform::EnvAdapter;

pub fn run(
    adapter: &dyn EnvAdapter,
    name: &str,
    scope: Scope,
    expand: bool,
    across_scopes: bool,
) -> Result<CmdResult> {
    let name = adapter.normalize_name(name);
    let value = if expand {
        adapter.get_expanded(&name, scope, across_scopes)?
    } else {
        adapter.get_raw(&name, scope)?
    };

    let mut result = CmdResult::default();
    match value {
        Some(v) => result.value = Some(v),
        None => result.add_message(CmdMessage::warning(format!(
            "{} is not set in {} scope",
            name, scope
        ))),
    }
    Ok(result)
}
