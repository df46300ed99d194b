use crate::commands::{CmdMessage, CmdResult};
use crate::config::EnvmConfig;
use crate::error::{EnvmError, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = EnvmConfig::load(config_dir)?;
    let mut result = CmdResult::default();

    match action {
        ConfigAction::ShowAll => {
            result.config = Some(config);
        }
        ConfigAction::ShowKey(key) => {
            let value = read_key(&config, &key)?;
            result.add_message(CmdMessage::info(format!("{} = {}", key, value)));
        }
        ConfigAction::Set(key, value) => {
            write_key(&mut config, &key, &value)?;
            config.save(config_dir)?;
            result.add_message(CmdMessage::success(format!("{} = {}", key, value)));
            result.config = Some(config);
        }
    }
    Ok(result)
}

fn read_key(config: &EnvmConfig, key: &str) -> Result<String> {
    let show_path = |p: &Option<PathBuf>| {
        p.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<default>".to_string())
    };
    match key {
        "profile-file" => Ok(show_path(&config.profile_file)),
        "system-file" => Ok(show_path(&config.system_file)),
        "backup-dir" => Ok(show_path(&config.backup_dir)),
        "max-per-scope" => Ok(config.max_per_scope.to_string()),
        "max-age-days" => Ok(config.max_age_days.to_string()),
        other => Err(EnvmError::Api(format!("Unknown config key: {}", other))),
    }
}

fn write_key(config: &mut EnvmConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "profile-file" => config.profile_file = Some(PathBuf::from(value)),
        "system-file" => config.system_file = Some(PathBuf::from(value)),
        "backup-dir" => config.backup_dir = Some(PathBuf::from(value)),
        "max-per-scope" => {
            config.max_per_scope = value
                .parse()
                .map_err(|_| EnvmError::Api(format!("max-per-scope must be a count: {}", value)))?
        }
        "max-age-days" => {
            config.max_age_days = value.parse().map_err(|_| {
                EnvmError::Api(format!("max-age-days must be a number of days: {}", value))
            })?
        }
        other => return Err(EnvmError::Api(format!("Unknown config key: {}", other))),
    }
    Ok(())
}
