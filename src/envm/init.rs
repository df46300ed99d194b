use crate::api::EnvmApi;
use crate::backup::BackupStore;
use crate::config::EnvmConfig;
use crate::platform;
use directories::BaseDirs;
use std::path::{Path, PathBuf};

pub struct EnvmContext {
    pub api: EnvmApi,
    pub config: EnvmConfig,
}

/// Find the project root by walking up from cwd looking for a directory
/// containing .git. Stops at the home directory or the filesystem root;
/// returns None when nothing matches.
pub fn find_project_root(cwd: &Path) -> Option<PathBuf> {
    let home_dir = BaseDirs::new().map(|bd| bd.home_dir().to_path_buf());
    let mut current = cwd.to_path_buf();

    loop {
        if current.join(".git").exists() {
            return Some(current);
        }

        if let Some(ref home) = home_dir {
            if &current == home {
                return None;
            }
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => return None,
        }
    }
}

/// Wire up the context the binary runs with: project root, config file,
/// the host's platform adapter, and one backup store. `ENVM_BACKUP_DIR`
/// beats the config file, which beats the default
/// `.backup/.envm-backups` under the project root.
pub fn initialize(cwd: &Path) -> EnvmContext {
    let root = find_project_root(cwd).unwrap_or_else(|| cwd.to_path_buf());
    let config_dir = root.join(".envm");
    let config = EnvmConfig::load(&config_dir).unwrap_or_default();

    let backup_dir = std::env::var_os("ENVM_BACKUP_DIR")
        .map(PathBuf::from)
        .or_else(|| config.backup_dir.clone())
        .unwrap_or_else(|| BackupStore::default_dir(&root));

    let adapter = platform::host(
        config.profile_file.as_deref(),
        config.system_file.as_deref(),
    );
    let api = EnvmApi::new(adapter, BackupStore::new(backup_dir), config_dir);

    EnvmContext { api, config }
}
