use crate::backup::RetentionPolicy;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";

fn default_max_per_scope() -> usize {
    20
}

fn default_max_age_days() -> i64 {
    30
}

/// Configuration for envm, stored in .envm/config.json under the project
/// root. Every field is optional in the file; `ENVM_*` environment
/// variables override the path fields at runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvmConfig {
    /// Profile file carrying the user-scope managed block
    #[serde(default)]
    pub profile_file: Option<PathBuf>,

    /// System-wide environment file (POSIX hosts)
    #[serde(default)]
    pub system_file: Option<PathBuf>,

    /// Where backup snapshots live
    #[serde(default)]
    pub backup_dir: Option<PathBuf>,

    /// Retention: backups kept per scope
    #[serde(default = "default_max_per_scope")]
    pub max_per_scope: usize,

    /// Retention: maximum backup age in days
    #[serde(default = "default_max_age_days")]
    pub max_age_days: i64,
}

impl Default for EnvmConfig {
    fn default() -> Self {
        Self {
            profile_file: None,
            system_file: None,
            backup_dir: None,
            max_per_scope: default_max_per_scope(),
            max_age_days: default_max_age_days(),
        }
    }
}

impl EnvmConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: EnvmConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    pub fn retention(&self) -> RetentionPolicy {
        RetentionPolicy {
            max_per_scope: self.max_per_scope,
            max_age_days: self.max_age_days,
        }
    }
}
