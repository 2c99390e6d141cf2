use anyhow::{Context, Result, bail};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted bot configuration.
///
/// Lives at `~/.shellclaw/config.toml` and is read exactly once at startup.
/// The file is rewritten in full whenever the block-list changes; nothing
/// else mutates it at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Telegram bot token, passed through to the gateway.
    pub token: String,

    /// Shown in the welcome text. Never consulted for authorization.
    #[serde(default)]
    pub owner_username: String,

    /// User ids permitted to issue commands.
    #[serde(default)]
    pub allowed_ids: Vec<i64>,

    /// User ids unconditionally denied. Checked before the allow-list, so
    /// an id on both lists stays blocked.
    #[serde(default)]
    pub blocked_ids: Vec<i64>,

    /// Consecutive failed attempts before an id is auto-blocked.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Shell base commands that may run. Empty means everything not blocked.
    #[serde(default)]
    pub allowed_commands: Vec<String>,

    /// Shell base commands that never run, regardless of the allow-list.
    #[serde(default)]
    pub blocked_commands: Vec<String>,

    /// Where this config was loaded from. Set at load time, not serialized.
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_max_attempts() -> u32 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: String::new(),
            owner_username: String::new(),
            allowed_ids: Vec::new(),
            blocked_ids: Vec::new(),
            max_attempts: default_max_attempts(),
            allowed_commands: Vec::new(),
            blocked_commands: Vec::new(),
            config_path: PathBuf::new(),
        }
    }
}

impl Config {
    /// Load from the fixed per-user path. A missing or unparseable file is
    /// fatal: the bot cannot run without a token and an owner.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!(
                "Failed to read config file: {} (create it before starting the bot)",
                path.display()
            )
        })?;
        let mut config: Config =
            toml::from_str(&contents).context("Failed to parse config file")?;
        if config.token.is_empty() {
            bail!("Config file has no bot token: {}", path.display());
        }
        if config.max_attempts == 0 {
            bail!("max_attempts must be at least 1");
        }
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Rewrite the whole file in place. The block-list is the only runtime
    /// mutation, and the caller keeps the in-memory state authoritative if
    /// this fails.
    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).with_context(|| {
            format!("Failed to write config file: {}", self.config_path.display())
        })?;
        Ok(())
    }

    fn default_path() -> Result<PathBuf> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Ok(home.join(".shellclaw").join("config.toml"))
    }
}
