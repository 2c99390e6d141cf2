//! Shell command policy enforcement.

use crate::config::Config;

/// Allow/block filter over the base token of a shell command line.
///
/// The block-list always wins. An empty allow-list permits everything that
/// is not blocked, which is the default configuration.
#[derive(Debug, Clone, Default)]
pub struct ShellPolicy {
    allowed: Vec<String>,
    blocked: Vec<String>,
}

impl ShellPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            allowed: config.allowed_commands.clone(),
            blocked: config.blocked_commands.clone(),
        }
    }

    pub fn is_command_allowed(&self, command_line: &str) -> bool {
        let Some(base) = command_line.split_whitespace().next() else {
            return false;
        };
        if self.blocked.iter().any(|c| c == base) {
            return false;
        }
        if !self.allowed.is_empty() {
            return self.allowed.iter().any(|c| c == base);
        }
        true
    }
}
