//! Sender authorization and lockout.

use crate::config::Config;
use std::collections::HashMap;

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Sender may proceed to dispatch. No reply is owed.
    Allowed,
    /// Unauthorized, still below the attempt threshold.
    Denied,
    /// Already on the block-list.
    Blocked,
    /// This attempt crossed the threshold; the id was just block-listed.
    JustBlocked,
}

impl Access {
    /// Fixed notice owed to the sender. Exactly one per non-allowed outcome.
    pub fn notice(self) -> Option<&'static str> {
        match self {
            Access::Allowed => None,
            Access::Denied => Some("⚠️ Você não está autorizado!"),
            Access::Blocked => Some("❌ Você está bloqueado! Contate o administrador."),
            Access::JustBlocked => Some("🚫 Muitas tentativas! Você foi bloqueado."),
        }
    }
}

/// Gate in front of the dispatcher. Owns the configuration and the
/// in-memory failed-attempt tally; nothing else touches either.
pub struct AccessGuard {
    config: Config,
    attempts: HashMap<i64, u32>,
}

impl AccessGuard {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            attempts: HashMap::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    #[cfg(test)]
    fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Decide whether `user_id` may issue commands.
    ///
    /// Order matters: the block-list wins over the allow-list, so an id on
    /// both stays blocked. Unknown ids accumulate one failed attempt per
    /// message; at `max_attempts` the id is appended to the block-list and
    /// the whole configuration is rewritten to disk. A write failure is
    /// logged and the in-memory block stays authoritative for the rest of
    /// the process lifetime.
    ///
    /// The tally never resets, not even when an id is later allow-listed by
    /// hand: while allow-listed the count is simply never consulted, and
    /// removing the id again resumes counting where it left off. Upstream
    /// behaved this way; whether that was intentional is anyone's guess, so
    /// it is kept as observed.
    pub fn authorize(&mut self, user_id: i64) -> Access {
        if self.config.blocked_ids.contains(&user_id) {
            return Access::Blocked;
        }
        if self.config.allowed_ids.contains(&user_id) {
            return Access::Allowed;
        }

        let count = self.attempts.entry(user_id).or_insert(0);
        *count += 1;
        if *count >= self.config.max_attempts {
            self.config.blocked_ids.push(user_id);
            if let Err(e) = self.config.save() {
                tracing::warn!("Failed to persist block-list entry for {user_id}: {e:#}");
            }
            Access::JustBlocked
        } else {
            Access::Denied
        }
    }
}
