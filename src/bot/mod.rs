//! The message loop: gateway → access guard → dispatcher → reply.

use crate::auth::{Access, AccessGuard};
use crate::channels::{Channel, ReplyFormat};
use crate::commands::{Command, Dispatcher};
use crate::config::Config;
use crate::security::ShellPolicy;
use crate::telemetry::TelemetryProvider;
use anyhow::Result;
use std::sync::Arc;

/// Run the bot until the gateway stops delivering messages.
///
/// Strictly one message at a time: the guard and its attempt tally are only
/// ever touched from this loop, so they need no locking. A long-running
/// `/cmd` therefore stalls the queue behind it, which is the point — the
/// operator issued it.
pub async fn run(
    config: Config,
    channel: Arc<dyn Channel>,
    telemetry: Box<dyn TelemetryProvider>,
) -> Result<()> {
    let dispatcher = Dispatcher::new(
        telemetry,
        ShellPolicy::from_config(&config),
        config.owner_username.clone(),
        config.max_attempts,
    );
    let mut guard = AccessGuard::new(config);

    let (tx, mut rx) = tokio::sync::mpsc::channel(32);
    let listener = {
        let channel = channel.clone();
        tokio::spawn(async move {
            if let Err(e) = channel.listen(tx).await {
                tracing::error!("channel listener stopped: {e:#}");
            }
        })
    };

    while let Some(msg) = rx.recv().await {
        match guard.authorize(msg.sender_id) {
            Access::Allowed => {
                // Unknown commands and plain text get no reply.
                let Some(command) = Command::parse(&msg.content) else {
                    continue;
                };
                let reply = dispatcher.dispatch(command).await;
                deliver(channel.as_ref(), &reply.text, &msg.chat_id, reply.format).await;
            }
            outcome => {
                if let Some(notice) = outcome.notice() {
                    deliver(channel.as_ref(), notice, &msg.chat_id, ReplyFormat::Plain).await;
                }
            }
        }
    }

    listener.abort();
    Ok(())
}

/// Replies are fire-and-forget: a delivery failure is logged, never fatal.
async fn deliver(channel: &dyn Channel, text: &str, chat_id: &str, format: ReplyFormat) {
    if let Err(e) = channel.send(text, chat_id, format).await {
        tracing::warn!("Failed to deliver reply to chat {chat_id}: {e:#}");
    }
}
