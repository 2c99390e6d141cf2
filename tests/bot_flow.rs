//! End-to-end loop tests: scripted channel in, replies out, lockout state
//! persisted to a real temp file.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use shellclaw::bot;
use shellclaw::channels::{Channel, ChannelMessage, ReplyFormat};
use shellclaw::config::Config;
use shellclaw::telemetry::{
    CpuInfo, DiskInfo, HostInfo, MemoryInfo, NetworkSnapshot, ProcessInfo, TelemetryError,
    TelemetryProvider,
};

/// Replays a fixed list of inbound messages, records every outgoing reply,
/// then hangs up so the bot loop drains and returns.
struct ScriptedChannel {
    inbound: Mutex<Vec<ChannelMessage>>,
    sent: Mutex<Vec<(String, String, ReplyFormat)>>,
}

impl ScriptedChannel {
    fn new(script: &[(i64, &str)]) -> Arc<Self> {
        let inbound = script
            .iter()
            .enumerate()
            .map(|(i, (sender_id, text))| ChannelMessage {
                id: i.to_string(),
                sender_id: *sender_id,
                chat_id: "100".into(),
                content: (*text).to_string(),
                timestamp: i as u64,
            })
            .collect();
        Arc::new(Self {
            inbound: Mutex::new(inbound),
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text, _)| text.clone())
            .collect()
    }
}

#[async_trait]
impl Channel for ScriptedChannel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn send(
        &self,
        message: &str,
        recipient: &str,
        format: ReplyFormat,
    ) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), message.to_string(), format));
        Ok(())
    }

    async fn listen(&self, tx: tokio::sync::mpsc::Sender<ChannelMessage>) -> anyhow::Result<()> {
        let script: Vec<ChannelMessage> = self.inbound.lock().unwrap().drain(..).collect();
        for msg in script {
            if tx.send(msg).await.is_err() {
                break;
            }
        }
        Ok(())
    }
}

struct FixtureTelemetry;

impl TelemetryProvider for FixtureTelemetry {
    fn host(&self) -> Result<HostInfo, TelemetryError> {
        Ok(HostInfo {
            platform: "Ubuntu".into(),
            os_version: "24.04".into(),
            arch: "x86_64".into(),
            uptime_secs: 7200,
        })
    }

    fn cpu(&self) -> Result<CpuInfo, TelemetryError> {
        Ok(CpuInfo {
            model: "Test CPU".into(),
            cores: 4,
            frequency_mhz: 2400,
        })
    }

    fn memory(&self) -> Result<MemoryInfo, TelemetryError> {
        Ok(MemoryInfo {
            total: 8_589_934_592,
            used: 4_294_967_296,
            free: 4_294_967_296,
            used_percent: 50.0,
        })
    }

    fn swap(&self) -> Result<MemoryInfo, TelemetryError> {
        self.memory()
    }

    fn processes(&self) -> Result<Vec<ProcessInfo>, TelemetryError> {
        Ok(vec![ProcessInfo {
            pid: 1,
            name: "init".into(),
            cpu_percent: 0.5,
            mem_percent: 0.1,
        }])
    }

    fn disks(&self) -> Result<Vec<DiskInfo>, TelemetryError> {
        Ok(vec![])
    }

    fn network(&self) -> Result<NetworkSnapshot, TelemetryError> {
        Ok(NetworkSnapshot {
            interfaces: vec![],
            counters: vec![],
        })
    }
}

fn test_config(tmp: &tempfile::TempDir, max_attempts: u32) -> Config {
    Config {
        token: "123:ABC".into(),
        owner_username: "alice".into(),
        max_attempts,
        config_path: tmp.path().join("config.toml"),
        ..Config::default()
    }
}

#[tokio::test]
async fn unknown_sender_is_locked_out_after_three_attempts() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(&tmp, 3);
    let channel = ScriptedChannel::new(&[
        (7, "/status"),
        (7, "/status"),
        (7, "/status"),
        (7, "/status"),
    ]);

    bot::run(config, channel.clone(), Box::new(FixtureTelemetry))
        .await
        .unwrap();

    let sent = channel.sent_texts();
    assert_eq!(
        sent,
        vec![
            "⚠️ Você não está autorizado!".to_string(),
            "⚠️ Você não está autorizado!".to_string(),
            "🚫 Muitas tentativas! Você foi bloqueado.".to_string(),
            "❌ Você está bloqueado! Contate o administrador.".to_string(),
        ]
    );

    let persisted = Config::load_from(&tmp.path().join("config.toml")).unwrap();
    assert_eq!(persisted.blocked_ids, vec![7]);
}

#[tokio::test]
async fn non_command_text_still_burns_an_attempt() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(&tmp, 2);
    let channel = ScriptedChannel::new(&[(8, "oi tudo bem"), (8, "alo?")]);

    bot::run(config, channel.clone(), Box::new(FixtureTelemetry))
        .await
        .unwrap();

    let sent = channel.sent_texts();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].contains("não está autorizado"));
    assert!(sent[1].contains("Muitas tentativas"));
}

#[tokio::test]
async fn blocked_wins_over_allowed() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = test_config(&tmp, 3);
    config.allowed_ids.push(2);
    config.blocked_ids.push(2);
    let channel = ScriptedChannel::new(&[(2, "/status")]);

    bot::run(config, channel.clone(), Box::new(FixtureTelemetry))
        .await
        .unwrap();

    let sent = channel.sent_texts();
    assert_eq!(sent, vec!["❌ Você está bloqueado! Contate o administrador.".to_string()]);
}

#[tokio::test]
async fn allowed_sender_gets_command_replies_and_silence_for_noise() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = test_config(&tmp, 3);
    config.allowed_ids.push(1);
    let channel = ScriptedChannel::new(&[
        (1, "/cmd echo hi"),
        (1, "oi tudo bem"),
        (1, "/naoexiste"),
        (1, "/cmd"),
        (1, "/memoria"),
    ]);

    bot::run(config, channel.clone(), Box::new(FixtureTelemetry))
        .await
        .unwrap();

    let sent = channel.sent_texts();
    // Plain text and unknown commands get no reply at all.
    assert_eq!(sent.len(), 3);
    assert!(sent[0].starts_with("✅ Resultado:"));
    assert!(sent[0].contains("hi"));
    assert_eq!(sent[1], "⚠️ Uso: /cmd <comando>");
    assert!(sent[2].contains("Total: 8.00 GB"));
    assert!(sent[2].contains("Livre: 4.00 GB"));
    assert!(sent[2].contains("Uso: 50.00%"));

    // Nothing was ever blocked and the config never rewritten.
    assert!(!tmp.path().join("config.toml").exists());
}

#[tokio::test]
async fn start_welcome_is_parameterized() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = test_config(&tmp, 5);
    config.allowed_ids.push(1);
    let channel = ScriptedChannel::new(&[(1, "/start"), (1, "/ajuda")]);

    bot::run(config, channel.clone(), Box::new(FixtureTelemetry))
        .await
        .unwrap();

    let sent = channel.sent_texts();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], sent[1]);
    assert!(sent[0].contains("Após 5 tentativas falhas"));
    assert!(sent[0].contains("@alice"));
}

#[tokio::test]
async fn attempt_tally_survives_between_messages_but_not_processes() {
    let tmp = tempfile::tempdir().unwrap();

    // First process lifetime: one failed attempt, below the threshold.
    let config = test_config(&tmp, 2);
    let channel = ScriptedChannel::new(&[(9, "/status")]);
    bot::run(config, channel.clone(), Box::new(FixtureTelemetry))
        .await
        .unwrap();
    assert!(channel.sent_texts()[0].contains("não está autorizado"));
    assert!(!tmp.path().join("config.toml").exists());

    // "Restart": the in-memory tally is gone, so the count starts over.
    let config = test_config(&tmp, 2);
    let channel = ScriptedChannel::new(&[(9, "/status")]);
    bot::run(config, channel.clone(), Box::new(FixtureTelemetry))
        .await
        .unwrap();
    assert!(channel.sent_texts()[0].contains("não está autorizado"));
}
