//! Inbound command parsing and dispatch.

pub mod shell;

use crate::channels::ReplyFormat;
use crate::security::ShellPolicy;
use crate::telemetry::{TelemetryProvider, format};

/// The closed set of commands the bot answers. Anything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Ajuda,
    Cmd(String),
    Status,
    Processos,
    Memoria,
    Disco,
    Rede,
}

impl Command {
    /// Parse the leading `/token` of a message. Returns `None` for plain
    /// text and unknown commands. A `@botname` suffix on the token is
    /// dropped, as Telegram appends one in group chats.
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.trim_start().strip_prefix('/')?;
        let (token, args) = match rest.split_once(char::is_whitespace) {
            Some((token, args)) => (token, args),
            None => (rest, ""),
        };
        let token = token.split('@').next().unwrap_or(token);

        match token {
            "start" => Some(Command::Start),
            "ajuda" => Some(Command::Ajuda),
            "cmd" => Some(Command::Cmd(args.trim().to_string())),
            "status" => Some(Command::Status),
            "processos" => Some(Command::Processos),
            "memoria" => Some(Command::Memoria),
            "disco" => Some(Command::Disco),
            "rede" => Some(Command::Rede),
            _ => None,
        }
    }
}

/// An outgoing reply: text plus the formatting the gateway should apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub format: ReplyFormat,
}

impl Reply {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: ReplyFormat::Plain,
        }
    }

    fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: ReplyFormat::Markdown,
        }
    }
}

/// Maps parsed commands to handlers. Runs strictly after the access guard
/// has allowed the sender.
pub struct Dispatcher {
    telemetry: Box<dyn TelemetryProvider>,
    policy: ShellPolicy,
    owner_username: String,
    max_attempts: u32,
}

impl Dispatcher {
    pub fn new(
        telemetry: Box<dyn TelemetryProvider>,
        policy: ShellPolicy,
        owner_username: String,
        max_attempts: u32,
    ) -> Self {
        Self {
            telemetry,
            policy,
            owner_username,
            max_attempts,
        }
    }

    pub async fn dispatch(&self, command: Command) -> Reply {
        match command {
            Command::Start | Command::Ajuda => self.welcome(),
            Command::Cmd(line) => self.run_shell(&line).await,
            Command::Status => self.status(),
            Command::Processos => self.processes(),
            Command::Memoria => self.memory(),
            Command::Disco => self.disks(),
            Command::Rede => self.network(),
        }
    }

    fn welcome(&self) -> Reply {
        Reply::markdown(format!(
            "🤖 *Bem-vindo ao ShellClaw!*\n\n\
             Este bot permite controlar seu servidor via Telegram.\n\n\
             *Comandos disponíveis:*\n\
             /cmd - Executar comando no servidor\n\
             /status - Ver status do servidor\n\
             /processos - Listar processos\n\
             /memoria - Ver uso de memória\n\
             /disco - Ver uso do disco\n\
             /rede - Ver informações de rede\n\
             /ajuda - Mostrar esta mensagem\n\n\
             *Observações:*\n\
             - Apenas usuários autorizados podem usar o bot\n\
             - Após {} tentativas falhas, você será bloqueado\n\
             - Apenas o dono (@{}) pode desbloquear usuários",
            self.max_attempts, self.owner_username
        ))
    }

    async fn run_shell(&self, line: &str) -> Reply {
        if line.is_empty() {
            return Reply::plain("⚠️ Uso: /cmd <comando>");
        }
        if !self.policy.is_command_allowed(line) {
            return Reply::plain("🚫 Comando não permitido pela política do bot.");
        }

        match shell::execute(line).await {
            Ok(run) if run.success => {
                if run.output.trim().is_empty() {
                    Reply::plain("✅ Comando executado com sucesso (sem saída)")
                } else {
                    Reply::markdown(format!("✅ Resultado:\n```\n{}\n```", run.output))
                }
            }
            Ok(run) => {
                let detail = if run.output.trim().is_empty() {
                    run.status
                } else {
                    run.output
                };
                Reply::plain(format!("❌ Erro:\n{detail}"))
            }
            Err(e) => Reply::plain(format!("❌ Erro:\n{e}")),
        }
    }

    fn status(&self) -> Reply {
        let report = self.telemetry.host().and_then(|host| {
            let cpu = self.telemetry.cpu()?;
            let mem = self.telemetry.memory()?;
            Ok(format::status_report(&host, &cpu, &mem))
        });
        match report {
            Ok(text) => Reply::markdown(text),
            Err(e) => {
                tracing::warn!("status probe failed: {e}");
                Reply::plain("❌ Erro ao obter status do servidor")
            }
        }
    }

    fn processes(&self) -> Reply {
        match self.telemetry.processes() {
            Ok(procs) => Reply::markdown(format::process_report(&procs)),
            Err(e) => {
                tracing::warn!("process probe failed: {e}");
                Reply::plain("❌ Erro ao listar processos")
            }
        }
    }

    fn memory(&self) -> Reply {
        let report = self.telemetry.memory().and_then(|ram| {
            let swap = self.telemetry.swap()?;
            Ok(format::memory_report(&ram, &swap))
        });
        match report {
            Ok(text) => Reply::markdown(text),
            Err(e) => {
                tracing::warn!("memory probe failed: {e}");
                Reply::plain("❌ Erro ao obter informações de memória")
            }
        }
    }

    fn disks(&self) -> Reply {
        match self.telemetry.disks() {
            Ok(disks) => Reply::markdown(format::disk_report(&disks)),
            Err(e) => {
                tracing::warn!("disk probe failed: {e}");
                Reply::plain("❌ Erro ao obter informações do disco")
            }
        }
    }

    fn network(&self) -> Reply {
        match self.telemetry.network() {
            Ok(net) => Reply::markdown(format::network_report(&net)),
            Err(e) => {
                tracing::warn!("network probe failed: {e}");
                Reply::plain("❌ Erro ao obter informações de rede")
            }
        }
    }
}
