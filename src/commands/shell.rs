//! Host shell execution for `/cmd`.

use std::process::Stdio;

/// Outcome of one shell run. `output` is stdout followed by stderr, the
/// closest a piped child gets to a combined stream.
#[derive(Debug)]
pub struct ShellRun {
    pub success: bool,
    pub output: String,
    pub status: String,
}

/// Run `command_line` through `sh -c` and wait for it.
///
/// No timeout and no output cap: the operator asked for the command, the
/// operator gets all of it. `Err` means the shell itself could not spawn.
pub async fn execute(command_line: &str) -> std::io::Result<ShellRun> {
    let output = tokio::process::Command::new("sh")
        .arg("-c")
        .arg(command_line)
        .stdin(Stdio::null())
        .output()
        .await?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    Ok(ShellRun {
        success: output.status.success(),
        output: combined,
        status: output.status.to_string(),
    })
}
