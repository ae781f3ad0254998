use crate::domain::{Clipboard, NotificationLevel, Notifier};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

// Notifications go to stderr so command output on stdout stays clean.
#[derive(Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        tracing::debug!(?level, %message, "notification");
        let tag = match level {
            NotificationLevel::Success => "ok",
            NotificationLevel::Info => "info",
            NotificationLevel::Warning => "warn",
            NotificationLevel::Error => "error",
        };
        eprintln!("[{tag}] {message}");
    }
}

// Clipboard that pipes text into an external program (pbcopy, clip, xclip, ...).
#[derive(Clone, Debug)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Splits a configured command line such as `"xclip -selection clipboard"`.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("pbcopy", Vec::new())
        } else if cfg!(target_os = "windows") {
            Self::new("clip", Vec::new())
        } else {
            Self::new("xclip", vec!["-selection".into(), "clipboard".into()])
        }
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn write_text(&self, text: &str) -> Result<(), String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| format!("failed to start {}: {e}", self.program))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| format!("failed to write to {}: {e}", self.program))?;
            // Dropping stdin closes the pipe so the program can finish.
        }

        let status = child
            .wait()
            .await
            .map_err(|e| format!("failed to wait for {}: {e}", self.program))?;
        if status.success() {
            Ok(())
        } else {
            Err(format!("{} exited with {status}", self.program))
        }
    }
}
