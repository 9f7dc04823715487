//! Running external command-line tools (yt-dlp, ffmpeg).
//!
//! Both tools run as subprocesses found on PATH or at a configured location.
//!
//! Install:
//! - yt-dlp: `pip install yt-dlp`, `brew install yt-dlp`, `winget install yt-dlp`
//! - ffmpeg: `apt install ffmpeg`, `brew install ffmpeg`, `winget install ffmpeg`

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

/// Longest stderr excerpt carried in error messages.
const STDERR_TAIL_CHARS: usize = 600;

/// An external executable.
#[derive(Debug, Clone)]
pub struct Tool {
    /// Human-readable name used in errors
    pub name: &'static str,
    /// Program name on PATH or absolute path
    pub program: PathBuf,
}

/// Why a tool invocation failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    /// The executable could not be started
    #[error("could not start: {0}")]
    Missing(String),
    /// The process ran and exited unsuccessfully
    #[error("exit code {code}: {stderr}")]
    Failed { code: i32, stderr: String },
    /// The process was terminated by a signal
    #[error("terminated by signal: {stderr}")]
    Signalled { stderr: String },
    /// The process did not finish in time and was killed
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

impl Tool {
    pub fn new(name: &'static str, program: impl Into<PathBuf>) -> Self {
        Self {
            name,
            program: program.into(),
        }
    }

    /// Run the tool to completion and return its stdout.
    ///
    /// The child is killed if `timeout` elapses or the returned future is
    /// dropped.
    pub async fn run<I, S>(&self, args: I, timeout: Duration) -> Result<String, ToolError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(tool = self.name, program = ?self.program, "Running external tool");

        let child = command
            .spawn()
            .map_err(|e| ToolError::Missing(format!("{}: {}", self.program.display(), e)))?;

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => {
                result.map_err(|e| ToolError::Missing(format!("{}: {}", self.program.display(), e)))?
            }
            Err(_) => return Err(ToolError::TimedOut(timeout)),
        };

        if !output.status.success() {
            let stderr = stderr_tail(&output.stderr);
            return Err(match output.status.code() {
                Some(code) => ToolError::Failed { code, stderr },
                None => ToolError::Signalled { stderr },
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// First line of the tool's version output, if it runs.
    pub async fn version(&self, flag: &str) -> Option<String> {
        self.run([flag], Duration::from_secs(10))
            .await
            .ok()
            .and_then(|out| out.lines().next().map(|l| l.trim().to_string()))
            .filter(|l| !l.is_empty())
    }

    /// Check if the tool can be started
    pub async fn is_available(&self, flag: &str) -> bool {
        self.version(flag).await.is_some()
    }
}

/// Last part of a tool's stderr, trimmed, for error messages.
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let trimmed = text.trim();
    let count = trimmed.chars().count();
    if count <= STDERR_TAIL_CHARS {
        return trimmed.to_string();
    }
    let tail: String = trimmed.chars().skip(count - STDERR_TAIL_CHARS).collect();
    format!("...{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_tail_short_is_unchanged() {
        assert_eq!(stderr_tail(b"  boom\n"), "boom");
    }

    #[test]
    fn test_stderr_tail_long_keeps_end() {
        let long = format!("{}END", "x".repeat(2000));
        let tail = stderr_tail(long.as_bytes());
        assert!(tail.starts_with("..."));
        assert!(tail.ends_with("END"));
        assert_eq!(tail.chars().count(), STDERR_TAIL_CHARS + 3);
    }

    #[tokio::test]
    async fn test_missing_program_is_reported() {
        let tool = Tool::new("nothing", "/nonexistent/definitely-not-a-tool");
        let result = tool.run(["--version"], Duration::from_secs(5)).await;
        assert!(matches!(result, Err(ToolError::Missing(_))));
        assert!(!tool.is_available("--version").await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_exit_carries_stderr() {
        let tool = Tool::new("sh", "sh");
        let result = tool
            .run(["-c", "echo broken pipe >&2; exit 3"], Duration::from_secs(5))
            .await;
        assert_eq!(
            result,
            Err(ToolError::Failed {
                code: 3,
                stderr: "broken pipe".to_string(),
            })
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "exit code 3: broken pipe"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_signal_exit_is_reported() {
        let tool = Tool::new("sh", "sh");
        let result = tool
            .run(["-c", "echo dying >&2; kill -9 $$"], Duration::from_secs(5))
            .await;
        assert_eq!(
            result,
            Err(ToolError::Signalled {
                stderr: "dying".to_string(),
            })
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_is_returned() {
        let tool = Tool::new("sh", "sh");
        let out = tool
            .run(["-c", "echo https://example.invalid/audio"], Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(out.trim(), "https://example.invalid/audio");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_tool() {
        let tool = Tool::new("sh", "sh");
        let result = tool
            .run(["-c", "sleep 5"], Duration::from_millis(100))
            .await;
        assert!(matches!(result, Err(ToolError::TimedOut(_))));
    }
}
