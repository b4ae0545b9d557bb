//! Subprocess invocation with a bounded timeout.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use super::error::ProviderError;

/// Default invocation timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// An external provider program and how to invoke it.
///
/// Each invocation spawns a fresh process, waits for it to exit within
/// the timeout, and returns its stdout. A process still running at the
/// timeout is killed and abandoned.
#[derive(Debug, Clone)]
pub struct ProviderCommand {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ProviderCommand {
    /// Create a command for the given program with the default timeout.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Append a fixed argument (e.g. a script path).
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set the invocation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the program with any extra arguments appended, returning its
    /// stdout as text.
    pub async fn invoke(&self, extra_args: &[&str]) -> Result<String, ProviderError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .args(extra_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(ProviderError::Unavailable {
                    message: e.to_string(),
                });
            }
            // Dropping the future kills the child (kill_on_drop).
            Err(_) => {
                return Err(ProviderError::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProviderError::Unavailable {
                message: format!("{} ({})", output.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder() {
        let cmd = ProviderCommand::new("python3")
            .with_arg("py/real_time.py")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(cmd.timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn captures_stdout() {
        let cmd = ProviderCommand::new("sh")
            .with_arg("-c")
            .with_arg("printf 'hello'");
        let out = cmd.invoke(&[]).await.unwrap();
        assert_eq!(out, "hello");
    }

    #[tokio::test]
    async fn passes_extra_args() {
        let cmd = ProviderCommand::new("sh")
            .with_arg("-c")
            .with_arg("printf '%s' \"$1\"")
            .with_arg("sh");
        let out = cmd.invoke(&["express-train-12345"]).await.unwrap();
        assert_eq!(out, "express-train-12345");
    }

    #[tokio::test]
    async fn missing_program_is_unavailable() {
        let cmd = ProviderCommand::new("/nonexistent/provider");
        let err = cmd.invoke(&[]).await.unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn nonzero_exit_is_unavailable() {
        let cmd = ProviderCommand::new("sh").with_arg("-c").with_arg("exit 3");
        let err = cmd.invoke(&[]).await.unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let cmd = ProviderCommand::new("sh")
            .with_arg("-c")
            .with_arg("sleep 5")
            .with_timeout(Duration::from_millis(50));
        let err = cmd.invoke(&[]).await.unwrap_err();
        assert!(matches!(err, ProviderError::Timeout { .. }));
    }
}
