use crate::process::error::{ProcessError, ProcessResult};
use crate::system::proc::Credentials;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
#[cfg(test)]
use std::sync::Mutex;
use std::time::Duration;
use tokio::process::Command as TokioCommand;
use tokio::time;
use tracing::debug;

/// A command line to run, optionally under another uid/gid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub credentials: Option<Credentials>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            credentials: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn run_as(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Abstraction for command execution to enable testing without real commands
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, spec: &CommandSpec) -> ProcessResult<String>;
    async fn execute_with_timeout(
        &self,
        spec: &CommandSpec,
        timeout_duration: Duration,
    ) -> ProcessResult<String>;
}

/// Real command executor using tokio::process::Command
#[derive(Debug, Clone, Copy, Default)]
pub struct RealCommandExecutor;

#[async_trait]
impl CommandExecutor for RealCommandExecutor {
    async fn execute(&self, spec: &CommandSpec) -> ProcessResult<String> {
        let mut command = TokioCommand::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(credentials) = spec.credentials {
            command.uid(credentials.uid).gid(credentials.gid);
        }

        debug!(command = %spec, credentials = ?spec.credentials, "spawning command");
        let output = command
            .output()
            .await
            .map_err(|e| ProcessError::io(&spec.to_string(), e))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(ProcessError::command_failed(
                &spec.to_string(),
                &output.status.to_string(),
                &String::from_utf8_lossy(&output.stderr),
            ))
        }
    }

    async fn execute_with_timeout(
        &self,
        spec: &CommandSpec,
        timeout_duration: Duration,
    ) -> ProcessResult<String> {
        match time::timeout(timeout_duration, self.execute(spec)).await {
            Ok(output) => output,
            Err(_) => Err(ProcessError::timeout(&spec.to_string(), timeout_duration)),
        }
    }
}

/// Executor that records what it was asked to run and answers with a canned result
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingCommandExecutor {
    executed: Mutex<Vec<CommandSpec>>,
    stdout: String,
    failure: Option<String>,
}

#[cfg(test)]
impl RecordingCommandExecutor {
    pub fn succeeding(stdout: &str) -> Self {
        Self {
            stdout: stdout.to_string(),
            ..Self::default()
        }
    }

    pub fn failing(stderr: &str) -> Self {
        Self {
            failure: Some(stderr.to_string()),
            ..Self::default()
        }
    }

    /// Every spec passed to `execute`, in order
    pub fn executed(&self) -> Vec<CommandSpec> {
        self.executed
            .lock()
            .map(|specs| specs.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[async_trait]
impl CommandExecutor for RecordingCommandExecutor {
    async fn execute(&self, spec: &CommandSpec) -> ProcessResult<String> {
        if let Ok(mut specs) = self.executed.lock() {
            specs.push(spec.clone());
        }

        match &self.failure {
            Some(stderr) => Err(ProcessError::command_failed(
                &spec.to_string(),
                "exit status: 1",
                stderr,
            )),
            None => Ok(self.stdout.clone()),
        }
    }

    async fn execute_with_timeout(
        &self,
        spec: &CommandSpec,
        _timeout: Duration,
    ) -> ProcessResult<String> {
        self.execute(spec).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_display() {
        let spec = CommandSpec::new("/usr/bin/java").arg("-Xms32m").args(["-cp", "a.jar"]);
        assert_eq!(spec.to_string(), "/usr/bin/java -Xms32m -cp a.jar");
        assert_eq!(spec.credentials, None);
    }

    #[tokio::test]
    async fn test_real_execute_captures_stdout() {
        let spec = CommandSpec::new("echo").arg("hello");
        let output = RealCommandExecutor.execute(&spec).await.unwrap();
        assert_eq!(output, "hello\n");
    }

    #[tokio::test]
    async fn test_real_execute_as_self() {
        let spec = CommandSpec::new("true").run_as(Credentials::current());
        assert_eq!(RealCommandExecutor.execute(&spec).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_real_execute_reports_failure() {
        let spec = CommandSpec::new("sh").args(["-c", "echo oops >&2; exit 3"]);
        match RealCommandExecutor.execute(&spec).await {
            Err(ProcessError::CommandFailed { status, stderr, .. }) => {
                assert!(status.contains('3'), "status was {status}");
                assert_eq!(stderr, "oops");
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_real_execute_missing_program() {
        let spec = CommandSpec::new("/nonexistent/profprep-test-binary");
        let err = RealCommandExecutor.execute(&spec).await.unwrap_err();
        assert!(matches!(err, ProcessError::Io { .. }));
    }

    #[tokio::test]
    async fn test_real_execute_times_out() {
        let spec = CommandSpec::new("sleep").arg("5");
        let err = RealCommandExecutor
            .execute_with_timeout(&spec, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_recording_executor() {
        let executor = RecordingCommandExecutor::succeeding("attached\n");
        let spec = CommandSpec::new("java").arg("-version");

        let output = executor
            .execute_with_timeout(&spec, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(output, "attached\n");
        assert_eq!(executor.executed(), vec![spec.clone()]);

        let failing = RecordingCommandExecutor::failing("no such jvm");
        let err = failing.execute(&spec).await.unwrap_err();
        assert!(matches!(err, ProcessError::CommandFailed { .. }));
        assert_eq!(failing.executed().len(), 1);
    }
}
