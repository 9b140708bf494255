use super::error::{ProcessError, ProcessResult};
use super::types::{Preparation, Process, Runtime};
use crate::system::{CommandExecutor, CommandSpec, Credentials, ProcReader};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Entry point of the perf-map agent's one-shot attacher
pub const ATTACH_MAIN_CLASS: &str = "net.virtualvoid.perf.AttachOnce";

/// Agent options: unfold inlined frames into the perf map
pub const DEFAULT_AGENT_OPTIONS: &str = "unfoldall";

pub const DEFAULT_ATTACH_TIMEOUT: Duration = Duration::from_secs(30);

// The attacher is a short-lived JVM of its own, keep its heap small.
const MIN_HEAP: &str = "-Xms32m";
const MAX_HEAP: &str = "-Xmx128m";

/// Whose uid/gid the attach command runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunAs {
    /// Owner of the target process; the JVM only accepts attaches from it
    Target,
    /// Whoever runs profprep
    Current,
}

/// Settings for attaching the perf-map agent to a JVM
#[derive(Debug, Clone)]
pub struct AttachConfig {
    pub agent_jar: Option<PathBuf>,
    pub java_home: Option<PathBuf>,
    pub agent_options: String,
    pub timeout: Duration,
    pub run_as: RunAs,
}

impl Default for AttachConfig {
    fn default() -> Self {
        Self {
            agent_jar: None,
            java_home: None,
            agent_options: DEFAULT_AGENT_OPTIONS.to_string(),
            timeout: DEFAULT_ATTACH_TIMEOUT,
            run_as: RunAs::Target,
        }
    }
}

/// Runs whatever a process needs before it can be profiled
pub struct Preparer<E: CommandExecutor, R: ProcReader> {
    command_executor: E,
    proc_reader: R,
    config: AttachConfig,
}

impl<E: CommandExecutor, R: ProcReader> Preparer<E, R> {
    pub fn new(command_executor: E, proc_reader: R, config: AttachConfig) -> Self {
        Self {
            command_executor,
            proc_reader,
            config,
        }
    }

    /// The command `prepare` would run, if any
    pub fn plan(&self, process: &Process) -> ProcessResult<Option<CommandSpec>> {
        match process.runtime() {
            Runtime::NonSpecial => Ok(None),
            Runtime::Java => self.java_attach_command(process).map(Some),
        }
    }

    pub async fn prepare(&self, process: &Process) -> ProcessResult<Preparation> {
        let Some(command) = self.plan(process)? else {
            info!(pid = process.pid(), "no preparation needed");
            return Ok(Preparation::NotNeeded);
        };

        info!(pid = process.pid(), command = %command, "attaching perf map agent");
        let output = self
            .command_executor
            .execute_with_timeout(&command, self.config.timeout)
            .await?;
        info!(pid = process.pid(), "perf map agent attached");

        Ok(Preparation::Attached { command, output })
    }

    fn java_attach_command(&self, process: &Process) -> ProcessResult<CommandSpec> {
        let agent_jar = self.agent_jar()?;
        let java_home = self.java_home(process.exe())?;
        let classpath = format!(
            "{}:{}",
            agent_jar.display(),
            java_home.join("lib").join("tools.jar").display()
        );

        let credentials = match self.config.run_as {
            RunAs::Target => self.proc_reader.credentials(process.pid())?,
            RunAs::Current => Credentials::current(),
        };

        Ok(CommandSpec::new(process.exe())
            .args([MIN_HEAP, MAX_HEAP, "-cp"])
            .arg(classpath)
            .arg(ATTACH_MAIN_CLASS)
            .arg(process.pid().to_string())
            .arg(self.config.agent_options.as_str())
            .run_as(credentials))
    }

    fn agent_jar(&self) -> ProcessResult<&Path> {
        let agent_jar = self.config.agent_jar.as_deref().ok_or_else(|| {
            ProcessError::config(
                "no perf map agent jar configured (use --agent-jar or PROFPREP_AGENT_JAR)",
            )
        })?;
        if !agent_jar.is_file() {
            return Err(ProcessError::config(format!(
                "perf map agent jar {} does not exist",
                agent_jar.display()
            )));
        }
        Ok(agent_jar)
    }

    /// Configured JAVA_HOME, else the directory above the target's `bin/java`
    fn java_home(&self, java: &Path) -> ProcessResult<PathBuf> {
        if let Some(home) = &self.config.java_home {
            return Ok(home.clone());
        }
        java.parent()
            .filter(|bin| bin.file_name().is_some_and(|name| name == "bin"))
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                ProcessError::config(format!(
                    "cannot infer JAVA_HOME from {} (use --java-home or JAVA_HOME)",
                    java.display()
                ))
            })
    }
}
