use crate::process::prepare::DEFAULT_AGENT_OPTIONS;
use crate::process::{AttachConfig, RunAs};
use crate::system::Pid;
use crate::workload::SpinConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "profprep")]
#[command(version, about = "Prepare running processes for profiling")]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show which runtime a process uses
    Detect {
        #[arg(allow_negative_numbers = true)]
        pid: Pid,
    },
    /// Run the runtime-specific preparation for a process
    Prepare(PrepareArgs),
    /// Print a line every interval until interrupted
    Spin(SpinArgs),
}

#[derive(Debug, Args)]
pub struct PrepareArgs {
    #[arg(allow_negative_numbers = true)]
    pub pid: Pid,

    /// Path to the perf map agent jar
    #[arg(long, env = "PROFPREP_AGENT_JAR")]
    pub agent_jar: Option<PathBuf>,

    /// JDK home providing lib/tools.jar; inferred from the target's java binary if unset
    #[arg(long, env = "JAVA_HOME")]
    pub java_home: Option<PathBuf>,

    /// Options passed to the agent
    #[arg(long, env = "PROFPREP_AGENT_OPTIONS", default_value = DEFAULT_AGENT_OPTIONS)]
    pub agent_options: String,

    /// Give up on the attach after this many seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Run the attach as the current user instead of the target's owner
    #[arg(long)]
    pub as_self: bool,

    /// Print the command instead of running it
    #[arg(long)]
    pub dry_run: bool,
}

impl PrepareArgs {
    pub fn attach_config(&self) -> AttachConfig {
        AttachConfig {
            agent_jar: self.agent_jar.clone(),
            java_home: self.java_home.clone(),
            agent_options: self.agent_options.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            run_as: if self.as_self {
                RunAs::Current
            } else {
                RunAs::Target
            },
        }
    }
}

#[derive(Debug, Args)]
pub struct SpinArgs {
    /// Milliseconds between lines
    #[arg(long, default_value_t = 4000, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: u64,

    /// Exit after this many lines instead of waiting for a signal
    #[arg(long)]
    pub iterations: Option<u64>,
}

impl SpinArgs {
    pub fn spin_config(&self) -> SpinConfig {
        SpinConfig {
            interval: Duration::from_millis(self.interval_ms),
            max_iterations: self.iterations,
            ..SpinConfig::default()
        }
    }
}
