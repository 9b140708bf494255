//! System interface abstractions for testing and development

pub mod commands;
pub mod proc;

// Re-export commonly used traits
pub use commands::{CommandExecutor, CommandSpec, RealCommandExecutor};
pub use proc::{Credentials, Pid, ProcReader, RealProcReader};
