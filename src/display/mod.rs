//! Display module for terminal output and formatting

pub mod report;
pub mod terminal;

// Re-export commonly used items
pub use report::{render_command, render_preparation, render_process};
pub use terminal::Terminal;
