//! Process detection and preparation for profiling

pub mod detect;
pub mod error;
pub mod prepare;
pub mod types;


// Re-export commonly used items
pub use detect::ProcessDetector;
pub use prepare::{AttachConfig, Preparer, RunAs};
pub use types::{Preparation, Process, Runtime};
