// Library exports for reuse by the GUI and other applications
pub mod cli;
pub mod command;
pub mod config_file;
pub mod error;
pub mod json_output;
pub mod queue;
pub mod runner;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use command::{InfoQuery, PrintJobConfig, DEFAULT_PRINTER_COMMAND};
pub use error::SessionError;
pub use json_output::JsonMessage;
pub use queue::{Queue, QueueError, QueueItem, TextLines};
pub use runner::{SystemRunner, ToolOutput, ToolRunner};
pub use session::{PreviewState, Session};
