//! JSON output for scripting
//!
//! When the --json flag is enabled, every result is emitted as one JSON
//! object per line on stdout and the styled console output is suppressed.

use crate::queue::QueueItem;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonMessage {
    /// Queue contents after merging label file and command line
    Queue { items: Vec<QueueItem> },
    /// Command line handed to the tool
    Command { command: String },
    /// Preview rendered
    Preview { path: String, duration_ms: u128 },
    /// Preview copied to its destination
    Saved { path: String, bytes: u64 },
    /// Print job finished
    Printed { output: String },
    /// Informational query output, verbatim
    Info { query: String, output: String },
    /// Any failure
    Error { message: String },
}

impl JsonMessage {
    /// Emit JSON message to stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn queue(items: &[QueueItem]) {
        Self::Queue {
            items: items.to_vec(),
        }
        .emit();
    }

    pub fn command(command: impl Into<String>) {
        Self::Command {
            command: command.into(),
        }
        .emit();
    }

    pub fn preview(path: &Path, duration_ms: u128) {
        Self::Preview {
            path: path.display().to_string(),
            duration_ms,
        }
        .emit();
    }

    pub fn saved(path: &Path, bytes: u64) {
        Self::Saved {
            path: path.display().to_string(),
            bytes,
        }
        .emit();
    }

    pub fn printed(output: impl Into<String>) {
        Self::Printed {
            output: output.into(),
        }
        .emit();
    }

    pub fn info(query: impl Into<String>, output: impl Into<String>) {
        Self::Info {
            query: query.into(),
            output: output.into(),
        }
        .emit();
    }

    pub fn error(message: impl Into<String>) {
        Self::Error {
            message: message.into(),
        }
        .emit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_shape() {
        let json = serde_json::to_value(JsonMessage::Saved {
            path: "label.png".to_string(),
            bytes: 42,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "saved", "path": "label.png", "bytes": 42})
        );
    }

    #[test]
    fn test_queue_message_embeds_items() {
        let json = serde_json::to_string(&JsonMessage::Queue {
            items: vec![QueueItem::text(["A"]).unwrap(), QueueItem::Cutmark],
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"type":"queue","items":[{"type":"text","lines":["A"]},{"type":"cutmark"}]}"#
        );
    }
}
