//! Error types surfaced to the user by session operations

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Preview requested with nothing in the queue
    #[error("Queue is empty")]
    EmptyQueue,

    /// Print or save requested before a preview was generated
    #[error("Please generate a preview first")]
    NoPreview,

    /// The external tool could not be started
    #[error("failed to run {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external tool ran but reported failure
    #[error("{program} failed ({}):\n{output}", describe_status(.status))]
    ToolFailed {
        program: String,
        status: Option<i32>,
        output: String,
    },

    #[error("error creating temp file: {0}")]
    TempFile(#[source] std::io::Error),

    #[error("failed to save {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An old preview file could not be deleted
    #[error("failed to remove old preview {}: {source}", .path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SessionError {
    /// Precondition errors are user mistakes rather than failures
    pub fn is_precondition(&self) -> bool {
        matches!(self, SessionError::EmptyQueue | SessionError::NoPreview)
    }
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_failure_message_includes_output() {
        let err = SessionError::ToolFailed {
            program: "ptouch-print".to_string(),
            status: Some(1),
            output: "No P-Touch printer found on USB".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "ptouch-print failed (exit status 1):\nNo P-Touch printer found on USB"
        );
    }

    #[test]
    fn test_precondition_classification() {
        assert!(SessionError::EmptyQueue.is_precondition());
        assert!(SessionError::NoPreview.is_precondition());
        assert!(!SessionError::TempFile(std::io::Error::other("disk full")).is_precondition());
        let cleanup = SessionError::Cleanup {
            path: PathBuf::from("/tmp/ptouch-preview-1.png"),
            source: std::io::Error::other("busy"),
        };
        assert!(!cleanup.is_precondition());
        assert_eq!(
            cleanup.to_string(),
            "failed to remove old preview /tmp/ptouch-preview-1.png: busy"
        );
    }
}
