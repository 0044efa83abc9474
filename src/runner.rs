//! Subprocess invocation of the external label printer tool
//!
//! Everything that talks to `ptouch-print` goes through [`ToolRunner`], so
//! the session logic can be exercised without the binary installed.

use std::io;
use std::process::Command;

/// Result of one tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when the process was terminated by a signal
    pub status: Option<i32>,
    /// Captured stdout followed by captured stderr
    pub output: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Narrow interface to the external tool: arguments in, exit status and output out
pub trait ToolRunner: Send + Sync {
    /// Name of the program, for display purposes
    fn program(&self) -> &str;

    /// Run the tool to completion. An `Err` means the process could not be started.
    fn run(&self, args: &[String]) -> io::Result<ToolOutput>;
}

/// Runs the real tool found on `PATH` (or at an explicit location)
#[derive(Debug, Clone)]
pub struct SystemRunner {
    program: String,
}

impl SystemRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new(crate::command::DEFAULT_PRINTER_COMMAND)
    }
}

impl ToolRunner for SystemRunner {
    fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, args: &[String]) -> io::Result<ToolOutput> {
        let output = Command::new(&self.program).args(args).output()?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(ToolOutput {
            status: output.status.code(),
            output: combined,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_requires_zero_exit() {
        let ok = ToolOutput {
            status: Some(0),
            output: String::new(),
        };
        let failed = ToolOutput {
            status: Some(1),
            output: "no printer found".to_string(),
        };
        let killed = ToolOutput {
            status: None,
            output: String::new(),
        };
        assert!(ok.success());
        assert!(!failed.success());
        assert!(!killed.success());
    }

    #[test]
    fn test_missing_program_fails_to_launch() {
        let runner = SystemRunner::new("ptouch-print-does-not-exist-42");
        let result = runner.run(&["--version".to_string()]);
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout_and_stderr() {
        let runner = SystemRunner::new("sh");
        let args = vec![
            "-c".to_string(),
            "echo out; echo err 1>&2; exit 3".to_string(),
        ];
        let result = runner.run(&args).unwrap();
        assert_eq!(result.status, Some(3));
        assert_eq!(result.output, "out\nerr\n");
    }

    #[test]
    fn test_default_program() {
        assert_eq!(SystemRunner::default().program(), "ptouch-print");
    }
}
