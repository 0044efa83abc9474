//! Label session: queue, font settings and the rendered preview
//!
//! A session moves between two states. It starts in
//! [`PreviewState::NoPreview`] and enters [`PreviewState::PreviewReady`] after
//! a successful preview render; [`Session::reset`] brings it back. Printing
//! and saving reuse the rendered preview, so they are only available while
//! a preview is ready.
//!
//! The preview PNG lives in a temporary file owned by the session. It is
//! replaced on every successful render and deleted on reset and on drop.
//! A file that cannot be deleted does not block either operation; the
//! failure is kept for [`Session::take_cleanup_error`].

use crate::command::{
    build_print_args, build_render_args, render_command_line, InfoQuery, PrintJobConfig,
};
use crate::error::SessionError;
use crate::queue::Queue;
use crate::runner::{ToolOutput, ToolRunner};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempPath;

const PREVIEW_PREFIX: &str = "ptouch-preview-";
const PREVIEW_SUFFIX: &str = ".png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    NoPreview,
    PreviewReady,
}

pub struct Session {
    queue: Queue,
    job: PrintJobConfig,
    preview: Option<TempPath>,
    runner: Arc<dyn ToolRunner>,
    last_command: Option<String>,
    cleanup_error: Option<SessionError>,
}

impl Session {
    pub fn new(runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            queue: Queue::new(),
            job: PrintJobConfig::default(),
            preview: None,
            runner,
            last_command: None,
            cleanup_error: None,
        }
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut Queue {
        &mut self.queue
    }

    pub fn job(&self) -> &PrintJobConfig {
        &self.job
    }

    pub fn job_mut(&mut self) -> &mut PrintJobConfig {
        &mut self.job
    }

    pub fn runner(&self) -> Arc<dyn ToolRunner> {
        Arc::clone(&self.runner)
    }

    /// Use a different tool, e.g. after the printer command was changed
    pub fn set_runner(&mut self, runner: Arc<dyn ToolRunner>) {
        self.runner = runner;
    }

    pub fn preview_state(&self) -> PreviewState {
        if self.preview.is_some() {
            PreviewState::PreviewReady
        } else {
            PreviewState::NoPreview
        }
    }

    /// Location of the rendered preview, if any
    pub fn preview_path(&self) -> Option<&Path> {
        self.preview.as_deref()
    }

    /// Last command line handed to the tool, for display
    pub fn last_command(&self) -> Option<&str> {
        self.last_command.as_deref()
    }

    /// Failure to delete a replaced or reset preview file, if any, since the last call
    pub fn take_cleanup_error(&mut self) -> Option<SessionError> {
        self.cleanup_error.take()
    }

    fn discard_preview(&mut self) {
        let Some(previous) = self.preview.take() else {
            return;
        };
        let path = previous.to_path_buf();
        if let Err(source) = previous.close() {
            self.cleanup_error = Some(SessionError::Cleanup { path, source });
        }
    }

    fn record_command(&mut self, args: &[String]) {
        self.last_command = Some(render_command_line(self.runner.program(), args));
    }

    /// First half of a preview render: validate, allocate the output file
    /// and build the arguments. Nothing in the session changes yet.
    pub fn begin_preview(&mut self) -> Result<PendingPreview, SessionError> {
        if self.queue.is_empty() {
            return Err(SessionError::EmptyQueue);
        }

        let temp = tempfile::Builder::new()
            .prefix(PREVIEW_PREFIX)
            .suffix(PREVIEW_SUFFIX)
            .tempfile()
            .map_err(SessionError::TempFile)?
            .into_temp_path();

        let args = build_render_args(&self.job, &temp, &self.queue);
        self.record_command(&args);

        Ok(PendingPreview { args, temp })
    }

    /// Second half of a preview render. On success the new file becomes the
    /// preview and the previous one is deleted; on failure the previous
    /// preview stays in place and the new file is discarded.
    pub fn finish_preview(&mut self, outcome: PreviewOutcome) -> Result<&Path, SessionError> {
        let PreviewOutcome { temp, result } = outcome;
        interpret_output(self.runner.program(), result)?;

        self.discard_preview();
        let preview: &Path = self.preview.insert(temp);
        Ok(preview)
    }

    /// Render the queue into a fresh preview PNG, blocking until the tool exits
    pub fn generate_preview(&mut self) -> Result<&Path, SessionError> {
        let pending = self.begin_preview()?;
        let outcome = pending.run(self.runner.as_ref());
        self.finish_preview(outcome)
    }

    /// Arguments that print the current preview
    pub fn print_args(&mut self) -> Result<Vec<String>, SessionError> {
        let preview = self.preview.as_deref().ok_or(SessionError::NoPreview)?;
        let args = build_print_args(preview);
        self.record_command(&args);
        Ok(args)
    }

    /// Send the current preview to the printer; returns the tool output
    pub fn print(&mut self) -> Result<String, SessionError> {
        let args = self.print_args()?;
        interpret_output(self.runner.program(), self.runner.run(&args))
    }

    /// Copy the preview PNG byte for byte to `destination`.
    ///
    /// The preview file itself is rejected as a destination: copying a file
    /// onto itself truncates it.
    pub fn save_png(&self, destination: &Path) -> Result<u64, SessionError> {
        let preview = self.preview.as_deref().ok_or(SessionError::NoPreview)?;
        let save_error = |source: io::Error| SessionError::Save {
            path: destination.to_path_buf(),
            source,
        };

        if is_same_file(preview, destination) {
            return Err(save_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "destination is the preview file itself",
            )));
        }
        fs::copy(preview, destination).map_err(save_error)
    }

    /// Run an informational query and return its output verbatim
    pub fn query_info(&self, query: InfoQuery) -> Result<String, SessionError> {
        interpret_output(self.runner.program(), self.runner.run(&query.args()))
    }

    /// Clear the queue and font settings and drop the preview
    pub fn reset(&mut self) {
        self.queue.clear();
        self.job.clear();
        self.last_command = None;
        self.discard_preview();
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// A preview render that has been prepared but not run yet.
///
/// Owns the output file, so it can be handed to a worker thread.
pub struct PendingPreview {
    args: Vec<String>,
    temp: TempPath,
}

impl PendingPreview {
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn output_path(&self) -> &Path {
        &self.temp
    }

    pub fn run(self, runner: &dyn ToolRunner) -> PreviewOutcome {
        let result = runner.run(&self.args);
        PreviewOutcome {
            temp: self.temp,
            result,
        }
    }
}

/// Result of running a [`PendingPreview`], to be handed back to [`Session::finish_preview`]
pub struct PreviewOutcome {
    temp: TempPath,
    result: io::Result<ToolOutput>,
}

/// Map a tool invocation to its output, or to the error the user should see
pub fn interpret_output(
    program: &str,
    result: io::Result<ToolOutput>,
) -> Result<String, SessionError> {
    let output = result.map_err(|source| SessionError::Launch {
        program: program.to_string(),
        source,
    })?;

    if output.success() {
        Ok(output.output)
    } else {
        Err(SessionError::ToolFailed {
            program: program.to_string(),
            status: output.status,
            output: output.output,
        })
    }
}
