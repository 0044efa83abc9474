//! Translation of a print queue into `ptouch-print` arguments
//!
//! The tool consumes flags in the order it receives them, so the order
//! produced here is part of the contract: font flags, then the output flag,
//! then one group per queue item in queue order.

use crate::queue::{Queue, QueueItem};
use std::path::Path;
use strum_macros::{Display, EnumIter};

/// Default name of the external label printer tool
pub const DEFAULT_PRINTER_COMMAND: &str = "ptouch-print";

/// Font settings applied to every text item of a job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrintJobConfig {
    pub font_name: Option<String>,
    pub font_size: Option<u32>,
}

impl PrintJobConfig {
    pub fn new(font_name: Option<String>, font_size: Option<u32>) -> Self {
        Self {
            font_name,
            font_size,
        }
    }

    /// Forget any font selection
    pub fn clear(&mut self) {
        self.font_name = None;
        self.font_size = None;
    }
}

/// Build the argument vector that renders `queue` into `output` as a PNG
pub fn build_render_args(job: &PrintJobConfig, output: &Path, queue: &Queue) -> Vec<String> {
    let mut args = Vec::new();

    if let Some(font) = job.font_name.as_deref().filter(|name| !name.is_empty()) {
        args.push("--font".to_string());
        args.push(font.to_string());
    }
    if let Some(size) = job.font_size {
        args.push("--fontsize".to_string());
        args.push(size.to_string());
    }

    args.push("--writepng".to_string());
    args.push(output.display().to_string());

    for item in queue {
        push_item_args(&mut args, item);
    }

    args
}

fn push_item_args(args: &mut Vec<String>, item: &QueueItem) {
    match item {
        QueueItem::Text { lines } => {
            args.push("--text".to_string());
            args.extend(lines.iter().cloned());
        }
        QueueItem::Image { path } => {
            args.push("--image".to_string());
            args.push(path.clone());
        }
        QueueItem::Pad { pixels } => {
            args.push("--pad".to_string());
            args.push(pixels.to_string());
        }
        QueueItem::Cutmark => args.push("--cutmark".to_string()),
    }
}

/// Arguments that send an already rendered PNG straight to the printer
pub fn build_print_args(preview: &Path) -> Vec<String> {
    vec!["--image".to_string(), preview.display().to_string()]
}

/// Informational invocations whose output is shown verbatim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum InfoQuery {
    #[strum(to_string = "Version Information")]
    Version,
    #[strum(to_string = "Printer Information")]
    Info,
    #[strum(to_string = "Supported Printers")]
    ListSupported,
}

impl InfoQuery {
    pub fn flag(self) -> &'static str {
        match self {
            InfoQuery::Version => "--version",
            InfoQuery::Info => "--info",
            InfoQuery::ListSupported => "--list-supported",
        }
    }

    /// Label for the button that triggers this query
    pub fn button_label(self) -> &'static str {
        match self {
            InfoQuery::Version => "Show Version",
            InfoQuery::Info => "Show Info",
            InfoQuery::ListSupported => "List Supported",
        }
    }

    pub fn args(self) -> Vec<String> {
        vec![self.flag().to_string()]
    }
}

/// Render a command line for display, quoting arguments that contain spaces
pub fn render_command_line(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            line.push('"');
            line.push_str(&arg.replace('"', "\\\""));
            line.push('"');
        } else {
            line.push_str(arg);
        }
    }
    line
}
