use crate::command::{InfoQuery, PrintJobConfig, DEFAULT_PRINTER_COMMAND};
use crate::queue::QueueItem;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum QueryKind {
    /// Show the ptouch-print version
    #[value(name = "version")]
    Version,
    /// Show information about the connected printer
    #[value(name = "info")]
    Info,
    /// List the printer models ptouch-print supports
    #[value(name = "list-supported")]
    ListSupported,
}

impl From<QueryKind> for InfoQuery {
    fn from(kind: QueryKind) -> Self {
        match kind {
            QueryKind::Version => InfoQuery::Version,
            QueryKind::Info => InfoQuery::Info,
            QueryKind::ListSupported => InfoQuery::ListSupported,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "ptouch-composer",
    about = "Compose, preview and print labels with ptouch-print",
    long_about = "
ptouch-composer - label queue front-end for ptouch-print

Builds a queue of label items (text blocks, PNG images, padding and cut marks),
renders it to a PNG with ptouch-print and optionally sends it to the printer.
Items are printed in the order they are given.

Item syntax (--item, repeatable):
  text:Line one|Line two     text block, one argument per line
  image:/path/to/logo.png    PNG image
  pad:10                     padding in pixels
  cutmark                    cut mark

Example Usage:
  # Render two lines of text to a PNG
  ptouch-composer -q 'text:Hello|World' -o hello.png

  # Render with a font and print it
  ptouch-composer -f DejaVuSans -s 32 -q 'text:Kitchen' -q pad:10 -q cutmark --print

  # Load a label file and add an extra cut mark at the end
  ptouch-composer -c shelf.json -q cutmark -o shelf.png

  # Show the command line that would be run
  ptouch-composer -c shelf.json --dry-run

  # Ask the printer about itself
  ptouch-composer --query info"
)]
pub struct Args {
    /// JSON label file with font settings and items
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Font name passed to ptouch-print (overrides the label file)
    #[arg(short = 'f', long = "font", value_name = "NAME")]
    pub font: Option<String>,

    /// Font size passed to ptouch-print (overrides the label file)
    #[arg(short = 's', long = "fontsize", value_name = "SIZE")]
    pub font_size: Option<u32>,

    /// Queue item, appended after the label file items (text:A|B, image:PATH, pad:N, cutmark)
    #[arg(
        short = 'q',
        long = "item",
        value_name = "SPEC",
        value_parser = parse_item_spec
    )]
    pub items: Vec<QueueItem>,

    /// Save the rendered label PNG to this file
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Send the rendered label to the printer
    #[arg(short = 'p', long = "print")]
    pub print: bool,

    /// Run an informational ptouch-print query and exit
    #[arg(long = "query", value_name = "QUERY")]
    pub query: Option<QueryKind>,

    /// Show the queue as a table
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Show the ptouch-print command line without running it
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Emit JSON lines instead of human readable output
    #[arg(long = "json")]
    pub json: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Label printer tool to invoke
    #[arg(
        long = "printer-command",
        default_value = DEFAULT_PRINTER_COMMAND,
        value_name = "CMD"
    )]
    pub printer_command: String,
}

impl Args {
    /// Font settings for the print job
    pub fn job_config(&self) -> PrintJobConfig {
        PrintJobConfig::new(self.font.clone(), self.font_size)
    }

    /// True when the tool has to render the queue
    pub fn needs_render(&self) -> bool {
        self.output.is_some() || self.print
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemSpecError {
    #[error("text item needs at least one non-empty line")]
    EmptyText,
    #[error("image item needs a path")]
    MissingImagePath,
    #[error("invalid padding '{0}', expected a number of pixels")]
    InvalidPad(String),
    #[error("unknown item '{0}', expected text:, image:, pad: or cutmark")]
    UnknownKind(String),
}

/// Parse a queue item from its command-line form
pub fn parse_item_spec(spec: &str) -> Result<QueueItem, ItemSpecError> {
    let (kind, value) = match spec.split_once(':') {
        Some((kind, value)) => (kind, Some(value)),
        None => (spec, None),
    };

    match (kind.trim().to_lowercase().as_str(), value) {
        ("text", Some(value)) => QueueItem::text(value.split('|')).ok_or(ItemSpecError::EmptyText),
        ("text", None) => Err(ItemSpecError::EmptyText),
        ("image", Some(path)) if !path.is_empty() => Ok(QueueItem::image(path)),
        ("image", _) => Err(ItemSpecError::MissingImagePath),
        ("pad", Some(value)) => parse_pixels(value)
            .map(QueueItem::pad)
            .ok_or_else(|| ItemSpecError::InvalidPad(value.to_string())),
        ("pad", None) => Err(ItemSpecError::InvalidPad(String::new())),
        ("cutmark", None) => Ok(QueueItem::Cutmark),
        _ => Err(ItemSpecError::UnknownKind(spec.to_string())),
    }
}

/// Parse a pixel count as typed by the user
pub fn parse_pixels(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_text_spec() {
        assert_eq!(
            parse_item_spec("text:Hello|World"),
            Ok(QueueItem::text(["Hello", "World"]).unwrap())
        );
        assert_eq!(
            parse_item_spec("text:|Only||"),
            Ok(QueueItem::text(["Only"]).unwrap())
        );
        assert_eq!(parse_item_spec("text:"), Err(ItemSpecError::EmptyText));
        assert_eq!(parse_item_spec("text"), Err(ItemSpecError::EmptyText));
    }

    #[test]
    fn test_parse_other_specs() {
        assert_eq!(
            parse_item_spec("image:/home/me/logo.png"),
            Ok(QueueItem::image("/home/me/logo.png"))
        );
        assert_eq!(
            parse_item_spec("image:C:/labels/logo.png"),
            Ok(QueueItem::image("C:/labels/logo.png"))
        );
        assert_eq!(parse_item_spec("pad:12"), Ok(QueueItem::pad(12)));
        assert_eq!(parse_item_spec("cutmark"), Ok(QueueItem::Cutmark));
        assert_eq!(parse_item_spec("CUTMARK"), Ok(QueueItem::Cutmark));
    }

    #[test]
    fn test_parse_invalid_specs() {
        assert_eq!(
            parse_item_spec("image:"),
            Err(ItemSpecError::MissingImagePath)
        );
        assert_eq!(
            parse_item_spec("pad:ten"),
            Err(ItemSpecError::InvalidPad("ten".to_string()))
        );
        assert_eq!(
            parse_item_spec("pad:-1"),
            Err(ItemSpecError::InvalidPad("-1".to_string()))
        );
        assert_eq!(
            parse_item_spec("barcode:123"),
            Err(ItemSpecError::UnknownKind("barcode:123".to_string()))
        );
        assert!(parse_item_spec("cutmark:now").is_err());
    }

    #[test]
    fn test_items_keep_command_line_order() {
        let args = Args::try_parse_from([
            "ptouch-composer",
            "-q",
            "pad:3",
            "--item",
            "text:A|B",
            "-q",
            "cutmark",
            "-f",
            "Arial",
            "-s",
            "12",
            "-o",
            "out.png",
        ])
        .unwrap();

        assert_eq!(
            args.items,
            vec![
                QueueItem::pad(3),
                QueueItem::text(["A", "B"]).unwrap(),
                QueueItem::Cutmark
            ]
        );
        assert_eq!(
            args.job_config(),
            PrintJobConfig::new(Some("Arial".to_string()), Some(12))
        );
        assert!(args.needs_render());
        assert_eq!(args.printer_command, "ptouch-print");
    }

    #[test]
    fn test_bad_item_is_rejected_by_parser() {
        let result = Args::try_parse_from(["ptouch-composer", "-q", "pad:wide"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_query_kind() {
        let args =
            Args::try_parse_from(["ptouch-composer", "--query", "list-supported"]).unwrap();
        assert_eq!(args.query, Some(QueryKind::ListSupported));
        assert_eq!(InfoQuery::from(QueryKind::ListSupported).flag(), "--list-supported");
    }
}
