use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use prettytable::{format, Cell, Row, Table};
use std::path::Path;
use std::time::Duration;

use crate::cli::Args;
use crate::queue::{Queue, QueueItem};

/// Create a spinner shown while the label printer tool is running
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Format duration in a human-readable way
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs >= 60 {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        format!("{}m {}s", mins, secs)
    } else if total_secs > 0 {
        format!("{}.{:03}s", total_secs, millis)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Validate command line arguments
pub fn validate_inputs(args: &Args) -> Result<()> {
    if args.query.is_some() {
        return Ok(());
    }

    if !args.needs_render() && !args.list && !args.dry_run {
        return Err(anyhow::anyhow!(
            "Nothing to do: use --output, --print, --list or --dry-run (see --help)"
        ));
    }

    if args.font_size == Some(0) {
        return Err(anyhow::anyhow!("Font size must be greater than 0"));
    }

    if args.printer_command.trim().is_empty() {
        return Err(anyhow::anyhow!("Printer command must not be empty"));
    }

    // Images are handed to the tool as-is, catch typos before it runs
    for item in &args.items {
        if let QueueItem::Image { path } = item {
            let image_path = Path::new(path);
            if !image_path.is_file() {
                return Err(anyhow::anyhow!("Image file does not exist: {}", path));
            }
        }
    }

    if let Some(output) = &args.output {
        if !has_png_extension(output) {
            warn_println(&format!(
                "Output file {} does not end in .png, ptouch-print writes PNG data",
                output.display()
            ));
        }
    }

    Ok(())
}

/// Check whether a path ends in `.png` (any case)
pub fn has_png_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}

/// Pixel size of an image item, when the file can be read
pub fn image_dimensions(path: &Path) -> Option<(u32, u32)> {
    image::image_dimensions(path).ok()
}

/// Build the queue listing table
pub fn queue_table(queue: &Queue) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);

    table.add_row(Row::new(vec![
        Cell::new("#"),
        Cell::new("Kind"),
        Cell::new("Content"),
        Cell::new("Details"),
    ]));

    for (index, item) in queue.iter().enumerate() {
        let details = match item {
            QueueItem::Text { lines } => format!("{} line(s)", lines.len()),
            QueueItem::Image { path } => match image_dimensions(Path::new(path)) {
                Some((width, height)) => format!("{}x{} px", width, height),
                None => "unreadable".to_string(),
            },
            QueueItem::Pad { .. } | QueueItem::Cutmark => String::new(),
        };

        table.add_row(Row::new(vec![
            Cell::new(&(index + 1).to_string()),
            Cell::new(item.kind()),
            Cell::new(&item.describe()),
            Cell::new(&details),
        ]));
    }

    table
}

/// Print verbose information if verbose mode is enabled
pub fn verbose_println(verbose: bool, message: &str) {
    if verbose {
        println!("{} {}", style("[VERBOSE]").dim(), message);
    }
}

/// Print success message
pub fn success_println(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print warning message
pub fn warn_println(message: &str) {
    println!("{} {}", style("[WARNING]").yellow().bold(), message);
}

/// Print error message
pub fn error_println(message: &str) {
    eprintln!("{} {}", style("[ERROR]").red().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(1)), "1.000s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
    }

    #[test]
    fn test_has_png_extension() {
        assert!(has_png_extension(Path::new("label.png")));
        assert!(has_png_extension(Path::new("/tmp/LABEL.PNG")));
        assert!(!has_png_extension(Path::new("label.jpg")));
        assert!(!has_png_extension(Path::new("label")));
    }

    #[test]
    fn test_validate_requires_an_action() {
        let args = Args::try_parse_from(["ptouch-composer", "-q", "cutmark"]).unwrap();
        assert!(validate_inputs(&args).is_err());

        let args =
            Args::try_parse_from(["ptouch-composer", "-q", "cutmark", "--dry-run"]).unwrap();
        assert!(validate_inputs(&args).is_ok());

        let args = Args::try_parse_from(["ptouch-composer", "--query", "version"]).unwrap();
        assert!(validate_inputs(&args).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let args = Args::try_parse_from([
            "ptouch-composer",
            "-s",
            "0",
            "-q",
            "cutmark",
            "--print",
        ])
        .unwrap();
        assert!(validate_inputs(&args).is_err());

        let args = Args::try_parse_from([
            "ptouch-composer",
            "-q",
            "image:/definitely/not/here.png",
            "--print",
        ])
        .unwrap();
        let err = validate_inputs(&args).unwrap_err();
        assert!(err.to_string().contains("Image file does not exist"));
    }

    #[test]
    fn test_queue_table() {
        let dir = tempfile::tempdir().unwrap();
        let logo = dir.path().join("logo.png");
        image::GrayImage::new(16, 8).save(&logo).unwrap();

        let queue: Queue = vec![
            QueueItem::text(["Hello", "World"]).unwrap(),
            QueueItem::image(logo.display().to_string()),
            QueueItem::pad(5),
            QueueItem::Cutmark,
        ]
        .into_iter()
        .collect();

        let table = queue_table(&queue);
        assert_eq!(table.len(), 5);

        let rendered = table.to_string();
        assert!(rendered.contains("Text: Hello | World"));
        assert!(rendered.contains("2 line(s)"));
        assert!(rendered.contains("16x8 px"));
        assert!(rendered.contains("Padding: 5px"));
    }
}
