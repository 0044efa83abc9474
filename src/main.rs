use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use ptouch_composer::cli::Args;
use ptouch_composer::command::{build_render_args, render_command_line, InfoQuery};
use ptouch_composer::utils::{
    create_spinner, error_println, format_duration, queue_table, success_println,
    validate_inputs, verbose_println,
};
use ptouch_composer::{JsonMessage, Session, SystemRunner};

/// Placeholder output shown by --dry-run when no --output is given
const DRY_RUN_OUTPUT: &str = "ptouch-preview.png";

/// Handle --query: run the informational invocation and show its output verbatim
fn handle_query(session: &Session, query: InfoQuery, args: &Args) -> Result<()> {
    verbose_println(
        args.verbose && !args.json,
        &render_command_line(&args.printer_command, &query.args()),
    );

    let output = session.query_info(query)?;

    if args.json {
        JsonMessage::info(query.flag().trim_start_matches('-'), output);
    } else {
        println!("{}", style(query.to_string()).bold().cyan());
        println!();
        print!("{}", output);
    }
    Ok(())
}

fn run(mut args: Args) -> Result<()> {
    let start_time = Instant::now();

    args.load_and_merge_config()?;
    validate_inputs(&args)?;

    let runner = Arc::new(SystemRunner::new(args.printer_command.clone()));
    let mut session = Session::new(runner);

    if let Some(kind) = args.query {
        return handle_query(&session, kind.into(), &args);
    }

    *session.job_mut() = args.job_config();
    session.queue_mut().extend(args.items.iter().cloned());

    if args.verbose && !args.json {
        println!("{}", style("Configuration:").bold());
        println!("  Printer command: {}", args.printer_command);
        println!("  Font: {}", args.font.as_deref().unwrap_or("(tool default)"));
        println!(
            "  Font size: {}",
            args.font_size
                .map(|size| size.to_string())
                .unwrap_or_else(|| "(tool default)".to_string())
        );
        println!("  Queue items: {}", session.queue().len());
        println!();
    }

    if args.list {
        if args.json {
            JsonMessage::queue(session.queue().items());
        } else if session.queue().is_empty() {
            println!("{}", style("Queue is empty").yellow());
        } else {
            queue_table(session.queue()).printstd();
            println!();
        }
    }

    if args.dry_run {
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| Path::new(DRY_RUN_OUTPUT).to_path_buf());
        let command = render_command_line(
            &args.printer_command,
            &build_render_args(session.job(), &output, session.queue()),
        );
        if args.json {
            JsonMessage::command(command);
        } else {
            println!("{}", style("Dry run, command not executed:").dim());
            println!("{}", command);
        }
        return Ok(());
    }

    if !args.needs_render() {
        return Ok(());
    }

    // Render the preview
    let render_start = Instant::now();
    let spinner = (!args.json).then(|| create_spinner("Rendering label..."));
    let rendered = session.generate_preview().map(Path::to_path_buf);
    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }
    if let Some(command) = session.last_command() {
        verbose_println(args.verbose && !args.json, command);
    }
    let preview = rendered?;
    let render_time = render_start.elapsed();

    if args.json {
        JsonMessage::preview(&preview, render_time.as_millis());
    } else {
        success_println(&format!(
            "Label rendered in {}",
            style(format_duration(render_time)).cyan()
        ));
    }

    if let Some(destination) = &args.output {
        let bytes = session
            .save_png(destination)
            .with_context(|| "Failed to save rendered label")?;
        if args.json {
            JsonMessage::saved(destination, bytes);
        } else {
            success_println(&format!(
                "Saved {} ({} bytes)",
                style(destination.display()).bold(),
                bytes
            ));
        }
    }

    if args.print {
        let spinner = (!args.json).then(|| create_spinner("Printing..."));
        let printed = session.print();
        if let Some(spinner) = &spinner {
            spinner.finish_and_clear();
        }
        let output = printed?;

        if args.json {
            JsonMessage::printed(output);
        } else {
            success_println("Print job completed successfully");
            verbose_println(args.verbose, output.trim_end());
        }
    }

    if !args.json {
        println!(
            "{} {}",
            style("Total time:").dim(),
            format_duration(start_time.elapsed())
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let json = args.json;

    if let Err(err) = run(args) {
        if json {
            JsonMessage::error(format!("{:#}", err));
        } else {
            error_println(&format!("{:#}", err));
        }
        std::process::exit(1);
    }

    Ok(())
}
