// Queue and tool actions for the GUI
// Tool invocations run on a background thread; the UI stays disabled until the result arrives

use super::{JobMessage, LabelComposerApp};
use eframe::egui;
use ptouch_composer::cli::parse_pixels;
use ptouch_composer::session::interpret_output;
use ptouch_composer::{InfoQuery, QueueItem, SystemRunner};
use std::path::Path;
use std::sync::mpsc::{channel, TryRecvError};
use std::sync::Arc;

impl LabelComposerApp {
    pub fn add_text_to_queue(&mut self) {
        if let Some(item) = QueueItem::text(self.text_lines.iter().cloned()) {
            self.session.queue_mut().append(item);
            for line in self.text_lines.iter_mut() {
                line.clear();
            }
        }
    }

    pub fn add_pad_to_queue(&mut self) {
        if self.pad_size.trim().is_empty() {
            return;
        }
        match parse_pixels(&self.pad_size) {
            Some(pixels) => self.session.queue_mut().append(QueueItem::pad(pixels)),
            None => self.show_error(
                "Error",
                format!("Invalid padding '{}': expected a number of pixels", self.pad_size),
            ),
        }
    }

    /// Copy the font selection into the session's print job
    fn apply_font_settings(&mut self) -> Result<(), String> {
        let font_size = match self.font_size.trim() {
            "" => None,
            size => match size.parse::<u32>() {
                Ok(size) if size > 0 => Some(size),
                _ => return Err(format!("Invalid font size '{}'", self.font_size)),
            },
        };

        let job = self.session.job_mut();
        job.font_name = self.font_name.clone();
        job.font_size = font_size;
        Ok(())
    }

    pub fn apply_tool_settings(&mut self) {
        let command = self.printer_command.trim().to_string();
        if command.is_empty() {
            self.show_error("Error", "Printer command must not be empty");
            return;
        }

        self.settings.printer_command = command.clone();
        self.session.set_runner(Arc::new(SystemRunner::new(command)));

        if let Err(err) = self.settings.save() {
            self.show_error("Settings", format!("{:#}", err));
        }
    }

    pub fn start_preview(&mut self) {
        if self.is_busy() {
            return;
        }
        if let Err(message) = self.apply_font_settings() {
            self.show_error("Error", message);
            return;
        }

        let pending = match self.session.begin_preview() {
            Ok(pending) => pending,
            Err(err) if err.is_precondition() => {
                self.show_info("Error", err.to_string());
                return;
            }
            Err(err) => {
                self.show_error("Preview error", err.to_string());
                return;
            }
        };

        let (tx, rx) = channel();
        self.job_receiver = Some(rx);

        let runner = self.session.runner();
        std::thread::spawn(move || {
            let outcome = pending.run(runner.as_ref());
            let _ = tx.send(JobMessage::Preview(outcome));
        });
    }

    pub fn start_print(&mut self) {
        if self.is_busy() {
            return;
        }

        let args = match self.session.print_args() {
            Ok(args) => args,
            Err(err) => {
                self.show_info("Error", err.to_string());
                return;
            }
        };

        let (tx, rx) = channel();
        self.job_receiver = Some(rx);

        let runner = self.session.runner();
        std::thread::spawn(move || {
            let result = interpret_output(runner.program(), runner.run(&args));
            let _ = tx.send(JobMessage::Printed(result));
        });
    }

    pub fn start_info_query(&mut self, query: InfoQuery) {
        if self.is_busy() {
            return;
        }

        let (tx, rx) = channel();
        self.job_receiver = Some(rx);

        let runner = self.session.runner();
        std::thread::spawn(move || {
            let result = interpret_output(runner.program(), runner.run(&query.args()));
            let _ = tx.send(JobMessage::Info(query, result));
        });
    }

    /// Check for the result of the background tool invocation
    pub fn check_job(&mut self, ctx: &egui::Context) {
        let Some(receiver) = &self.job_receiver else {
            return;
        };
        let message = match receiver.try_recv() {
            Ok(message) => message,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                self.job_receiver = None;
                self.show_error("Error", "The printer tool worker stopped unexpectedly");
                return;
            }
        };
        self.job_receiver = None;

        match message {
            JobMessage::Preview(outcome) => {
                let result = self
                    .session
                    .finish_preview(outcome)
                    .map(Path::to_path_buf);
                match result {
                    Ok(path) => {
                        self.show_cleanup_warning();
                        self.load_preview_texture(ctx, &path);
                    }
                    Err(err) => self.show_error("Preview error", err.to_string()),
                }
            }
            JobMessage::Printed(Ok(_)) => {
                self.show_info("Success", "Print job completed successfully");
            }
            JobMessage::Printed(Err(err)) => {
                self.show_error("Printing error", err.to_string());
            }
            JobMessage::Info(query, Ok(output)) => {
                self.show_info(query.to_string(), output);
            }
            JobMessage::Info(_, Err(err)) => {
                self.show_error("Error", err.to_string());
            }
        }
    }

    fn load_preview_texture(&mut self, ctx: &egui::Context, path: &Path) {
        match image::open(path) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
                let texture =
                    ctx.load_texture("label-preview", color_image, egui::TextureOptions::NEAREST);
                self.preview_texture = Some(texture);
            }
            Err(err) => {
                self.preview_texture = None;
                self.show_error("Preview error", format!("Failed to load preview: {}", err));
            }
        }
    }

    pub fn save_png(&mut self) {
        if self.session.preview_path().is_none() {
            self.show_info("Error", "Please generate a preview first");
            return;
        }

        let Some(destination) = rfd::FileDialog::new()
            .add_filter("PNG image", &["png"])
            .set_file_name("label.png")
            .save_file()
        else {
            return;
        };

        match self.session.save_png(&destination) {
            Ok(_) => self.show_info("Success", "File saved successfully"),
            Err(err) => self.show_error("Error", err.to_string()),
        }
    }

    pub fn reset_all(&mut self) {
        for line in self.text_lines.iter_mut() {
            line.clear();
        }
        self.pad_size.clear();
        self.font_size.clear();
        self.font_name = None;

        self.session.reset();
        self.preview_texture = None;
        self.show_cleanup_warning();
    }

    /// Report a preview file the session could not delete
    fn show_cleanup_warning(&mut self) {
        if let Some(err) = self.session.take_cleanup_error() {
            self.show_info("Warning", err.to_string());
        }
    }
}
