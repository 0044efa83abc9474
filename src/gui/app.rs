use eframe::egui;
use ptouch_composer::session::PreviewOutcome;
use ptouch_composer::{InfoQuery, PreviewState, QueueItem, Session, SessionError, SystemRunner};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use strum::IntoEnumIterator;

use crate::fonts::system_font_families;
use crate::settings::GuiSettings;

#[path = "app_actions.rs"]
mod app_actions;

const TEXT_LINES: usize = 4;

pub struct LabelComposerApp {
    session: Session,
    settings: GuiSettings,

    // Item entry
    text_lines: [String; TEXT_LINES],
    pad_size: String,

    // Font settings, applied to the session when a preview is generated
    font_families: Vec<String>,
    font_name: Option<String>,
    font_size: String,

    // Preview
    preview_texture: Option<egui::TextureHandle>,

    // Settings editor
    printer_command: String,

    // Modal message
    dialog: Option<Dialog>,

    // Communication channel for the running tool invocation
    job_receiver: Option<Receiver<JobMessage>>,
}

/// Message box shown on top of the main window
pub(crate) struct Dialog {
    title: String,
    message: String,
    is_error: bool,
}

/// Result of a tool invocation that ran on the worker thread
pub(crate) enum JobMessage {
    Preview(PreviewOutcome),
    Printed(Result<String, SessionError>),
    Info(InfoQuery, Result<String, SessionError>),
}

/// Queue edit requested from the queue list, applied after the list is drawn
enum QueueAction {
    MoveUp(usize),
    MoveDown(usize),
    Remove(usize),
}

impl LabelComposerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings = GuiSettings::load();
        let runner = Arc::new(SystemRunner::new(settings.printer_command.clone()));

        Self {
            session: Session::new(runner),
            printer_command: settings.printer_command.clone(),
            settings,
            text_lines: Default::default(),
            pad_size: String::new(),
            font_families: system_font_families(),
            font_name: None,
            font_size: String::new(),
            preview_texture: None,
            dialog: None,
            job_receiver: None,
        }
    }

    fn is_busy(&self) -> bool {
        self.job_receiver.is_some()
    }

    fn render_queue_items(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Add Queue Items")
            .default_open(true)
            .show(ui, |ui| {
                for (i, line) in self.text_lines.iter_mut().enumerate() {
                    ui.add(
                        egui::TextEdit::singleline(line)
                            .hint_text(format!("Text line {}", i + 1))
                            .desired_width(f32::INFINITY),
                    );
                }
                if ui.button("Add Text to Queue").clicked() {
                    self.add_text_to_queue();
                }

                if ui.button("Add Image to Queue").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("PNG image", &["png"])
                        .pick_file()
                    {
                        self.session
                            .queue_mut()
                            .append(QueueItem::image(path.display().to_string()));
                    }
                }

                ui.horizontal(|ui| {
                    ui.label("Padding:");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.pad_size)
                            .hint_text("Padding pixels")
                            .desired_width(80.0),
                    );
                });
                if ui.button("Add Padding").clicked() {
                    self.add_pad_to_queue();
                }

                if ui.button("Add Cutmark").clicked() {
                    self.session.queue_mut().append(QueueItem::Cutmark);
                }
            });

        ui.add_space(10.0);
    }

    fn render_font_settings(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Font Settings")
            .default_open(true)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Font:");
                    egui::ComboBox::from_id_salt("font_name")
                        .selected_text(self.font_name.as_deref().unwrap_or("Select Font"))
                        .width(200.0)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut self.font_name, None, "(tool default)");
                            for family in &self.font_families {
                                ui.selectable_value(
                                    &mut self.font_name,
                                    Some(family.clone()),
                                    family,
                                );
                            }
                        });
                });

                ui.horizontal(|ui| {
                    ui.label("Font size:");
                    ui.add(egui::TextEdit::singleline(&mut self.font_size).desired_width(80.0));
                });

                if self.font_families.is_empty() {
                    ui.label("(No system fonts found, ptouch-print default will be used)");
                }
            });

        ui.add_space(10.0);
    }

    fn render_tool_settings(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Printer Tool")
            .default_open(false)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Command:");
                    ui.text_edit_singleline(&mut self.printer_command);
                });
                ui.checkbox(&mut self.settings.show_command, "Show command line");
                if ui.button("Apply").clicked() {
                    self.apply_tool_settings();
                }
            });

        ui.add_space(10.0);
    }

    fn render_command_pane(&mut self, ui: &mut egui::Ui) {
        if !self.settings.show_command {
            return;
        }

        let mut command = self.session.last_command().unwrap_or_default().to_string();
        ui.add(
            egui::TextEdit::multiline(&mut command)
                .desired_rows(5)
                .desired_width(f32::INFINITY)
                .interactive(false),
        );
        ui.add_space(10.0);
    }

    fn render_info_buttons(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            for query in InfoQuery::iter() {
                if ui.button(query.button_label()).clicked() {
                    self.start_info_query(query);
                }
            }
            if ui.button("Reset All").clicked() {
                self.reset_all();
            }
        });
    }

    fn render_queue(&mut self, ui: &mut egui::Ui) {
        ui.heading("Queue");
        ui.label("Items to print:");
        ui.separator();

        let len = self.session.queue().len();
        let mut action = None;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if len == 0 {
                    ui.weak("Queue is empty");
                }

                for (index, item) in self.session.queue().iter().enumerate() {
                    ui.horizontal(|ui| {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("🗑").on_hover_text("Delete").clicked() {
                                action = Some(QueueAction::Remove(index));
                            }
                            if ui
                                .add_enabled(index + 1 < len, egui::Button::new("⬇"))
                                .on_hover_text("Move down")
                                .clicked()
                            {
                                action = Some(QueueAction::MoveDown(index));
                            }
                            if ui
                                .add_enabled(index > 0, egui::Button::new("⬆"))
                                .on_hover_text("Move up")
                                .clicked()
                            {
                                action = Some(QueueAction::MoveUp(index));
                            }
                            ui.with_layout(egui::Layout::left_to_right(egui::Align::Center), |ui| {
                                ui.add(egui::Label::new(item.describe()).truncate());
                            });
                        });
                    });
                }
            });

        if let Some(action) = action {
            self.apply_queue_action(action);
        }
    }

    fn apply_queue_action(&mut self, action: QueueAction) {
        let queue = self.session.queue_mut();
        match action {
            QueueAction::MoveUp(index) => {
                queue.move_up(index);
            }
            QueueAction::MoveDown(index) => {
                queue.move_down(index);
            }
            QueueAction::Remove(index) => {
                if let Err(err) = queue.remove(index) {
                    self.show_error("Error", err.to_string());
                }
            }
        }
    }

    fn render_preview(&mut self, ui: &mut egui::Ui) {
        ui.heading("Preview");
        ui.separator();

        egui::ScrollArea::both()
            .max_height(200.0)
            .auto_shrink([false, true])
            .show(ui, |ui| match &self.preview_texture {
                Some(texture) => {
                    ui.add(
                        egui::Image::from_texture(egui::load::SizedTexture::from_handle(texture))
                            .max_width(ui.available_width()),
                    );
                }
                None => {
                    ui.add_space(40.0);
                    ui.weak("Generate a preview to see the rendered label");
                    ui.add_space(40.0);
                }
            });

        ui.add_space(10.0);

        let preview_ready = self.session.preview_state() == PreviewState::PreviewReady;
        ui.horizontal(|ui| {
            let button_text = if self.is_busy() {
                "Working..."
            } else {
                "Generate Preview"
            };
            if ui.button(button_text).clicked() {
                self.start_preview();
            }
            if ui.add_enabled(preview_ready, egui::Button::new("Print")).clicked() {
                self.start_print();
            }
            if ui.add_enabled(preview_ready, egui::Button::new("Save PNG")).clicked() {
                self.save_png();
            }
        });
    }

    fn render_dialog(&mut self, ctx: &egui::Context) {
        let mut close = false;

        if let Some(dialog) = &self.dialog {
            egui::Window::new(dialog.title.as_str())
                .collapsible(false)
                .resizable(true)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                        if dialog.is_error {
                            ui.colored_label(egui::Color32::RED, &dialog.message);
                        } else {
                            ui.label(egui::RichText::new(&dialog.message).monospace());
                        }
                    });
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        close = true;
                    }
                });
        }

        if close {
            self.dialog = None;
        }
    }

    pub(crate) fn show_info(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.dialog = Some(Dialog {
            title: title.into(),
            message: message.into(),
            is_error: false,
        });
    }

    pub(crate) fn show_error(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.dialog = Some(Dialog {
            title: title.into(),
            message: message.into(),
            is_error: true,
        });
    }
}

impl eframe::App for LabelComposerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for the result of a running tool invocation
        self.check_job(ctx);

        let enabled = !self.is_busy() && self.dialog.is_none();

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.add_enabled_ui(enabled, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        self.render_queue_items(ui);
                        self.render_font_settings(ui);
                        self.render_tool_settings(ui);
                        self.render_command_pane(ui);
                        self.render_info_buttons(ui);
                    });
                });
            });

        egui::TopBottomPanel::bottom("preview")
            .resizable(true)
            .min_height(150.0)
            .show(ctx, |ui| {
                ui.add_enabled_ui(enabled, |ui| {
                    self.render_preview(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| {
                self.render_queue(ui);
            });
        });

        self.render_dialog(ctx);

        // Keep polling while the tool is running
        if self.is_busy() {
            ctx.request_repaint();
        }
    }
}
