// GUI entry point for ptouch-composer
// This binary provides a graphical interface for composing and printing labels

use eframe::egui;

mod app;
mod fonts;
mod settings;
use app::LabelComposerApp;

fn main() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 800.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ptouch-print GUI",
        options,
        Box::new(|cc| Ok(Box::new(LabelComposerApp::new(cc)))),
    )
}
