//! Delivered Orders - compare the orders delivered on two past dates
//!
//! Upload an order sheet, pick two "days ago" offsets and download the
//! matching orders as Excel files.

mod data;
mod gui;

use eframe::egui;
use gui::DeliveredOrdersApp;

fn main() -> eframe::Result<()> {
    init_logging();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 750.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("Delivered Orders App"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Delivered Orders App",
        options,
        Box::new(|cc| Ok(Box::new(DeliveredOrdersApp::new(cc)))),
    )
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
