//! Delivered Orders Main Application
//! Main window with control panel and report viewer.

use crate::data::{save_table, DataLoader, DeliveryReport, OrderFilter};
use crate::gui::{ControlPanel, ControlPanelAction, ReportKind, ReportViewer};
use anyhow::{Context, Result};
use chrono::Local;
use egui::SidePanel;
use std::path::Path;
use tracing::{info, warn};

/// Main application window.
pub struct DeliveredOrdersApp {
    loader: DataLoader,
    control_panel: ControlPanel,
    report_viewer: ReportViewer,
}

impl DeliveredOrdersApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            loader: DataLoader::new(),
            control_panel: ControlPanel::new(),
            report_viewer: ReportViewer::new(),
        }
    }

    /// Handle Excel file selection.
    fn handle_browse_xlsx(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Excel Files", &["xlsx"])
            .pick_file()
        else {
            return;
        };

        self.report_viewer.clear();
        self.control_panel.settings.xlsx_path = Some(path.clone());

        match self.load(&path) {
            Ok(()) => self.run_report(),
            Err(e) => self.fail(&e),
        }
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        self.loader
            .load_xlsx(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;

        info!(
            path = %path.display(),
            rows = self.loader.get_row_count(),
            columns = ?self.loader.get_columns(),
            "loaded order sheet"
        );
        Ok(())
    }

    /// Recompute both tables from the loaded sheet and the current offsets.
    fn run_report(&mut self) {
        let Some(df) = self.loader.get_dataframe() else {
            return;
        };

        let settings = &self.control_panel.settings;
        let today = Local::now().date_naive();

        let result: Result<DeliveryReport> = OrderFilter::filter_orders(
            df,
            settings.old_days_ago,
            settings.latest_days_ago,
            today,
        )
        .context("Failed to filter orders");

        match result.and_then(|report| {
            let status = format!(
                "Latest {}: {} orders, old {}: {} orders",
                report.latest.date,
                report.latest.row_count(),
                report.old.date,
                report.old.row_count()
            );
            self.report_viewer
                .set_report(report)
                .context("Failed to prepare tables")?;
            Ok(status)
        }) {
            Ok(status) => self.control_panel.set_status(&status),
            Err(e) => self.fail(&e),
        }
    }

    /// Handle a download button: ask where to save and write the table.
    fn handle_download(&mut self, kind: ReportKind) {
        let Some(table) = self.report_viewer.table(kind) else {
            self.control_panel.set_status("No report to download");
            return;
        };

        let Some(output_path) = rfd::FileDialog::new()
            .add_filter("Excel", &["xlsx"])
            .set_file_name(kind.file_name())
            .save_file()
        else {
            return; // User cancelled
        };

        match save_table(&table.table, &output_path)
            .with_context(|| format!("Failed to save {}", output_path.display()))
        {
            Ok(()) => {
                info!(path = %output_path.display(), rows = table.row_count(), "saved report");
                self.control_panel
                    .set_status(&format!("Saved {}", output_path.display()));
            }
            Err(e) => {
                warn!("{:#}", e);
                self.control_panel.set_status(&format!("Error: {:#}", e));
            }
        }
    }

    fn fail(&mut self, err: &anyhow::Error) {
        warn!("{:#}", err);
        let message = format!("{:#}", err);
        self.control_panel.set_status(&format!("Error: {}", message));
        self.report_viewer.set_error(message);
    }
}

impl eframe::App for DeliveredOrdersApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.control_panel.downloads_enabled = self.report_viewer.has_report();

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(320.0)
            .max_width(380.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseXlsx => self.handle_browse_xlsx(),
                        ControlPanelAction::OffsetsChanged => self.run_report(),
                        ControlPanelAction::Download(kind) => self.handle_download(kind),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Report Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.report_viewer.show(ui);
        });
    }
}
