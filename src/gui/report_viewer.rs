//! Report Viewer Widget
//! Central panel showing the latest and old delivered tables, or the empty
//! state / error message.

use crate::data::{text_column, DeliveredTable, DeliveryReport};
use crate::gui::control_panel::ReportKind;
use egui::{Color32, RichText, ScrollArea};
use polars::prelude::PolarsError;

const TABLE_SPACING: f32 = 20.0;

/// Table cells pre-extracted once per run instead of every frame.
struct RenderedTable {
    label: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RenderedTable {
    fn from_table(table: &DeliveredTable) -> Result<Self, PolarsError> {
        let headers: Vec<String> = table
            .table
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let columns = headers
            .iter()
            .map(|name| text_column(&table.table, name))
            .collect::<Result<Vec<_>, _>>()?;

        let rows = (0..table.row_count())
            .map(|i| columns.iter().map(|col| col[i].clone()).collect())
            .collect();

        Ok(Self {
            label: table.label(),
            headers,
            rows,
        })
    }
}

enum ReportState {
    /// Nothing uploaded yet
    Empty,
    Ready {
        report: DeliveryReport,
        rendered: Vec<RenderedTable>,
    },
    Failed(String),
}

/// Central area with the two result tables.
pub struct ReportViewer {
    state: ReportState,
}

impl Default for ReportViewer {
    fn default() -> Self {
        Self {
            state: ReportState::Empty,
        }
    }
}

impl ReportViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the "please upload" state
    pub fn clear(&mut self) {
        self.state = ReportState::Empty;
    }

    /// Show a new report, latest table first.
    pub fn set_report(&mut self, report: DeliveryReport) -> Result<(), PolarsError> {
        let rendered = vec![
            RenderedTable::from_table(&report.latest)?,
            RenderedTable::from_table(&report.old)?,
        ];
        self.state = ReportState::Ready { report, rendered };
        Ok(())
    }

    /// Replace any shown tables with an error message.
    pub fn set_error(&mut self, message: String) {
        self.state = ReportState::Failed(message);
    }

    pub fn table(&self, kind: ReportKind) -> Option<&DeliveredTable> {
        match &self.state {
            ReportState::Ready { report, .. } => Some(match kind {
                ReportKind::Latest => &report.latest,
                ReportKind::Old => &report.old,
            }),
            _ => None,
        }
    }

    pub fn has_report(&self) -> bool {
        matches!(self.state, ReportState::Ready { .. })
    }

    /// Draw the viewer
    pub fn show(&self, ui: &mut egui::Ui) {
        ui.heading("Delivered Orders Comparison");
        ui.add_space(10.0);

        match &self.state {
            ReportState::Empty => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new("Please upload an Excel file to get started.")
                            .size(18.0)
                            .color(Color32::from_rgb(100, 149, 237)),
                    );
                });
            }
            ReportState::Failed(message) => {
                egui::Frame::none()
                    .rounding(5.0)
                    .stroke(egui::Stroke::new(1.0, Color32::from_rgb(220, 53, 69)))
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.label(
                            RichText::new(format!("Error: {}", message))
                                .color(Color32::from_rgb(220, 53, 69)),
                        );
                    });
            }
            ReportState::Ready { rendered, .. } => {
                ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for (idx, table) in rendered.iter().enumerate() {
                            Self::draw_table(ui, idx, table);
                            ui.add_space(TABLE_SPACING);
                        }
                    });
            }
        }
    }

    fn draw_table(ui: &mut egui::Ui, idx: usize, table: &RenderedTable) {
        ui.label(RichText::new(&table.label).size(18.0).strong());
        ui.label(
            RichText::new(format!("{} orders", table.rows.len()))
                .size(11.0)
                .color(Color32::GRAY),
        );
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(("delivered_table", idx))
                    .striped(true)
                    .num_columns(table.headers.len() + 1)
                    .min_col_width(60.0)
                    .show(ui, |ui| {
                        ui.label("");
                        for header in &table.headers {
                            ui.label(RichText::new(header).strong());
                        }
                        ui.end_row();

                        for (row_idx, row) in table.rows.iter().enumerate() {
                            ui.label(RichText::new(row_idx.to_string()).color(Color32::GRAY));
                            for cell in row {
                                ui.label(cell);
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::OrderFilter;
    use chrono::NaiveDate;
    use polars::prelude::*;

    fn sample_report() -> DeliveryReport {
        let df = df!(
            "phone_number" => ["201112223334", "01000000003"],
            "customer_name" => ["Ahmed Ali", "Laila Three"],
            "delivery_status_date" => ["2024-05-01 10:00", "2024-04-17"]
        )
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        OrderFilter::filter_orders(&df, 14, 0, today).unwrap()
    }

    #[test]
    fn starts_empty() {
        let viewer = ReportViewer::new();
        assert!(!viewer.has_report());
        assert!(viewer.table(ReportKind::Latest).is_none());
    }

    #[test]
    fn rendered_tables_follow_report() {
        let mut viewer = ReportViewer::new();
        viewer.set_report(sample_report()).unwrap();

        let ReportState::Ready { rendered, .. } = &viewer.state else {
            panic!("report not ready");
        };
        assert_eq!(rendered[0].label, "Delivered on 2024-05-01");
        assert_eq!(rendered[0].headers, vec!["order_code", "customer_name"]);
        assert_eq!(rendered[0].rows, vec![vec!["201112223334", "Ahmed"]]);
        assert_eq!(rendered[1].label, "Delivered on 2024-04-17");
        assert_eq!(rendered[1].rows, vec![vec!["2001000000003", "Laila"]]);

        let old = viewer.table(ReportKind::Old).unwrap();
        assert_eq!(old.row_count(), 1);
    }

    #[test]
    fn error_replaces_report() {
        let mut viewer = ReportViewer::new();
        viewer.set_report(sample_report()).unwrap();
        viewer.set_error("Missing required column 'phone_number'".to_string());

        assert!(!viewer.has_report());
        assert!(viewer.table(ReportKind::Old).is_none());

        viewer.clear();
        assert!(matches!(viewer.state, ReportState::Empty));
    }
}
