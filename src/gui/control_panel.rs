//! Control Panel Widget
//! Left side panel with the upload button, the two day offsets and the downloads.

use egui::{Color32, RichText};
use std::path::PathBuf;

/// Default offset for the "old" table.
pub const DEFAULT_OLD_DAYS_AGO: u32 = 14;
/// Default offset for the "latest" table.
pub const DEFAULT_LATEST_DAYS_AGO: u32 = 0;

/// User settings for one report run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserSettings {
    pub xlsx_path: Option<PathBuf>,
    pub old_days_ago: u32,
    pub latest_days_ago: u32,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            xlsx_path: None,
            old_days_ago: DEFAULT_OLD_DAYS_AGO,
            latest_days_ago: DEFAULT_LATEST_DAYS_AGO,
        }
    }
}

/// Which result table a download refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Latest,
    Old,
}

impl ReportKind {
    pub fn file_name(self) -> &'static str {
        match self {
            ReportKind::Latest => "delivered_latest.xlsx",
            ReportKind::Old => "delivered_old.xlsx",
        }
    }

    pub fn button_label(self) -> &'static str {
        match self {
            ReportKind::Latest => "Download Latest Delivered (Excel)",
            ReportKind::Old => "Download Old Delivered (Excel)",
        }
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub status: String,
    pub downloads_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            status: "Ready".to_string(),
            downloads_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📦 Delivered Orders")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Comparison")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Upload Section =====
        ui.label(RichText::new("📁 Order Sheet").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .xlsx_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.xlsx_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Upload Excel").clicked() {
                            action = ControlPanelAction::BrowseXlsx;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Offsets Section =====
        ui.label(RichText::new("📅 Dates").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 200.0;

        ui.horizontal(|ui| {
            ui.add_sized(
                [label_width, 20.0],
                egui::Label::new("Old date (number of days ago)"),
            );
            let response = ui.add(
                egui::DragValue::new(&mut self.settings.old_days_ago)
                    .speed(1.0)
                    .range(0..=u32::MAX),
            );
            if response.changed() {
                action = ControlPanelAction::OffsetsChanged;
            }
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized(
                [label_width, 20.0],
                egui::Label::new("Latest date (number of days ago)"),
            );
            let response = ui.add(
                egui::DragValue::new(&mut self.settings.latest_days_ago)
                    .speed(1.0)
                    .range(0..=u32::MAX),
            );
            if response.changed() {
                action = ControlPanelAction::OffsetsChanged;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Download Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.downloads_enabled, |ui| {
                for kind in [ReportKind::Latest, ReportKind::Old] {
                    let button = egui::Button::new(RichText::new(kind.button_label()).size(14.0))
                        .min_size(egui::vec2(260.0, 30.0));
                    if ui.add(button).clicked() {
                        action = ControlPanelAction::Download(kind);
                    }
                    ui.add_space(8.0);
                }
            });
        });

        ui.add_space(7.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Saved") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseXlsx,
    OffsetsChanged,
    Download(ReportKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_upload_form() {
        let settings = UserSettings::default();
        assert_eq!(settings.old_days_ago, 14);
        assert_eq!(settings.latest_days_ago, 0);
        assert!(settings.xlsx_path.is_none());
    }

    #[test]
    fn downloads_have_distinct_names() {
        assert_eq!(ReportKind::Latest.file_name(), "delivered_latest.xlsx");
        assert_eq!(ReportKind::Old.file_name(), "delivered_old.xlsx");
        assert_ne!(
            ReportKind::Latest.button_label(),
            ReportKind::Old.button_label()
        );
    }

    #[test]
    fn panel_starts_without_downloads() {
        let panel = ControlPanel::new();
        assert!(!panel.downloads_enabled);
        assert_eq!(panel.status, "Ready");
    }
}
