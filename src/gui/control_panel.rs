//! Control Panel Widget
//! Left side panel with data source, filters and export.

use crate::data::FilterDimension;
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

pub const MAX_ATTRITION_MONTHS: u32 = 24;

/// Selections that feed the aggregations.
#[derive(Debug, Default, Clone)]
pub struct UserSettings {
    pub csv_path: Option<PathBuf>,
    pub dimension: FilterDimension,
    pub department: Option<String>,
    pub attrition_months: u32,
}

/// Left side control panel.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub departments: Vec<String>,
    pub progress: f32,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings {
                attrition_months: 1,
                ..Default::default()
            },
            departments: Vec::new(),
            progress: 0.0,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new(dimension: FilterDimension, attrition_months: u32) -> Self {
        let mut panel = Self::default();
        panel.settings.dimension = dimension;
        panel.settings.attrition_months = attrition_months.clamp(1, MAX_ATTRITION_MONTHS);
        panel
    }

    /// Replace the department list after a load; keeps the selection when it still exists.
    pub fn update_departments(&mut self, departments: Vec<String>) {
        let keep = self
            .settings
            .department
            .as_ref()
            .is_some_and(|d| departments.contains(d));
        if !keep {
            self.settings.department = departments.first().cloned();
        }
        self.departments = departments;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("👥 HR Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.csv_path.is_some() {
                            ui.visuals().text_color()
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters =====
        ui.label(RichText::new("🔧 Filters").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 110.0;
        let combo_width = 150.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Filter by:"));
            ComboBox::from_id_salt("filter_dimension")
                .width(combo_width)
                .selected_text(self.settings.dimension.label())
                .show_ui(ui, |ui| {
                    for dimension in FilterDimension::ALL {
                        if ui
                            .selectable_label(self.settings.dimension == dimension, dimension.label())
                            .clicked()
                            && self.settings.dimension != dimension
                        {
                            self.settings.dimension = dimension;
                            action = ControlPanelAction::FilterChanged;
                        }
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Department:"));
            let selected = self.settings.department.clone().unwrap_or_default();
            ComboBox::from_id_salt("department")
                .width(combo_width)
                .selected_text(&selected)
                .show_ui(ui, |ui| {
                    for department in &self.departments {
                        if ui
                            .selectable_label(selected == *department, department)
                            .clicked()
                        {
                            self.settings.department = Some(department.clone());
                            action = ControlPanelAction::DepartmentChanged;
                        }
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Attrition window:"));
            let slider = egui::Slider::new(
                &mut self.settings.attrition_months,
                1..=MAX_ATTRITION_MONTHS,
            )
            .suffix(" mo");
            if ui.add(slider).changed() {
                action = ControlPanelAction::AttritionWindowChanged;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export Charts").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportCharts;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    FilterChanged,
    DepartmentChanged,
    AttritionWindowChanged,
    ExportCharts,
}
