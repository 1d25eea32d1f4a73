//! Dashboard View Widget
//! Central tabbed area: recruitment, diversity, workforce and the employee table.

use crate::charts::ChartPlotter;
use crate::data::columns::DEPARTMENT;
use crate::data::{TablePage, TablePager};
use crate::stats::{CountCalculator, DashboardData};
use egui::{Color32, RichText, ScrollArea};
use polars::prelude::DataFrame;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Recruitment,
    Diversity,
    Workforce,
    Employees,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Recruitment, Tab::Diversity, Tab::Workforce, Tab::Employees];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Recruitment => "Recruitment",
            Tab::Diversity => "Diversity",
            Tab::Workforce => "Workforce",
            Tab::Employees => "Employees",
        }
    }
}

pub struct DashboardView {
    pub tab: Tab,
    pub data: Option<DashboardData>,
    logo: Option<egui::TextureHandle>,
    pager: TablePager,
    page_index: usize,
    page: Option<TablePage>,
    /// Employees tab shows only the department picked in the control panel.
    pub department_only: bool,
    /// Department the table rows are currently restricted to.
    table_filter: Option<String>,
    filtered: Option<DataFrame>,
}

impl DashboardView {
    pub fn new(page_size: usize) -> Self {
        Self {
            tab: Tab::default(),
            data: None,
            logo: None,
            pager: TablePager::new(page_size),
            page_index: 0,
            page: None,
            department_only: false,
            table_filter: None,
            filtered: None,
        }
    }

    pub fn clear(&mut self) {
        self.data = None;
        self.page = None;
        self.page_index = 0;
        self.table_filter = None;
        self.filtered = None;
    }

    pub fn set_logo(&mut self, logo: egui::TextureHandle) {
        self.logo = Some(logo);
    }

    pub fn set_data(&mut self, data: DashboardData) {
        self.data = Some(data);
    }

    /// Re-slice the table; call after a load or a page change.
    pub fn refresh_page(&mut self, df: &DataFrame) {
        let source = self.filtered.as_ref().unwrap_or(df);
        let page = self.pager.page(source, self.page_index);
        self.page_index = page.page;
        self.page = Some(page);
    }

    /// Re-filter the table when the checkbox or the selected department changed.
    fn sync_table_filter(&mut self, df: &DataFrame, department: Option<&str>) {
        let wanted = department
            .filter(|_| self.department_only)
            .map(str::to_string);
        if wanted == self.table_filter && self.page.is_some() {
            return;
        }
        self.filtered = match &wanted {
            Some(name) => match CountCalculator::filter_equals(df, DEPARTMENT, name) {
                Ok(frame) => Some(frame),
                Err(e) => {
                    warn!(error = %e, department = %name, "employee table filter failed");
                    None
                }
            },
            None => None,
        };
        if wanted != self.table_filter {
            self.page_index = 0;
        }
        self.table_filter = wanted;
        self.refresh_page(df);
    }

    pub fn show(&mut self, ui: &mut egui::Ui, df: Option<&DataFrame>, department: Option<&str>) {
        // Banner
        ui.vertical_centered(|ui| {
            if let Some(logo) = &self.logo {
                ui.add(egui::Image::new(egui::load::SizedTexture::from_handle(logo)).max_height(64.0));
            }
            ui.heading(RichText::new("HR Dashboard").size(26.0).strong());
            ui.label(
                RichText::new("Note: All the data represented here is mock data.")
                    .size(12.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            for tab in Tab::ALL {
                ui.selectable_value(&mut self.tab, tab, RichText::new(tab.title()).size(15.0));
            }
        });
        ui.separator();

        let Some(data) = &self.data else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        if !data.warnings.is_empty() {
            for warning in &data.warnings {
                ui.label(
                    RichText::new(format!("⚠ {}", warning))
                        .size(11.0)
                        .color(Color32::from_rgb(243, 156, 18)),
                );
            }
            ui.add_space(4.0);
        }

        match self.tab {
            Tab::Recruitment => Self::show_recruitment(ui, data),
            Tab::Diversity => Self::show_diversity(ui, data, department),
            Tab::Workforce => Self::show_workforce(ui, data),
            Tab::Employees => self.show_employees(ui, df, department),
        }
    }

    fn show_recruitment(ui: &mut egui::Ui, data: &DashboardData) {
        ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            ui.label(RichText::new("Recruitment Source").size(16.0).strong());
            ChartPlotter::draw_count_bars(
                ui,
                "recruitment_source",
                &data.sources,
                "Number of Recruitments",
            );

            ui.add_space(12.0);
            ui.label(
                RichText::new(format!("Details by {}", data.dimension.label()))
                    .size(16.0)
                    .strong(),
            );
            match &data.sources_by_dimension {
                Some(grouped) => ChartPlotter::draw_grouped_bars(
                    ui,
                    "recruitment_by_filter",
                    grouped,
                    "Number of Recruitments",
                ),
                None => {
                    ui.label(RichText::new("Not available for this data set").italics());
                }
            }
        });
    }

    fn show_diversity(ui: &mut egui::Ui, data: &DashboardData, department: Option<&str>) {
        ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            if let Some(grouped) = &data.gender_by_department {
                ui.label(RichText::new("Gender by Department").size(16.0).strong());
                ChartPlotter::draw_grouped_bars(ui, "gender_by_department", grouped, "Employees");
                ui.add_space(12.0);
            }
            if let Some(grouped) = &data.race_by_department {
                ui.label(RichText::new("Race by Department").size(16.0).strong());
                ChartPlotter::draw_grouped_bars(ui, "race_by_department", grouped, "Employees");
                ui.add_space(12.0);
            }

            let Some(selected) = department.and_then(|d| data.department(d)) else {
                return;
            };
            ui.label(
                RichText::new(format!(
                    "{} ({} employees)",
                    selected.department, selected.headcount
                ))
                .size(16.0)
                .strong(),
            );
            ui.horizontal_top(|ui| {
                ChartPlotter::draw_count_table(ui, "dept_gender", "Sex", &selected.gender);
                ui.add_space(20.0);
                ChartPlotter::draw_count_table(ui, "dept_race", "Race", &selected.race);
            });
        });
    }

    fn show_workforce(ui: &mut egui::Ui, data: &DashboardData) {
        ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            let summary = &data.summary;
            ui.horizontal(|ui| {
                Self::kpi(ui, "Employees", summary.total.to_string());
                Self::kpi(ui, "Active", summary.active.to_string());
                Self::kpi(ui, "Terminated", summary.terminated.to_string());
                Self::kpi(ui, "Mean tenure", format_years(summary.mean_tenure_years));
                Self::kpi(ui, "Median tenure", format_years(summary.median_tenure_years));
                let attrition = data
                    .attrition
                    .as_ref()
                    .and_then(|a| a.rate)
                    .map(|r| format!("{:.1}%", r * 100.0))
                    .unwrap_or_else(|| "-".to_string());
                Self::kpi(
                    ui,
                    &format!("Attrition ({} mo)", data.attrition_window_months),
                    attrition,
                );
            });

            if let Some(a) = &data.attrition {
                ui.label(
                    RichText::new(format!(
                        "{} terminations between {} and {}, average headcount {:.1}",
                        a.terminations,
                        a.window_start,
                        a.window_end,
                        a.average_headcount()
                    ))
                    .size(11.0)
                    .color(Color32::GRAY),
                );
            }

            ui.add_space(12.0);
            ui.label(RichText::new("Headcount").size(16.0).strong());
            if data.headcount.is_empty() {
                ui.label(RichText::new("No hire dates could be read").italics());
            } else {
                ChartPlotter::draw_headcount(ui, &data.headcount);
            }

            ui.add_space(12.0);
            ui.label(RichText::new("Monthly Attrition").size(16.0).strong());
            ChartPlotter::draw_attrition_trend(ui, &data.monthly_attrition);

            if !summary.by_status.is_empty() {
                ui.add_space(12.0);
                ChartPlotter::draw_count_table(ui, "status", "Employment Status", &summary.by_status);
            }
        });
    }

    fn kpi(ui: &mut egui::Ui, title: &str, value: String) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_rgb(100, 149, 237)))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new(title).size(11.0).color(Color32::GRAY));
                    ui.label(RichText::new(value).size(20.0).strong());
                });
            });
    }

    fn show_employees(&mut self, ui: &mut egui::Ui, df: Option<&DataFrame>, department: Option<&str>) {
        let Some(df) = df else {
            return;
        };
        let label = match department {
            Some(name) => format!("Only {}", name),
            None => "Only the selected department".to_string(),
        };
        ui.add_enabled(
            department.is_some(),
            egui::Checkbox::new(&mut self.department_only, label),
        );
        self.sync_table_filter(df, department);
        let Some(page) = &self.page else {
            return;
        };

        let mut requested = None;
        ui.horizontal(|ui| {
            if ui
                .add_enabled(page.has_previous(), egui::Button::new("◀ Prev"))
                .clicked()
            {
                requested = Some(page.page - 1);
            }
            ui.label(format!("Page {} / {}", page.page + 1, page.page_count));
            if ui
                .add_enabled(page.has_next(), egui::Button::new("Next ▶"))
                .clicked()
            {
                requested = Some(page.page + 1);
            }
            if let Some((first, last)) = page.row_range() {
                ui.label(
                    RichText::new(format!("rows {}-{} of {}", first, last, page.total_rows))
                        .color(Color32::GRAY),
                );
            }
        });
        ui.add_space(6.0);

        ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
            egui::Grid::new("employee_table")
                .striped(true)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    for column in &page.columns {
                        ui.label(RichText::new(column).strong().size(11.0));
                    }
                    ui.end_row();
                    for row in &page.rows {
                        for cell in row {
                            ui.label(RichText::new(cell).size(11.0));
                        }
                        ui.end_row();
                    }
                });
        });

        if let Some(index) = requested {
            self.page_index = index;
            self.refresh_page(df);
        }
    }
}

fn format_years(years: f64) -> String {
    if years.is_nan() {
        "-".to_string()
    } else {
        format!("{:.1} yrs", years)
    }
}

/// Decode the banner logo. A missing or unreadable file only costs the image.
pub fn load_logo(path: &Path) -> Option<egui::ColorImage> {
    if !path.is_file() {
        debug!(path = %path.display(), "no banner logo");
        return None;
    }
    match image::open(path) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            Some(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not decode banner logo");
            None
        }
    }
}
