//! HR Dashboard Main Application
//! Main window with control panel and tabbed dashboard view.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::data::columns::DEPARTMENT;
use crate::data::{DataLoader, FilterDimension};
use crate::gui::{load_logo, ControlPanel, ControlPanelAction, DashboardView};
use crate::stats::DashboardData;
use egui::SidePanel;
use polars::prelude::*;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use tracing::{error, info, warn};

/// Calculation result from background thread
enum CalcResult {
    Progress(f32, String),
    Complete(Box<DashboardData>),
    Error(String),
}

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Complete { df: DataFrame, path: PathBuf },
    Error(String),
}

/// Main application window.
pub struct HrDashboardApp {
    config: DashboardConfig,
    config_path: PathBuf,
    loader: DataLoader,
    control_panel: ControlPanel,
    view: DashboardView,

    // Background calculation
    calc_rx: Option<Receiver<CalcResult>>,
    is_calculating: bool,

    // Background CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl HrDashboardApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: DashboardConfig,
        config_path: PathBuf,
    ) -> Self {
        let mut app = Self {
            loader: DataLoader::new(),
            control_panel: ControlPanel::new(config.default_filter, config.attrition_window_months),
            view: DashboardView::new(config.page_size),
            config,
            config_path,
            calc_rx: None,
            is_calculating: false,
            load_rx: None,
            is_loading: false,
        };

        if let Some(logo) = app.config.logo_path.as_deref().and_then(load_logo) {
            app.view
                .set_logo(cc.egui_ctx.load_texture("banner_logo", logo, egui::TextureOptions::LINEAR));
        }

        if let Some(path) = app.config.csv_path.clone() {
            if path.is_file() {
                app.start_loading(path);
            } else {
                warn!(path = %path.display(), "configured CSV not found, waiting for user");
                app.control_panel
                    .set_progress(0.0, "Select an employee CSV to begin");
            }
        }
        app
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_loading(path);
        }
    }

    /// Load CSV in a background thread
    fn start_loading(&mut self, path: PathBuf) {
        self.view.clear();
        // drop any computation still running against the previous table
        self.calc_rx = None;
        self.is_calculating = false;
        self.control_panel.export_enabled = false;
        self.control_panel.settings.csv_path = Some(path.clone());
        self.control_panel.set_progress(0.0, "Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress("Reading CSV file...".to_string()));

            match DataLoader::read_csv(&path) {
                Ok(df) => {
                    let _ = tx.send(LoadResult::Complete { df, path });
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_progress(0.0, &status);
                    }
                    LoadResult::Complete { df, path } => {
                        self.loader.set_dataframe(df, path);
                        self.control_panel
                            .update_departments(self.loader.get_unique_values(DEPARTMENT));
                        self.control_panel.set_progress(
                            0.0,
                            &format!(
                                "Loaded {} employees, {} columns",
                                self.loader.get_row_count(),
                                self.loader.get_columns().len()
                            ),
                        );
                        self.is_loading = false;
                        should_keep_receiver = false;
                        self.remember_csv();
                        self.start_calculation();
                    }
                    LoadResult::Error(e) => {
                        error!(error = %e, "CSV load failed");
                        self.control_panel.set_progress(0.0, &format!("Error: {}", e));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Persist the last CSV path so the next start loads it.
    fn remember_csv(&mut self) {
        let Some(path) = self.loader.get_file_path() else {
            return;
        };
        if self.config.csv_path.as_deref() == Some(path) {
            return;
        }
        self.config.csv_path = Some(path.to_path_buf());
        if let Err(e) = self.config.save(&self.config_path) {
            warn!(error = %e, "could not save config");
        }
    }

    /// Start calculation in background thread
    fn start_calculation(&mut self) {
        let Some(df) = self.loader.get_dataframe().cloned() else {
            self.control_panel.set_progress(0.0, "No data loaded");
            return;
        };
        let dimension = self.control_panel.settings.dimension;
        let months = self.control_panel.settings.attrition_months;

        let (tx, rx) = channel();
        self.calc_rx = Some(rx);
        self.is_calculating = true;
        self.control_panel.set_progress(10.0, "Computing dashboard...");

        thread::spawn(move || {
            Self::run_calculation(tx, df, dimension, months);
        });
    }

    /// Run calculation (called from background thread)
    fn run_calculation(
        tx: Sender<CalcResult>,
        df: DataFrame,
        dimension: FilterDimension,
        months: u32,
    ) {
        let _ = tx.send(CalcResult::Progress(
            30.0,
            "Aggregating employee records...".to_string(),
        ));

        match DashboardData::compute(&df, dimension, months) {
            Ok(data) => {
                let _ = tx.send(CalcResult::Complete(Box::new(data)));
            }
            Err(e) => {
                let _ = tx.send(CalcResult::Error(e.to_string()));
            }
        }
    }

    /// Check for calculation results
    fn check_calculation_results(&mut self) {
        let rx = self.calc_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    CalcResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    CalcResult::Complete(mut data) => {
                        let mut status = if data.warnings.is_empty() {
                            "Complete! Dashboard ready".to_string()
                        } else {
                            format!("Complete! {} views unavailable", data.warnings.len())
                        };
                        let settings = &self.control_panel.settings;
                        if let Some(df) = self.loader.get_dataframe() {
                            if let Err(e) =
                                data.sync_settings(df, settings.dimension, settings.attrition_months)
                            {
                                status = format!("Error: {}", e);
                            }
                        }
                        self.view.set_data(*data);
                        if let Some(df) = self.loader.get_dataframe() {
                            self.view.refresh_page(df);
                        }
                        self.control_panel.export_enabled = true;
                        self.control_panel.set_progress(100.0, &status);
                        self.is_calculating = false;
                        should_keep_receiver = false;
                    }
                    CalcResult::Error(e) => {
                        error!(error = %e, "dashboard computation failed");
                        self.control_panel.set_progress(0.0, &format!("Error: {}", e));
                        self.is_calculating = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.calc_rx = Some(rx);
            }
        }
    }

    /// Recompute the grouped recruitment chart for the new dropdown value.
    fn handle_filter_changed(&mut self) {
        let dimension = self.control_panel.settings.dimension;
        let (Some(df), Some(data)) = (self.loader.get_dataframe(), self.view.data.as_mut()) else {
            return;
        };
        match data.set_dimension(df, dimension) {
            Ok(()) => {
                info!(dimension = dimension.label(), "filter changed");
                self.control_panel
                    .set_progress(100.0, &format!("Complete! Filtered by {}", dimension.label()));
            }
            Err(e) => {
                data.sources_by_dimension = None;
                data.dimension = dimension;
                self.control_panel.set_progress(100.0, &format!("Error: {}", e));
            }
        }
    }

    fn handle_attrition_window_changed(&mut self) {
        let months = self.control_panel.settings.attrition_months;
        if let Some(data) = self.view.data.as_mut() {
            data.set_attrition_window(months);
        }
    }

    /// Render charts to PNG and write them into a chosen folder
    fn handle_export_charts(&mut self) {
        let Some(data) = &self.view.data else {
            self.control_panel.set_progress(0.0, "No charts to export");
            return;
        };

        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };

        self.control_panel.set_progress(50.0, "Rendering charts...");
        match StaticChartRenderer::export_dashboard(
            data,
            &dir,
            self.config.export_width,
            self.config.export_height,
        ) {
            Ok(paths) => {
                self.control_panel
                    .set_progress(100.0, &format!("Complete! Exported {} charts", paths.len()));
                if let Err(e) = open::that(&dir) {
                    warn!(error = %e, "could not open export folder");
                }
            }
            Err(e) => {
                error!(error = %e, "chart export failed");
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for HrDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();
        self.check_calculation_results();

        // Request repaint while loading or calculating
        if self.is_loading || self.is_calculating {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::FilterChanged => self.handle_filter_changed(),
                        ControlPanelAction::AttritionWindowChanged => {
                            self.handle_attrition_window_changed()
                        }
                        ControlPanelAction::ExportCharts => {
                            if !self.is_calculating {
                                self.handle_export_charts();
                            }
                        }
                        // the view reads the selection every frame
                        ControlPanelAction::DepartmentChanged | ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            let department = self.control_panel.settings.department.clone();
            self.view
                .show(ui, self.loader.get_dataframe(), department.as_deref());
        });
    }
}
