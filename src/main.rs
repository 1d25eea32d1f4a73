//! HR Dashboard - recruitment, diversity, headcount & attrition
//!
//! Loads a CSV of employee records and shows aggregate HR statistics as
//! interactive charts and a paginated table.

mod charts;
mod config;
mod data;
mod gui;
mod stats;

use anyhow::{anyhow, Context};
use config::DashboardConfig;
use eframe::egui;
use gui::HrDashboardApp;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let config_path = DashboardConfig::default_path();
    let config = DashboardConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!(config = %config_path.display(), "startup");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("HR Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "HR Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(HrDashboardApp::new(cc, config, config_path)))),
    )
    .map_err(|e| anyhow!("dashboard window failed: {e}"))
}
