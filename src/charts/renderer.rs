//! Static Chart Renderer
//! Renders the dashboard charts to PNG with plotters for export.
//!
//! Each chart is drawn into an in-memory RGB buffer and encoded with `image`,
//! so nothing touches the disk until `export_dashboard` writes the files.

use crate::stats::{AttritionRate, CategoryCount, DashboardData, GroupedCounts, HeadcountSeries};
use chrono::{Datelike, NaiveDate};
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const BAR_COLOR: RGBColor = RGBColor(52, 152, 219);
const LINE_COLOR: RGBColor = RGBColor(231, 76, 60);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Nothing to draw for {0}")]
    Empty(&'static str),
}

fn drawing<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Draw into a fresh RGB buffer with `draw`, then encode it as PNG.
    fn render_png<F>(width: u32, height: u32, draw: F) -> Result<Vec<u8>, RenderError>
    where
        F: FnOnce(&DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>) -> Result<(), RenderError>,
    {
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(drawing)?;
            draw(&root)?;
            root.present().map_err(drawing)?;
        }

        let image = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| RenderError::Drawing("buffer size mismatch".to_string()))?;
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    fn category_label(labels: &[String], value: f64) -> String {
        let idx = value.round();
        if idx < 0.0 || (value - idx).abs() > 1e-6 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }

    /// Horizontal bar chart, first category at the bottom.
    pub fn render_count_bars(
        counts: &[CategoryCount],
        title: &str,
        value_label: &str,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        if counts.is_empty() {
            return Err(RenderError::Empty("count chart"));
        }
        let labels: Vec<String> = counts.iter().map(|c| c.label.clone()).collect();
        let max = counts.iter().map(|c| c.count).max().unwrap_or(0).max(1) as f64;
        let n = counts.len();

        Self::render_png(width, height, |root| {
            let mut chart = ChartBuilder::on(root)
                .caption(title, ("sans-serif", 28))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(220)
                .build_cartesian_2d(0f64..max * 1.1, -0.5f64..(n as f64 - 0.5))
                .map_err(drawing)?;

            chart
                .configure_mesh()
                .disable_y_mesh()
                .y_labels(n)
                .y_label_formatter(&|y| Self::category_label(&labels, *y))
                .x_label_formatter(&|x| format!("{:.0}", x))
                .x_desc(value_label)
                .draw()
                .map_err(drawing)?;

            chart
                .draw_series(counts.iter().enumerate().map(|(i, c)| {
                    let y = i as f64;
                    Rectangle::new([(0.0, y - 0.35), (c.count as f64, y + 0.35)], BAR_COLOR.filled())
                }))
                .map_err(drawing)?;
            Ok(())
        })
    }

    /// Grouped vertical bar chart with a legend of groups.
    pub fn render_grouped_bars(
        grouped: &GroupedCounts,
        title: &str,
        value_label: &str,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        if grouped.categories.is_empty() || grouped.groups.is_empty() {
            return Err(RenderError::Empty("grouped chart"));
        }
        let labels = grouped.categories.clone();
        let n = labels.len();
        let max = grouped.max_count().max(1) as f64;
        let slot = 0.8 / grouped.groups.len() as f64;

        Self::render_png(width, height, |root| {
            let mut chart = ChartBuilder::on(root)
                .caption(title, ("sans-serif", 28))
                .margin(20)
                .x_label_area_size(60)
                .y_label_area_size(60)
                .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..max * 1.15)
                .map_err(drawing)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(n)
                .x_label_formatter(&|x| Self::category_label(&labels, *x))
                .y_label_formatter(&|y| format!("{:.0}", y))
                .y_desc(value_label)
                .draw()
                .map_err(drawing)?;

            for (g, group) in grouped.groups.iter().enumerate() {
                let color = Palette99::pick(g).to_rgba();
                let offset = -0.4 + slot * g as f64;
                chart
                    .draw_series(grouped.counts[g].iter().enumerate().map(|(c, &count)| {
                        let x = c as f64 + offset;
                        Rectangle::new([(x, 0.0), (x + slot * 0.9, count as f64)], color.filled())
                    }))
                    .map_err(drawing)?
                    .label(group.as_str())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
            }

            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(drawing)?;
            Ok(())
        })
    }

    fn day_number(date: NaiveDate) -> f64 {
        date.num_days_from_ce() as f64
    }

    fn month_label(value: f64) -> String {
        NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
            .map(|d| d.format("%Y-%m").to_string())
            .unwrap_or_default()
    }

    /// Dated line chart shared by the headcount and attrition exports.
    fn render_dated_line(
        points: Vec<(f64, f64)>,
        title: &str,
        value_label: &str,
        color: RGBColor,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Err(RenderError::Empty("line chart"));
        };
        let x_range = first.0..(last.0 + 1.0);
        let y_max = points.iter().map(|p| p.1).fold(0.0, f64::max).max(1.0) * 1.1;

        Self::render_png(width, height, |root| {
            let mut chart = ChartBuilder::on(root)
                .caption(title, ("sans-serif", 28))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(70)
                .build_cartesian_2d(x_range, 0f64..y_max)
                .map_err(drawing)?;

            chart
                .configure_mesh()
                .x_labels(8)
                .x_label_formatter(&|x| Self::month_label(*x))
                .y_desc(value_label)
                .draw()
                .map_err(drawing)?;

            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
                .map_err(drawing)?;
            Ok(())
        })
    }

    pub fn render_headcount(
        series: &HeadcountSeries,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let points = series
            .points()
            .map(|(date, value)| (Self::day_number(date), value as f64))
            .collect();
        Self::render_dated_line(points, "Headcount", "Employees", BAR_COLOR, width, height)
    }

    pub fn render_attrition_trend(
        monthly: &[AttritionRate],
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let points = monthly
            .iter()
            .filter_map(|a| Some((Self::day_number(a.window_end), a.rate? * 100.0)))
            .collect();
        Self::render_dated_line(
            points,
            "Monthly Attrition",
            "Attrition (%)",
            LINE_COLOR,
            width,
            height,
        )
    }

    /// Render every available chart into `(file name, png)` pairs.
    /// Views that are missing or empty are skipped.
    pub fn render_dashboard(
        data: &DashboardData,
        width: u32,
        height: u32,
    ) -> Result<Vec<(String, Vec<u8>)>, RenderError> {
        let mut charts = Vec::new();
        let mut push = |name: &str, result: Result<Vec<u8>, RenderError>| match result {
            Ok(png) => {
                charts.push((name.to_string(), png));
                Ok(())
            }
            Err(RenderError::Empty(_)) => Ok(()),
            Err(e) => Err(e),
        };

        push(
            "recruitment_source.png",
            Self::render_count_bars(
                &data.sources,
                "Recruitment Source",
                "Number of Recruitments",
                width,
                height,
            ),
        )?;
        if let Some(grouped) = &data.sources_by_dimension {
            let title = format!("Details by {}", data.dimension.label());
            push(
                "recruitment_by_filter.png",
                Self::render_grouped_bars(grouped, &title, "Number of Recruitments", width, height),
            )?;
        }
        if let Some(grouped) = &data.gender_by_department {
            push(
                "gender_by_department.png",
                Self::render_grouped_bars(grouped, "Gender by Department", "Employees", width, height),
            )?;
        }
        if let Some(grouped) = &data.race_by_department {
            push(
                "race_by_department.png",
                Self::render_grouped_bars(grouped, "Race by Department", "Employees", width, height),
            )?;
        }
        push(
            "headcount.png",
            Self::render_headcount(&data.headcount, width, height),
        )?;
        push(
            "attrition.png",
            Self::render_attrition_trend(&data.monthly_attrition, width, height),
        )?;

        Ok(charts)
    }

    /// Write every chart as a PNG into `dir`, returning the written paths.
    pub fn export_dashboard(
        data: &DashboardData,
        dir: &Path,
        width: u32,
        height: u32,
    ) -> Result<Vec<PathBuf>, RenderError> {
        fs::create_dir_all(dir)?;
        let mut written = Vec::new();
        for (name, png) in Self::render_dashboard(data, width, height)? {
            let path = dir.join(name);
            fs::write(&path, png)?;
            written.push(path);
        }
        info!(dir = %dir.display(), charts = written.len(), "exported charts");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs_are_reported_not_drawn() {
        let err = StaticChartRenderer::render_count_bars(&[], "t", "n", 400, 300).unwrap_err();
        assert!(matches!(err, RenderError::Empty(_)));

        let err = StaticChartRenderer::render_headcount(&HeadcountSeries::default(), 400, 300)
            .unwrap_err();
        assert!(matches!(err, RenderError::Empty(_)));

        let err = StaticChartRenderer::render_grouped_bars(&GroupedCounts::default(), "t", "n", 400, 300)
            .unwrap_err();
        assert!(matches!(err, RenderError::Empty(_)));
    }

    fn dashboard() -> DashboardData {
        use crate::data::columns::{
            DATE_OF_HIRE, DATE_OF_TERMINATION, DEPARTMENT, EMPLOYEE_SOURCE, RACE, SEX, STATE,
        };
        use crate::data::FilterDimension;
        use polars::prelude::*;

        let df = df!(
            EMPLOYEE_SOURCE => &["Referral", "Indeed", "Referral", "Website"],
            DEPARTMENT => &["Sales", "Production", "Production", "Sales"],
            STATE => &["MA", "CT", "MA", "MA"],
            SEX => &["Female", "Male", "Female", "Male"],
            RACE => &["White", "Asian", "White", "White"],
            DATE_OF_HIRE => &["1/1/2020", "1/1/2020", "1/1/2020", "1/15/2020"],
            DATE_OF_TERMINATION => &[None, None, Some("1/20/2020"), Some("3/10/2020")],
        )
        .unwrap();
        DashboardData::compute(&df, FilterDimension::Location, 1).unwrap()
    }

    #[test]
    fn export_writes_one_png_per_chart() {
        let dir = tempfile::tempdir().unwrap();
        let written =
            StaticChartRenderer::export_dashboard(&dashboard(), dir.path(), 640, 480).unwrap();

        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "recruitment_source.png",
                "recruitment_by_filter.png",
                "gender_by_department.png",
                "race_by_department.png",
                "headcount.png",
                "attrition.png",
            ]
        );
        for path in &written {
            assert_eq!(path.parent(), Some(dir.path()));
            let bytes = fs::read(path).unwrap();
            assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
            let image = image::load_from_memory(&bytes).unwrap();
            assert_eq!((image.width(), image.height()), (640, 480));
        }
    }

    #[test]
    fn export_skips_missing_views() {
        let mut data = dashboard();
        data.sources_by_dimension = None;
        data.race_by_department = None;
        let charts = StaticChartRenderer::render_dashboard(&data, 320, 240).unwrap();
        let names: Vec<_> = charts.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec!["recruitment_source.png", "gender_by_department.png", "headcount.png", "attrition.png"]
        );
    }

    #[test]
    fn category_labels_skip_fractional_ticks() {
        let labels = vec!["A".to_string(), "B".to_string()];
        assert_eq!(StaticChartRenderer::category_label(&labels, 1.0), "B");
        assert_eq!(StaticChartRenderer::category_label(&labels, 0.25), "");
    }
}
