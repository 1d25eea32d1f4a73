//! Chart Plotter Module
//! Interactive dashboard charts drawn with egui_plot.

use crate::stats::{AttritionRate, CategoryCount, GroupedCounts, HeadcountSeries};
use chrono::{Datelike, NaiveDate};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

pub const SOURCE_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

const CHART_HEIGHT: f32 = 320.0;

/// Draws the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn group_color(group_index: usize) -> Color32 {
        PALETTE[group_index % PALETTE.len()]
    }

    /// One grid mark per category so every bar gets its label.
    fn category_marks(n: usize) -> Vec<GridMark> {
        (0..n)
            .map(|i| GridMark {
                value: i as f64,
                step_size: 1.0,
            })
            .collect()
    }

    fn label_at(labels: &[String], value: f64) -> String {
        let idx = value.round();
        if idx < 0.0 || (value - idx).abs() > 1e-6 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }

    /// Horizontal bar per category, in the given order (bottom to top).
    pub fn draw_count_bars(
        ui: &mut egui::Ui,
        id: &str,
        counts: &[CategoryCount],
        value_label: &str,
    ) {
        let labels: Vec<String> = counts.iter().map(|c| c.label.clone()).collect();
        let n = labels.len();
        let height = CHART_HEIGHT.max(28.0 * n as f32);

        let bars: Vec<Bar> = counts
            .iter()
            .enumerate()
            .map(|(i, c)| {
                Bar::new(i as f64, c.count as f64)
                    .width(0.7)
                    .name(&c.label)
                    .fill(SOURCE_COLOR)
            })
            .collect();

        Plot::new(id.to_string())
            .height(height)
            .allow_scroll(false)
            .allow_drag(false)
            .x_axis_label(value_label)
            .include_x(0.0)
            .y_grid_spacer(move |_input| Self::category_marks(n))
            .y_axis_formatter(move |mark, _range| Self::label_at(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .horizontal()
                        .color(SOURCE_COLOR)
                        .name(value_label),
                );
            });
    }

    /// Vertical bars per category, one colored bar per group side by side.
    pub fn draw_grouped_bars(
        ui: &mut egui::Ui,
        id: &str,
        grouped: &GroupedCounts,
        value_label: &str,
    ) {
        if grouped.groups.is_empty() {
            ui.label(RichText::new("No data").italics());
            return;
        }

        let labels = grouped.categories.clone();
        let n = labels.len();
        let group_count = grouped.groups.len() as f64;
        let slot = 0.8 / group_count;

        Plot::new(id.to_string())
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .y_axis_label(value_label)
            .x_axis_label(grouped.category_column.clone())
            .include_y(0.0)
            .x_grid_spacer(move |_input| Self::category_marks(n))
            .x_axis_formatter(move |mark, _range| Self::label_at(&labels, mark.value))
            .show(ui, |plot_ui| {
                for (g, group) in grouped.groups.iter().enumerate() {
                    let color = Self::group_color(g);
                    let offset = -0.4 + slot * (g as f64 + 0.5);
                    let bars: Vec<Bar> = grouped.counts[g]
                        .iter()
                        .enumerate()
                        .map(|(c, &count)| {
                            Bar::new(c as f64 + offset, count as f64)
                                .width(slot * 0.9)
                                .name(format!("{} / {}", grouped.categories[c], group))
                        })
                        .collect();

                    plot_ui.bar_chart(BarChart::new(bars).color(color).name(group));
                }
            });
    }

    fn date_axis(value: f64) -> String {
        NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
            .map(|d| d.format("%Y-%m").to_string())
            .unwrap_or_default()
    }

    fn day_number(date: NaiveDate) -> f64 {
        date.num_days_from_ce() as f64
    }

    /// Headcount over time as a line.
    pub fn draw_headcount(ui: &mut egui::Ui, series: &HeadcountSeries) {
        let points: PlotPoints = series
            .points()
            .map(|(date, value)| [Self::day_number(date), value as f64])
            .collect();

        Plot::new("headcount")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .y_axis_label("Headcount")
            .include_y(0.0)
            .x_axis_formatter(|mark, _range| Self::date_axis(mark.value))
            .label_formatter(|_name, value| {
                format!("{}\n{:.0}", Self::date_axis_day(value.x), value.y)
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(points)
                        .color(SOURCE_COLOR)
                        .width(1.5)
                        .name("Headcount"),
                );
            });
    }

    fn date_axis_day(value: f64) -> String {
        NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
            .map(|d| d.to_string())
            .unwrap_or_default()
    }

    /// Monthly attrition rate (percent) as line + markers. Months with no rate are skipped.
    pub fn draw_attrition_trend(ui: &mut egui::Ui, monthly: &[AttritionRate]) {
        let points_vec: Vec<[f64; 2]> = monthly
            .iter()
            .filter_map(|a| Some([Self::day_number(a.window_end), a.rate? * 100.0]))
            .collect();

        Plot::new("attrition_trend")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .y_axis_label("Attrition (%)")
            .include_y(0.0)
            .x_axis_formatter(|mark, _range| Self::date_axis(mark.value))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points_vec.iter().copied()))
                        .color(PALETTE[0])
                        .width(1.5)
                        .name("Monthly attrition"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points_vec.iter().copied()))
                        .radius(2.5)
                        .color(PALETTE[0]),
                );
            });
    }

    /// Count table (label, count, share) beside a chart.
    pub fn draw_count_table(ui: &mut egui::Ui, id: &str, title: &str, counts: &[CategoryCount]) {
        let total: usize = counts.iter().map(|c| c.count).sum();

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(id))
                    .striped(true)
                    .min_col_width(60.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new(title).strong().size(11.0));
                        ui.label(RichText::new("N").strong().size(11.0));
                        ui.label(RichText::new("Share").strong().size(11.0));
                        ui.end_row();

                        for c in counts {
                            ui.label(RichText::new(&c.label).size(11.0));
                            ui.label(RichText::new(c.count.to_string()).size(11.0));
                            let share = if total > 0 {
                                c.count as f64 / total as f64 * 100.0
                            } else {
                                0.0
                            };
                            ui.label(RichText::new(format!("{:.1}%", share)).size(11.0));
                            ui.end_row();
                        }
                    });
            });
    }
}
