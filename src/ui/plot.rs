use std::ops::RangeInclusive;

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Plot, PlotPoint, Points,
};

use crate::data::model::EmployeeRecord;
use crate::data::stats::{HistogramBin, box_summary, count_histogram, weighted_histogram};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 280.0;

/// Bins of the age/salary histogram.
const AGE_SALARY_BINS: usize = 8;

const BAR_COLOR: Color32 = Color32::from_rgb(76, 120, 168);

/// Shared look of every chart: fixed height, no pan/zoom.
fn chart(id: &str) -> Plot<'static> {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
}

fn bars(bins: &[HistogramBin]) -> Vec<Bar> {
    bins.iter()
        .map(|b| {
            Bar::new(b.center(), b.value)
                .width(b.width() * 0.95)
                .name(format!("{:.1} – {:.1}", b.start, b.end))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// 1. Distribution of performance scores
// ---------------------------------------------------------------------------

pub fn score_histogram(ui: &mut Ui, state: &AppState) {
    ui.heading("Distribution of performance scores");

    let scores: Vec<f64> = state
        .visible_records()
        .map(|r| r.performance_score)
        .collect();
    let chart_bars = bars(&count_histogram(&scores));

    chart("score_histogram")
        .x_axis_label("Performance score")
        .y_axis_label("Employees")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(chart_bars).name("Employees").color(BAR_COLOR));
        });
}

// ---------------------------------------------------------------------------
// 2. Average work hours by gender
// ---------------------------------------------------------------------------

pub fn hours_by_gender(ui: &mut Ui, state: &AppState) {
    ui.heading("Average work hours by gender");

    // One slot per gender of the full table keeps positions stable under filtering.
    let genders: Vec<String> = state.table.genders.iter().cloned().collect();
    let mut plots = Vec::new();
    let mut outliers = Vec::new();

    for (pos, gender) in genders.iter().enumerate() {
        let hours: Vec<f64> = state
            .visible_records()
            .filter(|r| r.gender == *gender)
            .map(|r| r.average_work_hours)
            .collect();
        let Some(summary) = box_summary(&hours) else {
            continue;
        };

        let color = state.gender_colors.color_for(gender);
        let x = pos as f64;
        let elem = BoxElem::new(
            x,
            BoxSpread::new(
                summary.lower_whisker,
                summary.q1,
                summary.median,
                summary.q3,
                summary.upper_whisker,
            ),
        )
        .name(gender)
        .box_width(0.5)
        .whisker_width(0.3)
        .fill(color.gamma_multiply(0.4))
        .stroke(Stroke::new(1.5, color));
        plots.push(BoxPlot::new(vec![elem]).name(gender).color(color));

        if !summary.outliers.is_empty() {
            let pts: Vec<[f64; 2]> = summary.outliers.iter().map(|&v| [x, v]).collect();
            outliers.push(Points::new(pts).name(gender).color(color).radius(3.0));
        }
    }

    chart("hours_by_gender")
        .legend(Legend::default())
        .x_axis_label("Gender")
        .y_axis_label("Average work hours")
        .include_x(-0.5)
        .include_x(genders.len() as f64 - 0.5)
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&genders, mark.value)
        })
        .show(ui, |plot_ui| {
            for bp in plots {
                plot_ui.box_plot(bp);
            }
            for pts in outliers {
                plot_ui.points(pts);
            }
        });
}

// ---------------------------------------------------------------------------
// 3. Age vs. summed salary
// ---------------------------------------------------------------------------

pub fn age_salary_histogram(ui: &mut Ui, state: &AppState) {
    ui.heading("Employee age and salary");

    let pairs: Vec<(f64, f64)> = state.visible_records().map(|r| (r.age, r.salary)).collect();
    let chart_bars = bars(&weighted_histogram(&pairs, AGE_SALARY_BINS));

    chart("age_salary_histogram")
        .x_axis_label("Employee age")
        .y_axis_label("Total salary")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(chart_bars).name("Salary").color(BAR_COLOR));
        });
}

// ---------------------------------------------------------------------------
// 4. Average work hours vs. performance score
// ---------------------------------------------------------------------------

/// One scatter point with the details shown on hover.
struct HoverRow {
    gender: String,
    hours: f64,
    level: usize,
    label: String,
}

pub fn hours_vs_score(ui: &mut Ui, state: &AppState) {
    ui.heading("Performance and hours worked");

    let table = &state.table;
    let levels: Vec<String> = table.score_levels.iter().map(|s| format!("{s}")).collect();

    let mut rows = Vec::new();
    for record in state.visible_records() {
        if let Some(level) = table.score_level_index(record.performance_score) {
            rows.push(HoverRow {
                gender: record.gender.clone(),
                hours: record.average_work_hours,
                level,
                label: hover_label(record),
            });
        }
    }

    let series: Vec<Points> = table
        .genders
        .iter()
        .map(|gender| {
            let pts: Vec<[f64; 2]> = rows
                .iter()
                .filter(|r| r.gender == *gender)
                .map(|r| [r.hours, r.level as f64])
                .collect();
            Points::new(pts)
                .name(gender)
                .color(state.gender_colors.color_for(gender))
                .radius(4.0)
                .filled(true)
        })
        .collect();

    // Axis domain comes from the unfiltered table so it does not jump with filters.
    let hours = table.hours_bounds;
    chart("hours_vs_score")
        .legend(Legend::default())
        .x_axis_label("Average work hours")
        .y_axis_label("Performance score")
        .include_x(hours.min)
        .include_x(hours.max)
        .include_y(-0.5)
        .include_y(levels.len() as f64 - 0.5)
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&levels, mark.value)
        })
        .label_formatter(move |name: &str, value: &PlotPoint| hover_text(&rows, name, value))
        .show(ui, |plot_ui| {
            for pts in series {
                plot_ui.points(pts);
            }
        });
}

fn hover_label(record: &EmployeeRecord) -> String {
    format!(
        "{}\nGender: {}\nPosition: {}",
        record.name, record.gender, record.position
    )
}

/// Tooltip for the hovered point: every employee sharing its series and position.
fn hover_text(rows: &[HoverRow], series: &str, value: &PlotPoint) -> String {
    if series.is_empty() {
        return String::new();
    }
    let level = value.y.round() as usize;
    let matches: Vec<&str> = rows
        .iter()
        .filter(|r| r.gender == series && r.level == level && (r.hours - value.x).abs() < 1e-9)
        .map(|r| r.label.as_str())
        .collect();
    if matches.is_empty() {
        format!("{series}\n{:.1} h", value.x)
    } else {
        matches.join("\n\n")
    }
}

/// Axis label for an ordinal position; blank between categories.
fn category_label(labels: &[String], position: f64) -> String {
    if position < 0.0 || position.fract().abs() > 1e-6 {
        return String::new();
    }
    labels.get(position as usize).cloned().unwrap_or_default()
}
