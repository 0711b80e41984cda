//! Line chart of the two daily series.

use ratatui::{
    layout::Rect,
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use dashboard_core::formatting::{format_axis_date, format_count};
use dashboard_data::report::DashboardReport;

use crate::themes::Theme;

/// `(day index, count)` points for each series.
pub fn series_points(report: &DashboardReport) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    report
        .buckets
        .iter()
        .enumerate()
        .map(|(i, b)| ((i as f64, b.series_a as f64), (i as f64, b.series_b as f64)))
        .unzip()
}

/// First, middle and last dates of the window; fewer when the window is short.
pub fn x_labels(report: &DashboardReport) -> Vec<String> {
    let buckets = &report.buckets;
    match buckets.len() {
        0 => Vec::new(),
        1 => vec![format_axis_date(buckets[0].date)],
        2 => vec![
            format_axis_date(buckets[0].date),
            format_axis_date(buckets[1].date),
        ],
        n => vec![
            format_axis_date(buckets[0].date),
            format_axis_date(buckets[n / 2].date),
            format_axis_date(buckets[n - 1].date),
        ],
    }
}

/// Upper y bound; never zero so an all-empty window still draws an axis.
pub fn y_upper(report: &DashboardReport) -> f64 {
    report.peak().max(1) as f64
}

pub fn render_chart_view(frame: &mut Frame, area: Rect, report: &DashboardReport, theme: &Theme) {
    let (points_a, points_b) = series_points(report);
    let y_max = y_upper(report);
    let x_max = report.buckets.len().saturating_sub(1).max(1) as f64;

    let datasets = vec![
        Dataset::default()
            .name(report.series_a.label())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.series_a)
            .data(&points_a),
        Dataset::default()
            .name(report.series_b.label())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.series_b)
            .data(&points_b),
    ];

    let y_max_count = y_max as u64;
    let y_labels = vec![
        Span::styled("0", theme.axis),
        Span::styled(format_count(y_max_count / 2), theme.axis),
        Span::styled(format_count(y_max_count), theme.axis),
    ];
    let x_labels: Vec<Span> = x_labels(report)
        .into_iter()
        .map(|l| Span::styled(l, theme.axis))
        .collect();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" Daily Creations {} ", report.window)),
        )
        .x_axis(
            Axis::default()
                .style(theme.axis)
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("count", theme.label))
                .style(theme.axis)
                .bounds([0.0, y_max])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
