//! Daily table view for the dashboard TUI.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per day of the
//! report window plus a highlighted totals row at the bottom. When the window
//! has more days than fit, the oldest days scroll off the top so the newest
//! days and the totals row stay visible.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use dashboard_core::formatting::format_count;
use dashboard_data::report::DashboardReport;

use crate::themes::Theme;

/// Rows taken by the block borders and the column header.
const TABLE_CHROME_ROWS: u16 = 3;

/// First row to draw so that the last `row_count` rows end at the bottom of a
/// table `height` cells tall.
pub fn tail_offset(row_count: usize, height: u16) -> usize {
    let visible = usize::from(height.saturating_sub(TABLE_CHROME_ROWS));
    row_count.saturating_sub(visible)
}

/// Render the per-day table for `report` into `area`.
pub fn render_table_view(frame: &mut Frame, area: Rect, report: &DashboardReport, theme: &Theme) {
    let header_cells = ["Date", report.series_a.label(), report.series_b.label()]
        .into_iter()
        .map(|h| Cell::from(h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let mut rows: Vec<Row> = report
        .buckets
        .iter()
        .enumerate()
        .map(|(i, bucket)| {
            Row::new(vec![
                Cell::from(bucket.date.format("%Y-%m-%d").to_string()),
                Cell::from(format_count(bucket.series_a)).style(theme.series_a),
                Cell::from(format_count(bucket.series_b)).style(theme.series_b),
            ])
            .style(theme.row_style(i))
        })
        .collect();

    let totals = report.totals();
    rows.push(
        Row::new(vec![
            Cell::from(format!("TOTAL ({} days)", totals.days)),
            Cell::from(format_count(totals.series_a)),
            Cell::from(format_count(totals.series_b)),
        ])
        .style(theme.table_total),
    );

    let rows_len = rows.len();
    let widths = [
        Constraint::Length(18),
        Constraint::Length(14),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" Daily Counts {} ", report.window)),
        )
        .style(theme.text);

    let mut state = TableState::default().with_offset(tail_offset(rows_len, area.height));
    frame.render_stateful_widget(table, area, &mut state);
}

/// Placeholder shown when the window contains no creations at all.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No records in this window", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Press 't' to switch views, 'q' or Ctrl+C to exit",
            theme.dim,
        )),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Admin Dashboard "),
        ),
        area,
    );
}

/// Placeholder shown when a report could not be produced.
pub fn render_unavailable(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme.error)),
        Line::from(""),
        Line::from(Span::styled("Retrying on the next refresh...", theme.info)),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Admin Dashboard "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dashboard_core::models::{DailyCounts, EntityKind};
    use dashboard_core::time_utils::DateWindow;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_report() -> DashboardReport {
        let a: DailyCounts = [(d("2025-01-01"), 5), (d("2025-01-03"), 2)].into_iter().collect();
        let b: DailyCounts = [(d("2025-01-02"), 1_250)].into_iter().collect();
        DashboardReport::from_counts(
            DateWindow::new(d("2025-01-01"), d("2025-01-03")),
            EntityKind::Users,
            EntityKind::Products,
            &a,
            &b,
        )
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_table_view_rows_and_totals() {
        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let report = make_report();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_table_view(frame, area, &report, &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Users"));
        assert!(text.contains("Products"));
        assert!(text.contains("2025-01-02"));
        assert!(text.contains("1,250"));
        assert!(text.contains("TOTAL (3 days)"));
    }

    #[test]
    fn test_render_table_view_empty_window_does_not_panic() {
        let backend = TestBackend::new(80, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::light();
        let report = DashboardReport::from_counts(
            DateWindow::new(d("2025-01-10"), d("2025-01-01")),
            EntityKind::Users,
            EntityKind::Products,
            &DailyCounts::new(),
            &DailyCounts::new(),
        );

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_table_view(frame, area, &report, &theme);
            })
            .unwrap();

        assert!(buffer_text(&terminal).contains("TOTAL (0 days)"));
    }

    #[test]
    fn test_tail_offset() {
        assert_eq!(tail_offset(33, 40), 0);
        assert_eq!(tail_offset(33, 25), 11);
        assert_eq!(tail_offset(33, 2), 33);
        assert_eq!(tail_offset(0, 25), 0);
    }

    #[test]
    fn test_render_table_view_month_keeps_latest_days_and_total() {
        let backend = TestBackend::new(100, 25);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let a: DailyCounts = [(d("2024-12-15"), 3), (d("2025-01-15"), 7)].into_iter().collect();
        let report = DashboardReport::from_counts(
            DateWindow::new(d("2024-12-15"), d("2025-01-15")),
            EntityKind::Users,
            EntityKind::Products,
            &a,
            &DailyCounts::new(),
        );
        assert_eq!(report.buckets.len(), 32);

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_table_view(frame, area, &report, &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Date"), "column header stays pinned");
        assert!(text.contains("2025-01-15"), "newest day is drawn");
        assert!(text.contains("2025-01-14"));
        assert!(text.contains("TOTAL (32 days)"));
        assert!(!text.contains("2024-12-20"), "oldest days scroll off");
    }

    #[test]
    fn test_render_no_data() {
        let backend = TestBackend::new(80, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_no_data(frame, area, &theme);
            })
            .unwrap();

        assert!(buffer_text(&terminal).contains("No records in this window"));
    }

    #[test]
    fn test_render_unavailable_shows_message() {
        let backend = TestBackend::new(100, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::classic();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_unavailable(frame, area, "Report unavailable: disk gone", &theme);
            })
            .unwrap();

        assert!(buffer_text(&terminal).contains("Report unavailable: disk gone"));
    }
}
