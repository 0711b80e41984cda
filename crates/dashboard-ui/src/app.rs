//! Main application state and TUI event loop for the admin dashboard.
//!
//! [`App`] owns the theme, the view mode, and the last received report. It
//! drives the event loop fed by the refresh channel.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::EntityKind;
use dashboard_data::report::DashboardReport;
use dashboard_runtime::orchestrator::ReportUpdate;

use crate::chart_view;
use crate::components::header::Header;
use crate::table_view;
use crate::themes::Theme;

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// Which view the TUI is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Chart,
    Table,
}

impl ViewMode {
    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Chart => ViewMode::Table,
            ViewMode::Table => ViewMode::Chart,
        }
    }

    /// Parse a `--view` value; `None` for views that are not TUI views.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "chart" => Some(ViewMode::Chart),
            "table" => Some(ViewMode::Table),
            _ => None,
        }
    }
}

// ── ReportState ───────────────────────────────────────────────────────────────

/// What the body of the screen shows.
#[derive(Debug, Clone)]
pub enum ReportState {
    /// No update has arrived yet.
    Loading,
    Ready(DashboardReport),
    Unavailable(String),
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    pub theme: Theme,
    pub view_mode: ViewMode,
    pub series_a: EntityKind,
    pub series_b: EntityKind,
    pub timezone: String,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    pub state: ReportState,
}

impl App {
    pub fn new(
        theme_name: &str,
        view_mode: ViewMode,
        series_a: EntityKind,
        series_b: EntityKind,
        timezone: String,
    ) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            view_mode,
            series_a,
            series_b,
            timezone,
            should_quit: false,
            state: ReportState::Loading,
        }
    }

    // ── Public event loops ────────────────────────────────────────────────────

    /// Run the live dashboard, receiving reports from `rx`.
    ///
    /// The terminal loop blocks on `crossterm::event::poll` (250 ms timeout),
    /// so it runs on the blocking pool while the refresh task keeps feeding
    /// the channel. In raw mode Ctrl+C arrives as a key press, not a signal.
    pub async fn run_live(self, rx: mpsc::Receiver<ReportUpdate>) -> Result<()> {
        tokio::task::spawn_blocking(move || self.run(rx))
            .await
            .map_err(|e| DashboardError::Terminal(format!("TUI task failed: {}", e)))?
            .map_err(|e| DashboardError::Terminal(e.to_string()))
    }

    /// Apply a key press. `q`, `Q` and `Ctrl+C` quit; `t` toggles the view.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('t') | KeyCode::Char('T') => self.view_mode = self.view_mode.toggle(),
            _ => {}
        }
    }

    /// Store an incoming [`ReportUpdate`].
    pub fn apply_update(&mut self, update: ReportUpdate) {
        self.state = match update {
            ReportUpdate::Ready(report) => ReportState::Ready(report),
            ReportUpdate::Unavailable(message) => ReportState::Unavailable(message),
        };
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn run(mut self, mut rx: mpsc::Receiver<ReportUpdate>) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            self.drain_updates(&mut rx);

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Drain pending updates without blocking.
    fn drain_updates(&mut self, rx: &mut mpsc::Receiver<ReportUpdate>) {
        loop {
            match rx.try_recv() {
                Ok(update) => self.apply_update(update),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    tracing::debug!("report channel disconnected; quitting");
                    self.should_quit = true;
                    break;
                }
            }
        }
    }

    fn render(&self, frame: &mut Frame) {
        let [header_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(Header::HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let header = Header::new(
            self.series_a.label(),
            self.series_b.label(),
            &self.timezone,
            &self.theme,
        );
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), header_area);

        match &self.state {
            ReportState::Loading => render_loading(frame, body_area, &self.theme),
            ReportState::Unavailable(message) => {
                table_view::render_unavailable(frame, body_area, message, &self.theme);
            }
            ReportState::Ready(report) if report.is_empty() => {
                table_view::render_no_data(frame, body_area, &self.theme);
            }
            ReportState::Ready(report) => match self.view_mode {
                ViewMode::Chart => {
                    chart_view::render_chart_view(frame, body_area, report, &self.theme)
                }
                ViewMode::Table => {
                    table_view::render_table_view(frame, body_area, report, &self.theme)
                }
            },
        }

        let footer = Line::from(vec![
            Span::styled("t", self.theme.value),
            Span::styled(" toggle view  ", self.theme.dim),
            Span::styled("q", self.theme.value),
            Span::styled(" quit", self.theme.dim),
        ]);
        frame.render_widget(Paragraph::new(footer), footer_area);
    }
}

fn render_loading(frame: &mut Frame, area: ratatui::layout::Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Loading report...", theme.info)),
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
