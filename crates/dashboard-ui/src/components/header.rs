use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decorative marks placed either side of the application title.
pub const ACCENT: &str = "◆ ◇";

/// Dashboard header rendering four lines:
///
/// 1. Application title with accent decorations.
/// 2. A 60-column `=` separator.
/// 3. Series and timezone information in `[ a vs b | timezone ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    pub series_a: &'a str,
    pub series_b: &'a str,
    pub timezone: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    /// Number of terminal rows the header occupies.
    pub const HEIGHT: u16 = 4;

    pub fn new(series_a: &'a str, series_b: &'a str, timezone: &'a str, theme: &'a Theme) -> Self {
        Self {
            series_a,
            series_b,
            timezone,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            Line::from(vec![
                Span::styled(ACCENT, self.theme.header_accent),
                Span::styled(" ADMIN DASHBOARD ", self.theme.header),
                Span::styled(ACCENT, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.series_a, self.theme.series_a),
                Span::styled(" vs ", self.theme.label),
                Span::styled(self.series_b, self.theme.series_b),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.timezone, self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
