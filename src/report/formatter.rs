//! Output formatters: the two interchangeable renderings of a report.
//!
//! The reporter builds renderer-agnostic `Grid`s and hands them to an
//! `OutputFormatter`. `PlainText` draws fixed-width tables with `comfy_table`;
//! `Html` emits markup tables. Neither changes what is aggregated or ranked.

use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, CellAlignment, Color, Table};

use crate::config::RenderMode;

/// Shown for cells that have no matching records.
const ABSENT: &str = "-";

//==================================================================================
// 1. Renderer-agnostic grid
//==================================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    pub caption: Option<String>,
    pub headers: Vec<String>,
    /// `None` marks an undefined cell.
    pub rows: Vec<Vec<Option<String>>>,
}

impl Grid {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            caption: None,
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn push_row(&mut self, row: Vec<Option<String>>) {
        debug_assert_eq!(row.len(), self.headers.len(), "grid row width must match headers");
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

//==================================================================================
// 2. Formatter interface
//==================================================================================

pub trait OutputFormatter {
    fn heading(&self, text: &str) -> String;
    fn note(&self, text: &str) -> String;
    fn grid(&self, grid: &Grid) -> String;
}

impl RenderMode {
    /// Escape-free output, safe to write to files.
    pub fn formatter(self) -> Box<dyn OutputFormatter> {
        match self {
            RenderMode::Plain => Box::new(PlainText::new()),
            RenderMode::Html => Box::new(Html),
        }
    }

    /// Like [`RenderMode::formatter`], but plain text headings and notes are
    /// coloured for a terminal.
    pub fn terminal_formatter(self) -> Box<dyn OutputFormatter> {
        match self {
            RenderMode::Plain => Box::new(PlainText::colored()),
            RenderMode::Html => Box::new(Html),
        }
    }
}

//==================================================================================
// 3. Plain text (comfy_table)
//==================================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText {
    color: bool,
}

impl PlainText {
    pub fn new() -> Self {
        Self { color: false }
    }

    /// Bold headings, yellow notes and cyan table headers.
    pub fn colored() -> Self {
        Self { color: true }
    }
}

impl OutputFormatter for PlainText {
    fn heading(&self, text: &str) -> String {
        let heading = format!("== {}", text);
        if self.color {
            heading.bold().to_string()
        } else {
            heading
        }
    }

    fn note(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    fn grid(&self, grid: &Grid) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(grid.headers.iter().map(|h| {
                let cell = Cell::new(h);
                if self.color {
                    cell.fg(Color::Cyan)
                } else {
                    cell
                }
            }));
        for row in &grid.rows {
            table.add_row(row.iter().map(|cell| match cell {
                Some(text) if is_numeric(text) => Cell::new(text).set_alignment(CellAlignment::Right),
                Some(text) => Cell::new(text),
                None => Cell::new(ABSENT).set_alignment(CellAlignment::Center),
            }));
        }
        match &grid.caption {
            Some(caption) => format!("{}\n{}", caption, table),
            None => table.to_string(),
        }
    }
}

fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit() || c == '.')
}

//==================================================================================
// 4. Markup
//==================================================================================

pub struct Html;

impl OutputFormatter for Html {
    fn heading(&self, text: &str) -> String {
        format!("<h2>{}</h2>", escape(text))
    }

    fn note(&self, text: &str) -> String {
        format!("<p class=\"note\">{}</p>", escape(text))
    }

    fn grid(&self, grid: &Grid) -> String {
        let mut out = String::from("<table border=\"1\" class=\"dataframe\">\n");
        if let Some(caption) = &grid.caption {
            out.push_str(&format!("  <caption>{}</caption>\n", escape(caption)));
        }
        out.push_str("  <thead>\n    <tr>");
        for header in &grid.headers {
            out.push_str(&format!("<th>{}</th>", escape(header)));
        }
        out.push_str("</tr>\n  </thead>\n  <tbody>\n");
        for row in &grid.rows {
            out.push_str("    <tr>");
            for cell in row {
                let text = cell.as_deref().map(escape).unwrap_or_else(|| "NaN".to_string());
                out.push_str(&format!("<td>{}</td>", text));
            }
            out.push_str("</tr>\n");
        }
        out.push_str("  </tbody>\n</table>");
        out
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> Grid {
        let mut grid = Grid::new(["Mantissa Codec", "Delta", "Literal"]);
        grid.push_row(vec![Some("[1, 2]".to_string()), Some("80".to_string()), None]);
        grid.push_row(vec![Some("<raw>".to_string()), Some("7".to_string()), Some("9".to_string())]);
        grid
    }

    #[test]
    fn test_plain_grid_contains_cells_and_absent_marker() {
        let text = PlainText::new().grid(&sample_grid());
        assert!(text.contains("Mantissa Codec"));
        assert!(text.contains("[1, 2]"));
        assert!(text.contains("80"));
        assert!(text.contains(ABSENT));
    }

    #[test]
    fn test_html_grid_escapes_and_marks_absent() {
        let html = Html.grid(&sample_grid().with_caption("GZip"));
        assert!(html.starts_with("<table"));
        assert!(html.contains("<caption>GZip</caption>"));
        assert!(html.contains("<th>Mantissa Codec</th>"));
        assert!(html.contains("<td>NaN</td>"));
        assert!(html.contains("&lt;raw&gt;"));
        assert_eq!(html.matches("<tr>").count(), 3);
    }

    #[test]
    fn test_render_mode_selects_formatter() {
        let grid = sample_grid();
        assert!(RenderMode::Html.formatter().grid(&grid).contains("<table"));
        assert!(!RenderMode::Plain.formatter().grid(&grid).contains("<table"));
        assert!(RenderMode::Html.formatter().heading("x").starts_with("<h2>"));
    }

    #[test]
    fn test_library_plain_output_has_no_escape_codes() {
        let formatter = RenderMode::Plain.formatter();
        assert_eq!(formatter.heading("Baselines"), "== Baselines");
        assert_eq!(formatter.note("2 of 3 rows kept"), "2 of 3 rows kept");
        assert!(!formatter.grid(&sample_grid()).contains('\x1b'));
    }
}
