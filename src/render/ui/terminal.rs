//! Terminal UI implementation using ratatui
//!
//! Draws the dashboard: a header with the match summary, a sidebar with the filter controls,
//! and a main area with the preview table, the two charts and the term cloud. All data comes in
//! through [`ViewState`] and [`Snapshot`]; this type only owns the terminal handle.

use crate::data::dates::format_publish_time;
use crate::error::{CordexError, Result};
use crate::pipeline::Snapshot;
use crate::render::ui::state::{Focus, ViewState};
use crate::render::ui::theme::ColorTheme;
use crate::render::ui::UIRenderer;
use ratatui::crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row,
        Table, Wrap,
    },
    Frame, Terminal,
};
use std::io::{self, Stdout};

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

const SIDEBAR_WIDTH: u16 = 34;
const SOURCE_LABEL_WIDTH: usize = 24;
const ABSTRACT_CELL_WIDTH: usize = 80;

pub const EMPTY_PREVIEW: &str = "No papers match the current filters.";
pub const EMPTY_YEAR_CHART: &str = "No data to display for Year chart.";
pub const EMPTY_SOURCE_CHART: &str = "No data to display for Journals chart.";
pub const EMPTY_CLOUD_VIEW: &str = "No data to display for Word Cloud.";
pub const EMPTY_CLOUD_TITLES: &str = "No titles available to generate a word cloud.";

/// Terminal dashboard with ratatui backend
pub struct TerminalUI {
    terminal: Option<CrosstermTerminal>,
    theme: ColorTheme,
    cloud_terms: usize,
}

impl TerminalUI {
    pub fn new(cloud_terms: usize) -> Self {
        Self::with_theme(ColorTheme::default(), cloud_terms)
    }

    pub fn with_theme(theme: ColorTheme, cloud_terms: usize) -> Self {
        Self {
            terminal: None,
            theme,
            cloud_terms,
        }
    }

    fn panel<'a>(title: &'a str, focused: bool, theme: &ColorTheme) -> Block<'a> {
        let block = Block::default().title(title).borders(Borders::ALL);
        if focused {
            block.border_style(theme.focus_border)
        } else {
            block
        }
    }

    fn placeholder<'a>(message: &'a str, block: Block<'a>, theme: &ColorTheme) -> Paragraph<'a> {
        Paragraph::new(Span::styled(message, theme.info_text)).block(block)
    }

    fn render_header(frame: &mut Frame, area: Rect, snapshot: &Snapshot<'_>, theme: &ColorTheme) {
        let lines = vec![
            Line::from(Span::styled("CORD-19 Interactive Explorer", theme.header)),
            Line::from(snapshot.summary_line()),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_sidebar(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(area);

        let keyword = match &view_state.status_line.keyword_prompt {
            Some(buffer) => Line::from(vec![
                Span::raw(buffer.as_str()),
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ]),
            None if view_state.keyword.is_empty() => {
                Line::from(Span::styled("(none)", theme.info_text))
            }
            None => Line::from(view_state.keyword.as_str()),
        };
        let editing = view_state.status_line.is_editing();
        frame.render_widget(
            Paragraph::new(keyword).block(Self::panel("Keyword", editing, theme)),
            chunks[0],
        );

        frame.render_widget(
            Paragraph::new(view_state.year_label()).block(Self::panel("Years", false, theme)),
            chunks[1],
        );

        let focused = view_state.focus == Focus::Journals;
        let block = Self::panel("Journals", focused, theme);
        if view_state.journals.is_empty() {
            frame.render_widget(
                Self::placeholder("No journals in dataset.", block, theme),
                chunks[2],
            );
            return;
        }

        let items: Vec<ListItem> = view_state
            .journals
            .iter()
            .map(|journal| {
                let mark = if view_state.selected_journals.contains(journal) {
                    "[x]"
                } else {
                    "[ ]"
                };
                ListItem::new(format!("{mark} {journal}"))
            })
            .collect();

        let mut list = List::new(items).block(block);
        if focused {
            list = list.highlight_style(theme.selection);
        }
        let mut list_state = ListState::default();
        list_state.select(Some(view_state.journal_cursor));
        frame.render_stateful_widget(list, chunks[2], &mut list_state);
    }

    fn render_preview(
        frame: &mut Frame,
        area: Rect,
        view_state: &ViewState,
        snapshot: &Snapshot<'_>,
        theme: &ColorTheme,
    ) {
        let focused = view_state.focus == Focus::Preview;
        let block = Self::panel("Sample of Filtered Data", focused, theme);
        if snapshot.view.is_empty() {
            frame.render_widget(Self::placeholder(EMPTY_PREVIEW, block, theme), area);
            return;
        }

        let rows: Vec<Row> = snapshot
            .preview()
            .iter()
            .skip(view_state.preview_offset)
            .map(|record| {
                // abstracts can span lines; the row shows the start of the first one
                let abstract_text = record
                    .abstract_text()
                    .and_then(|text| text.lines().next())
                    .map(|line| truncate(line, ABSTRACT_CELL_WIDTH))
                    .unwrap_or_default();
                Row::new(vec![
                    Cell::from(record.title().unwrap_or("")),
                    Cell::from(abstract_text),
                    Cell::from(record.journal().unwrap_or("")),
                    Cell::from(
                        record
                            .publish_time
                            .as_ref()
                            .map(format_publish_time)
                            .unwrap_or_default(),
                    ),
                    Cell::from(record.year().map(|y| y.to_string()).unwrap_or_default()),
                ])
            })
            .collect();

        let header = Row::new(vec!["title", "abstract", "journal", "publish_time", "year"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(32),
                Constraint::Percentage(28),
                Constraint::Percentage(16),
                Constraint::Min(10),
                Constraint::Length(4),
            ],
        )
        .header(header)
        .block(block);
        frame.render_widget(table, area);
    }

    fn render_year_chart(
        frame: &mut Frame,
        area: Rect,
        snapshot: &Snapshot<'_>,
        theme: &ColorTheme,
    ) {
        let block = Self::panel("Publications by Year", false, theme);
        if snapshot.year_counts.is_empty() {
            frame.render_widget(Self::placeholder(EMPTY_YEAR_CHART, block, theme), area);
            return;
        }

        let bars: Vec<Bar> = snapshot
            .year_counts
            .iter()
            .map(|(year, count)| {
                Bar::default()
                    .value(count as u64)
                    .label(Line::from(year.to_string()))
            })
            .collect();

        let chart = BarChart::default()
            .block(block)
            .data(BarGroup::default().bars(&bars))
            .bar_width(5)
            .bar_gap(1)
            .bar_style(Style::default().fg(theme.year_bars));
        frame.render_widget(chart, area);
    }

    fn render_source_chart(
        frame: &mut Frame,
        area: Rect,
        snapshot: &Snapshot<'_>,
        theme: &ColorTheme,
    ) {
        let block = Self::panel("Top Journals", false, theme);
        if snapshot.top_sources.is_empty() {
            frame.render_widget(Self::placeholder(EMPTY_SOURCE_CHART, block, theme), area);
            return;
        }

        let bars: Vec<Bar> = snapshot
            .top_sources
            .iter()
            .map(|(journal, count)| {
                Bar::default()
                    .value(count as u64)
                    .label(Line::from(truncate(journal, SOURCE_LABEL_WIDTH)))
            })
            .collect();

        let chart = BarChart::default()
            .block(block)
            .direction(Direction::Horizontal)
            .data(BarGroup::default().bars(&bars))
            .bar_width(1)
            .bar_gap(0)
            .bar_style(Style::default().fg(theme.source_bars));
        frame.render_widget(chart, area);
    }

    fn render_cloud(
        frame: &mut Frame,
        area: Rect,
        snapshot: &Snapshot<'_>,
        cloud_terms: usize,
        theme: &ColorTheme,
    ) {
        let block = Self::panel("Title Terms", false, theme);
        if snapshot.view.is_empty() {
            frame.render_widget(Self::placeholder(EMPTY_CLOUD_VIEW, block, theme), area);
            return;
        }
        if snapshot.terms.is_empty() {
            frame.render_widget(Self::placeholder(EMPTY_CLOUD_TITLES, block, theme), area);
            return;
        }

        let top = snapshot.terms.top(cloud_terms);
        let max = top.first().map(|(_, count)| *count).unwrap_or(0);
        let mut spans = Vec::with_capacity(top.len() * 2);
        for (term, count) in top {
            spans.push(Span::styled(term, theme.cloud_style(count, max)));
            spans.push(Span::raw("  "));
        }

        let cloud = Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(cloud, area);
    }

    fn render_status(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
        let status_text = view_state
            .status_line
            .format_status_line(&view_state.source_name);
        let status_style = Style::default().bg(theme.status_bg).fg(theme.status_fg);
        frame.render_widget(Paragraph::new(status_text).style(status_style), area);
    }

    fn draw_dashboard(
        frame: &mut Frame,
        view_state: &ViewState,
        snapshot: &Snapshot<'_>,
        cloud_terms: usize,
        theme: &ColorTheme,
    ) {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(frame.size());

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(outer[1]);

        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(35),
                Constraint::Min(0),
            ])
            .split(body[1]);

        let charts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main[1]);

        Self::render_header(frame, outer[0], snapshot, theme);
        Self::render_sidebar(frame, body[0], view_state, theme);
        Self::render_preview(frame, main[0], view_state, snapshot, theme);
        Self::render_year_chart(frame, charts[0], snapshot, theme);
        Self::render_source_chart(frame, charts[1], snapshot, theme);
        Self::render_cloud(frame, main[2], snapshot, cloud_terms, theme);
        Self::render_status(frame, outer[2], view_state, theme);
    }
}

impl UIRenderer for TerminalUI {
    fn render(&mut self, view_state: &ViewState, snapshot: &Snapshot<'_>) -> Result<()> {
        if let Some(ref mut terminal) = self.terminal {
            // Extract before the closure to avoid borrowing self
            let theme = &self.theme;
            let cloud_terms = self.cloud_terms;

            terminal
                .draw(move |frame| {
                    Self::draw_dashboard(frame, view_state, snapshot, cloud_terms, theme)
                })
                .map_err(|e| CordexError::ui(format!("draw failed: {e}")))?;
        }
        Ok(())
    }

    fn initialize(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        self.terminal = Some(terminal);

        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.terminal.is_some() {
            disable_raw_mode()?;
            execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
            self.terminal = None;
        }
        Ok(())
    }

    fn get_terminal_size(&self) -> Result<(u16, u16)> {
        let (cols, rows) = ratatui::crossterm::terminal::size()?;
        Ok((cols, rows))
    }
}

impl Drop for TerminalUI {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Shorten `text` to at most `max` characters, marking the cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::data::Dataset;
    use crate::filter::FilterCriteria;
    use ratatui::backend::TestBackend;
    use ratatui::style::Color;

    fn draw(data: &Dataset, criteria: &FilterCriteria) -> String {
        let snapshot = Snapshot::compute(data, criteria, &Settings::default());
        let view_state = ViewState::new("test.csv", data, 120, 40);
        let theme = ColorTheme::default();

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal
            .draw(|frame| {
                TerminalUI::draw_dashboard(frame, &view_state, &snapshot, 40, &theme)
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_terminal_ui_creation() {
        let ui = TerminalUI::new(40);
        assert!(ui.terminal.is_none());
        assert_eq!(ui.theme.status_bg, Color::Blue);

        let ui = TerminalUI::with_theme(ColorTheme::monochrome(), 10);
        assert_eq!(ui.theme.status_bg, Color::Black);
        assert_eq!(ui.cloud_terms, 10);
    }

    #[test]
    fn dashboard_shows_summary_and_panels() {
        let data = Dataset::parse(
            b"title,journal,publish_time\n\
              Coronavirus spread,Nature,2020-03-01\n\
              Vaccine study,Science,2021-05-01\n",
        )
        .unwrap();
        let screen = draw(&data, &FilterCriteria::new());

        assert!(screen.contains("CORD-19 Interactive Explorer"));
        assert!(screen.contains("Showing 2 papers after applying filters."));
        assert!(screen.contains("Coronavirus spread"));
        assert!(screen.contains("2020"));
        assert!(screen.contains("[ ] Nature"));
        assert!(screen.contains("coronavirus"));
    }

    #[test]
    fn empty_view_shows_placeholders() {
        let data = Dataset::parse(b"title,journal,publish_time\nA,Nature,2020\n").unwrap();
        let screen = draw(&data, &FilterCriteria::new().with_keyword("zzz"));

        assert!(screen.contains("Showing 0 papers after applying filters."));
        assert!(screen.contains(EMPTY_PREVIEW));
        assert!(screen.contains(EMPTY_YEAR_CHART));
        assert!(screen.contains(EMPTY_SOURCE_CHART));
        assert!(screen.contains(EMPTY_CLOUD_VIEW));
    }

    #[test]
    fn untitled_matches_explain_missing_cloud() {
        let data = Dataset::parse(b"title,abstract\n,covid notes\n").unwrap();
        let screen = draw(&data, &FilterCriteria::new());
        assert!(screen.contains(EMPTY_CLOUD_TITLES));
    }

    #[test]
    fn preview_lists_abstract_and_year() {
        let data = Dataset::parse(
            b"title,abstract,journal,publish_time\n\
              Masks,\"Droplet spread\nsecond line\",BMJ,2020-05-01\n\
              Undated note,,Lancet,\n",
        )
        .unwrap();
        let screen = draw(&data, &FilterCriteria::new());

        assert!(screen.contains("abstract"));
        assert!(screen.contains("Droplet"));
        assert!(!screen.contains("second line"));
        assert!(screen.contains("2020-05-01"));
    }

    #[test]
    fn truncation_marks_the_cut() {
        assert_eq!(truncate("Nature", 10), "Nature");
        assert_eq!(truncate("Journal of Virology", 8), "Journal…");
    }
}
