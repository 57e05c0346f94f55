//! Ratatui-based terminal dashboard.
//!
//! The TUI provides a filter panel (date range, store multi-select, holiday
//! mode) and renders KPI cards plus four tabs: the sales trend, per-store
//! totals, the linear forecast, and the filtered rows. Every filter change
//! reruns the full dashboard pipeline synchronously.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Days, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, Paragraph, Row, Table, Tabs},
    Terminal,
};
use tracing::debug;

use crate::analysis::trend_series;
use crate::app::pipeline::{run_dashboard, DashboardOutput};
use crate::domain::{DashboardConfig, FilterParams, ForecastScope, SalesTable, StoreId, TrendPoint};
use crate::error::AppError;
use crate::report::fmt_money;

mod plotters_chart;

use plotters_chart::{compact_money, SalesPlottersChart};

/// Snapshot path used by `e` when no `--export-json` was given.
const DEFAULT_SNAPSHOT: &str = "sales_snapshot.json";

/// Start the TUI.
pub fn run(config: DashboardConfig) -> Result<(), AppError> {
    // Load before touching the terminal so load errors print normally.
    let table = crate::io::load(&config.csv_path)?;
    let mut app = App::new(table, config);

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Trends,
    Stores,
    Forecast,
    Data,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Trends, Tab::Stores, Tab::Forecast, Tab::Data];

    fn title(self) -> &'static str {
        match self {
            Tab::Trends => "Trends",
            Tab::Stores => "Stores",
            Tab::Forecast => "Forecast",
            Tab::Data => "Data",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Start,
    End,
    Stores,
    Holiday,
}

const FIELDS: [Field; 4] = [Field::Start, Field::End, Field::Stores, Field::Holiday];

struct App {
    table: SalesTable,
    /// Every store in the file, in natural order.
    all_stores: Vec<StoreId>,
    /// Unfiltered trend, shown on the forecast tab for full-history fits.
    full_trend: Vec<TrendPoint>,
    config: DashboardConfig,
    params: FilterParams,
    output: DashboardOutput,
    tab: Tab,
    selected_field: usize,
    store_cursor: usize,
    editing_date: bool,
    date_input: String,
    data_scroll: usize,
    status: String,
}

impl App {
    fn new(table: SalesTable, config: DashboardConfig) -> Self {
        let params = config.filter_params(&table);
        let output = run_dashboard(&table, &params, &config.forecast);
        let all_stores: Vec<StoreId> = table.stores().into_iter().collect();
        let full_trend = trend_series(&table);
        let status = format!("Loaded {} rows from {}", table.len(), config.csv_path.display());
        Self {
            table,
            all_stores,
            full_trend,
            config,
            params,
            output,
            tab: Tab::Trends,
            selected_field: 0,
            store_cursor: 0,
            editing_date: false,
            date_input: String::new(),
            data_scroll: 0,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn field(&self) -> Field {
        FIELDS[self.selected_field]
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        if self.editing_date {
            return Ok(self.handle_date_edit(code));
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.prev(),
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field + 1 < FIELDS.len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => {
                if matches!(self.field(), Field::Start | Field::End) {
                    self.editing_date = true;
                    self.date_input.clear();
                    self.status =
                        "Editing date (YYYY-MM-DD or DD-MM-YYYY). Enter to apply, empty resets, Esc cancels."
                            .to_string();
                }
            }
            KeyCode::Char(' ') => {
                if self.field() == Field::Stores {
                    self.toggle_store();
                }
            }
            KeyCode::Char('a') => {
                self.params.stores = self.all_stores.iter().cloned().collect();
                self.recompute("All stores selected.");
            }
            KeyCode::Char('n') => {
                self.params.stores.clear();
                self.recompute("No stores selected.");
            }
            KeyCode::Char('r') => {
                self.params = FilterParams::everything(&self.table);
                self.recompute("Filters reset.");
            }
            KeyCode::Char('f') => {
                self.config.forecast.scope = match self.config.forecast.scope {
                    ForecastScope::Full => ForecastScope::Filtered,
                    ForecastScope::Filtered => ForecastScope::Full,
                };
                let msg = format!("Forecast fitted on {} data.", scope_name(self.config.forecast.scope));
                self.recompute(&msg);
            }
            KeyCode::Char('j') | KeyCode::PageDown => {
                let max = self.output.filtered.len().saturating_sub(1);
                self.data_scroll = (self.data_scroll + 10).min(max);
            }
            KeyCode::Char('k') | KeyCode::PageUp => {
                self.data_scroll = self.data_scroll.saturating_sub(10);
            }
            KeyCode::Char('e') => self.export_snapshot(),
            _ => {}
        }

        Ok(false)
    }

    fn handle_date_edit(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Esc => {
                self.editing_date = false;
                self.status = "Date edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing_date = false;
                self.apply_date_input();
            }
            KeyCode::Backspace => {
                self.date_input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || matches!(c, '-' | '/' | '.') {
                    self.date_input.push(c);
                }
            }
            _ => {}
        }
        false
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.field() {
            Field::Start => {
                self.params.start = shift_week(self.params.start, delta);
                let msg = format!("start: {}", self.params.start);
                self.recompute(&msg);
            }
            Field::End => {
                self.params.end = shift_week(self.params.end, delta);
                let msg = format!("end: {}", self.params.end);
                self.recompute(&msg);
            }
            Field::Stores => {
                let n = self.all_stores.len();
                if n > 0 {
                    self.store_cursor = if delta >= 0 {
                        (self.store_cursor + 1) % n
                    } else {
                        (self.store_cursor + n - 1) % n
                    };
                }
            }
            Field::Holiday => {
                self.params.holiday = if delta >= 0 {
                    self.params.holiday.next()
                } else {
                    self.params.holiday.prev()
                };
                let msg = format!("holiday: {}", self.params.holiday.display_name());
                self.recompute(&msg);
            }
        }
    }

    fn toggle_store(&mut self) {
        let Some(store) = self.all_stores.get(self.store_cursor).cloned() else {
            return;
        };
        let msg = if self.params.stores.remove(&store) {
            format!("Store {store} removed.")
        } else {
            self.params.stores.insert(store.clone());
            format!("Store {store} added.")
        };
        self.recompute(&msg);
    }

    fn apply_date_input(&mut self) {
        let trimmed = self.date_input.trim();
        let field = self.field();
        let date = if trimmed.is_empty() {
            let full = FilterParams::everything(&self.table);
            if field == Field::Start { full.start } else { full.end }
        } else {
            match crate::io::parse_date(trimmed) {
                Some(d) => d,
                None => {
                    self.status = format!("Invalid date '{trimmed}'");
                    return;
                }
            }
        };

        match field {
            Field::Start => self.params.start = date,
            Field::End => self.params.end = date,
            _ => return,
        }
        let msg = format!("{}: {date}", if field == Field::Start { "start" } else { "end" });
        self.recompute(&msg);
    }

    fn recompute(&mut self, status: &str) {
        self.output = run_dashboard(&self.table, &self.params, &self.config.forecast);
        self.data_scroll = self.data_scroll.min(self.output.filtered.len().saturating_sub(1));
        debug!(rows = self.output.filtered.len(), "tui recomputed");
        self.status = status.to_string();
    }

    fn export_snapshot(&mut self) {
        let path = self
            .config
            .export_json
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT));
        self.status = match crate::io::write_snapshot_json(&path, &self.output) {
            Ok(()) => format!("Wrote snapshot: {}", path.display()),
            Err(err) => format!("Export failed: {err}"),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_kpis(frame, chunks[0]);
        self.draw_tabs(frame, chunks[1]);
        self.draw_body(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_kpis(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)])
            .split(area);

        let (total, avg, top) = match &self.output.kpis {
            Ok(k) => (
                fmt_money(k.total_sales, 0),
                fmt_money(k.avg_sales, 2),
                format!("Store {} ({})", k.top_store, fmt_money(k.top_store_sales, 0)),
            ),
            Err(e) => (e.to_string(), "-".to_string(), "-".to_string()),
        };

        for (rect, (title, value)) in cards.iter().zip([
            ("Total Sales", total),
            ("Average Weekly Sales", avg),
            ("Top Performing Store", top),
        ]) {
            let p = Paragraph::new(Line::from(Span::styled(
                value,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )))
            .block(Block::default().title(title).borders(Borders::ALL));
            frame.render_widget(p, *rect);
        }
    }

    fn draw_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.title())).collect();
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White));
        frame.render_widget(tabs, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(32), Constraint::Min(0)])
            .split(area);

        self.draw_filters(frame, chunks[0]);
        match self.tab {
            Tab::Trends => self.draw_trend(frame, chunks[1]),
            Tab::Stores => self.draw_stores(frame, chunks[1]),
            Tab::Forecast => self.draw_forecast(frame, chunks[1]),
            Tab::Data => self.draw_data(frame, chunks[1]),
        }
    }

    fn draw_filters(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(0)])
            .split(area);

        let start = if self.editing_date && self.field() == Field::Start {
            format!("{}_", self.date_input)
        } else {
            self.params.start.to_string()
        };
        let end = if self.editing_date && self.field() == Field::End {
            format!("{}_", self.date_input)
        } else {
            self.params.end.to_string()
        };

        let items = vec![
            ListItem::new(format!("Start: {start}")),
            ListItem::new(format!("End: {end}")),
            ListItem::new(format!("Stores: {}/{}", self.params.stores.len(), self.all_stores.len())),
            ListItem::new(format!("Holiday: {}", self.params.holiday.display_name())),
        ];
        let list = List::new(items)
            .block(Block::default().title("Filters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, chunks[0], &mut state);

        let stores: Vec<ListItem> = self
            .all_stores
            .iter()
            .map(|s| {
                let mark = if self.params.stores.contains(s) { "[x]" } else { "[ ]" };
                ListItem::new(format!("{mark} Store {s}"))
            })
            .collect();
        let store_list = List::new(stores)
            .block(Block::default().title("Stores (space toggles)").borders(Borders::ALL))
            .highlight_style(if self.field() == Field::Stores {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            });
        let mut state = ratatui::widgets::ListState::default();
        if !self.all_stores.is_empty() {
            state.select(Some(self.store_cursor));
        }
        frame.render_stateful_widget(store_list, chunks[1], &mut state);
    }

    fn draw_trend(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(format!("Sales trend ({} weeks)", self.output.trend.len()))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);
        frame.render_widget(SalesPlottersChart::new(&self.output.trend, None), inner);
    }

    fn draw_stores(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Sales by store").borders(Borders::ALL);
        if self.output.store_sales.is_empty() {
            let msg = Paragraph::new("No rows match the current filters.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        }

        let bars: Vec<Bar> = self
            .output
            .store_sales
            .iter()
            .map(|s| {
                Bar::default()
                    .value(s.value.max(0.0).round() as u64)
                    .label(Line::from(s.store.to_string()))
                    .text_value(compact_money(s.value))
            })
            .collect();
        let chart = BarChart::default()
            .block(block)
            .data(BarGroup::default().bars(&bars))
            .bar_width(6)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
        frame.render_widget(chart, area);
    }

    fn draw_forecast(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(34)])
            .split(area);

        let scope = self.config.forecast.scope;
        let history = match scope {
            ForecastScope::Full => &self.full_trend,
            ForecastScope::Filtered => &self.output.trend,
        };

        let block = Block::default()
            .title(format!(
                "Forecast: next {} weeks ({} data)",
                self.config.forecast.horizon,
                scope_name(scope)
            ))
            .borders(Borders::ALL);
        let inner = block.inner(chunks[0]);
        frame.render_widget(block, chunks[0]);
        frame.render_widget(Clear, inner);

        let table_block = Block::default().title("Predicted").borders(Borders::ALL);
        match &self.output.forecast {
            Ok(fc) => {
                frame.render_widget(SalesPlottersChart::new(history, Some(fc.points.as_slice())), inner);

                let rows: Vec<Row> = fc
                    .points
                    .iter()
                    .map(|p| Row::new(vec![p.date.to_string(), fmt_money(p.predicted, 0)]))
                    .collect();
                let table = Table::new(rows, [Constraint::Length(11), Constraint::Min(10)])
                    .header(
                        Row::new(vec!["date", "predicted"])
                            .style(Style::default().add_modifier(Modifier::BOLD)),
                    )
                    .block(table_block.title_bottom(format!(
                        "slope {}/wk",
                        fmt_money(fc.trend.slope, 0)
                    )));
                frame.render_widget(table, chunks[1]);
            }
            Err(err) => {
                frame.render_widget(SalesPlottersChart::new(history, None), inner);
                let msg = Paragraph::new(format!("Forecast unavailable: {err}"))
                    .style(Style::default().fg(Color::Yellow))
                    .block(table_block);
                frame.render_widget(msg, chunks[1]);
            }
        }
    }

    fn draw_data(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let records = self.output.filtered.records();
        let visible = area.height.saturating_sub(3) as usize;
        let start = self.data_scroll.min(records.len());
        let end = (start + visible).min(records.len());

        let mut header = vec!["Store".to_string(), "Date".to_string(), "Weekly_Sales".to_string(), "Holiday".to_string()];
        header.extend(self.table.extra_columns().iter().cloned());
        let mut widths = vec![
            Constraint::Length(7),
            Constraint::Length(11),
            Constraint::Length(14),
            Constraint::Length(8),
        ];
        widths.extend(self.table.extra_columns().iter().map(|_| Constraint::Length(12)));

        let rows: Vec<Row> = records[start..end]
            .iter()
            .map(|r| {
                let mut cells = vec![
                    r.store.to_string(),
                    r.date.to_string(),
                    format!("{:.2}", r.weekly_sales),
                    u8::from(r.holiday_flag).to_string(),
                ];
                cells.extend(r.extras.iter().cloned());
                Row::new(cells)
            })
            .collect();

        let table = Table::new(rows, widths)
            .header(Row::new(header).style(Style::default().add_modifier(Modifier::BOLD)))
            .block(
                Block::default()
                    .title(format!("Rows {}-{} of {}", start.min(end) + usize::from(end > 0), end, records.len()))
                    .borders(Borders::ALL),
            );
        frame.render_widget(table, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab view  ↑/↓ field  ←/→ adjust  Enter date  space store  a/n all/none  f scope  r reset  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn shift_week(date: NaiveDate, delta: i32) -> NaiveDate {
    let shifted = if delta >= 0 {
        date.checked_add_days(Days::new(7))
    } else {
        date.checked_sub_days(Days::new(7))
    };
    shifted.unwrap_or(date)
}

fn scope_name(scope: ForecastScope) -> &'static str {
    match scope {
        ForecastScope::Full => "full",
        ForecastScope::Filtered => "filtered",
    }
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::domain::{ForecastConfig, HolidayMode, SalesRecord};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn app() -> App {
        let mut records = Vec::new();
        for week in 0..6u64 {
            for (store, base) in [("1", 1000.0), ("2", 400.0), ("3", 700.0)] {
                records.push(SalesRecord {
                    store: StoreId::from(store),
                    date: ymd(2010, 2, 5) + Days::new(7 * week),
                    weekly_sales: base + 10.0 * week as f64,
                    holiday_flag: week == 1,
                    extras: vec!["42.3".to_string()],
                });
            }
        }
        let table = SalesTable::new(vec!["Temperature".to_string()], records);
        let config = DashboardConfig {
            csv_path: PathBuf::from("memory.csv"),
            start: None,
            end: None,
            stores: Vec::new(),
            holiday: HolidayMode::All,
            forecast: ForecastConfig::default(),
            top_n: 10,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_trend: None,
            export_stores: None,
            export_forecast: None,
            export_json: None,
        };
        App::new(table, config)
    }

    fn press(app: &mut App, codes: &[KeyCode]) {
        for code in codes {
            assert!(!app.handle_key(*code).unwrap());
        }
    }

    #[test]
    fn starts_with_everything_selected() {
        let app = app();
        assert_eq!(app.output.filtered.len(), 18);
        assert_eq!(app.params.stores.len(), 3);
        assert!(app.output.forecast.is_ok());
    }

    #[test]
    fn store_toggle_recomputes() {
        let mut app = app();
        // Move to the Stores field, step to store "2", and remove it.
        press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Right, KeyCode::Char(' ')]);
        assert!(!app.params.stores.contains(&StoreId::from("2")));
        assert_eq!(app.output.filtered.len(), 12);

        press(&mut app, &[KeyCode::Char('n')]);
        assert!(app.output.filtered.is_empty());
        // KPIs stay on the full history.
        assert!(app.output.kpis.is_ok());

        press(&mut app, &[KeyCode::Char('a')]);
        assert_eq!(app.output.filtered.len(), 18);
    }

    #[test]
    fn holiday_and_date_adjustments() {
        let mut app = app();
        press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Down, KeyCode::Right]);
        assert_eq!(app.params.holiday, HolidayMode::HolidayOnly);
        assert_eq!(app.output.filtered.len(), 3);

        press(&mut app, &[KeyCode::Char('r'), KeyCode::Up, KeyCode::Up, KeyCode::Up, KeyCode::Right]);
        assert_eq!(app.params.start, ymd(2010, 2, 12));
        assert_eq!(app.output.trend.len(), 5);
    }

    #[test]
    fn typed_dates_accept_day_first_and_reset_when_empty() {
        let mut app = app();
        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
        assert!(app.editing_date);
        for c in "26-02-2010".chars() {
            press(&mut app, &[KeyCode::Char(c)]);
        }
        press(&mut app, &[KeyCode::Enter]);
        assert!(!app.editing_date);
        assert_eq!(app.params.end, ymd(2010, 2, 26));
        assert_eq!(app.output.trend.len(), 4);

        press(&mut app, &[KeyCode::Enter, KeyCode::Enter]);
        assert_eq!(app.params.end, ymd(2010, 3, 12));
    }

    #[test]
    fn invalid_typed_date_keeps_filters() {
        let mut app = app();
        let before = app.params.clone();
        press(&mut app, &[KeyCode::Enter, KeyCode::Char('9'), KeyCode::Enter]);
        assert_eq!(app.params, before);
        assert!(app.status.starts_with("Invalid date"));
    }

    #[test]
    fn scope_toggle_switches_forecast_input() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('n')]);
        assert!(app.output.forecast.is_ok());
        press(&mut app, &[KeyCode::Char('f')]);
        assert_eq!(app.config.forecast.scope, ForecastScope::Filtered);
        assert!(app.output.forecast.is_err());
    }

    #[test]
    fn export_writes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.json");
        let mut app = app();
        app.config.export_json = Some(path.clone());
        press(&mut app, &[KeyCode::Char('e')]);
        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["rows"], 18);
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
        assert!(app.handle_key(KeyCode::Esc).unwrap());
    }

    #[test]
    fn non_chart_tabs_draw_on_a_test_backend() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        for tab in [Tab::Stores, Tab::Data] {
            app.tab = tab;
            terminal.draw(|f| app.draw(f)).unwrap();
        }
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Total Sales"));
        assert!(text.contains("Rows 1-"));
    }
}
