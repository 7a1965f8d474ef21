//! Ratatui-based terminal dashboard.
//!
//! The dashboard shows the two KPI figures, the daily sales chart, and two
//! editable date fields. `r` (or `l`) reloads the selected range.

use std::io;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};
use tracing::{debug, info};

use crate::app::pipeline::{LoadOutput, LoadPhase, Loader};
use crate::config::resolve_range;
use crate::dashboard::DashboardView;
use crate::dashboard::chart::{X_AXIS_LABEL, Y_AXIS_LABEL};
use crate::domain::{DateRange, format_ymd};
use crate::error::AppError;
use crate::report::format_grouped;

mod plotters_chart;

use plotters_chart::{SalesPlottersChart, short_date};

/// Start the TUI with the initial range already resolved.
pub fn run(loader: Loader, range: DateRange) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(loader, range);
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

const FIELD_START: usize = 0;
const FIELD_END: usize = 1;

struct App {
    loader: Loader,
    view: DashboardView,
    /// Date inputs as typed (`YYYY-MM-DD`); empty means "use the default".
    inputs: [String; 2],
    selected_field: usize,
    editing: bool,
    edit_buffer: String,
    phase: LoadPhase,
    status: String,
    load_requested: bool,
    last: Option<LoadOutput>,
}

impl App {
    fn new(loader: Loader, range: DateRange) -> Self {
        Self {
            loader,
            view: DashboardView::default(),
            inputs: [format_ymd(range.start()), format_ymd(range.end())],
            selected_field: FIELD_START,
            editing: false,
            edit_buffer: String::new(),
            phase: LoadPhase::Fetching,
            status: "Loading...".to_string(),
            // Initial load, like a page load.
            load_requested: true,
            last: None,
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

            if self.load_requested {
                self.run_pending_load(today(), drain_pending_events)?;
                needs_redraw = true;
                continue;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
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

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing {
            self.handle_date_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.selected_field = FIELD_START,
            KeyCode::Down => self.selected_field = FIELD_END,
            KeyCode::Enter => {
                self.editing = true;
                self.edit_buffer = self.inputs[self.selected_field].clone();
                self.status = "Editing date (YYYY-MM-DD, empty = default). Enter to apply, Esc to cancel.".to_string();
            }
            KeyCode::Char('r') | KeyCode::Char('l') => {
                self.request_load();
            }
            _ => {}
        }
        false
    }

    fn handle_date_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing = false;
                self.status = "Date edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing = false;
                self.inputs[self.selected_field] = self.edit_buffer.trim().to_string();
                self.request_load();
            }
            KeyCode::Backspace => {
                self.edit_buffer.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '-' {
                    self.edit_buffer.push(c);
                }
            }
            _ => {}
        }
    }

    fn request_load(&mut self) {
        self.load_requested = true;
        self.phase = LoadPhase::Fetching;
        self.status = "Loading...".to_string();
    }

    /// Run the requested cycle, then drop triggers pressed while it was in
    /// flight.
    fn run_pending_load(
        &mut self,
        today: NaiveDate,
        drain: impl FnOnce() -> Result<usize, AppError>,
    ) -> Result<(), AppError> {
        self.load_requested = false;
        self.reload(today);
        let dropped = drain()?;
        if dropped > 0 {
            debug!(dropped, "discarded input received during load");
        }
        Ok(())
    }

    /// One load cycle for the current inputs.
    fn reload(&mut self, today: NaiveDate) {
        let range = match resolve_range(Some(self.inputs[FIELD_START].as_str()), Some(self.inputs[FIELD_END].as_str()), today) {
            Ok(range) => range,
            Err(err) => {
                self.view.show_error(err.to_string());
                self.status = "Fix the dates and reload.".to_string();
                self.phase = LoadPhase::Idle;
                return;
            }
        };

        // Empty inputs are shown with the dates they resolved to.
        self.inputs = [format_ymd(range.start()), format_ymd(range.end())];

        let mut phase = LoadPhase::Idle;
        let result = self.loader.load(&mut self.view, &range, &mut |p| {
            info!(phase = p.display_name(), "load phase");
            phase = p;
        });
        self.phase = phase;

        match result {
            Ok(out) => {
                self.status = format!(
                    "Loaded {} days via {} ({} records).",
                    out.series.len(),
                    out.transport.display_name(),
                    out.records_seen
                );
                self.last = Some(out);
            }
            Err(err) => {
                self.status = err.to_string();
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("sales", Style::default().fg(Color::Cyan)),
            Span::raw(" - daily sales dashboard"),
        ]));

        let range = self
            .last
            .as_ref()
            .map(|o| o.range.to_string())
            .unwrap_or_else(|| "-".to_string());
        let source = self
            .last
            .as_ref()
            .map(|o| o.transport.display_name())
            .unwrap_or("-");
        lines.push(Line::from(Span::styled(
            format!("range: {range} | source: {source} | state: {}", self.phase.display_name()),
            Style::default().fg(Color::Gray),
        )));

        let kpi_style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        lines.push(Line::from(vec![
            Span::raw("Total orders: "),
            Span::styled(self.view.kpis.total_orders.clone(), kpi_style),
            Span::raw("   Total sales: "),
            Span::styled(self.view.kpis.total_sales.clone(), kpi_style),
        ]));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(4)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(crate::dashboard::chart::CHART_TITLE)
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(handle) = self.view.chart() else {
            let msg = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let chart = handle.chart();
        let points = chart.clipped_points();

        let (chart_rect, insets) = chart_layout(inner);
        let widget = SalesPlottersChart {
            chart,
            points: &points,
            x_label: X_AXIS_LABEL,
            y_label: Y_AXIS_LABEL,
            fmt_y: fmt_axis_millions,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, chart);
        }
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let shown = |field: usize| {
            if self.editing && self.selected_field == field {
                format!("{}_", self.edit_buffer)
            } else if self.inputs[field].is_empty() {
                "(default)".to_string()
            } else {
                self.inputs[field].clone()
            }
        };

        let items = vec![
            ListItem::new(format!("Start: {}", shown(FIELD_START))),
            ListItem::new(format!("End:   {}", shown(FIELD_END))),
        ];

        let list = List::new(items)
            .block(Block::default().title("Range").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  Enter edit date  r reload  q quit";
        let mut spans = vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
        ];
        match &self.view.message {
            Some(message) => spans.push(Span::styled(
                message.as_str(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            None => spans.push(Span::styled(&self.status, Style::default().fg(Color::Yellow))),
        }
        let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn drain_pending_events() -> Result<usize, AppError> {
    drain_queued(|| event::poll(Duration::ZERO), event::read)
}

/// Read and discard events while `poll` reports more; returns how many.
fn drain_queued(
    mut poll: impl FnMut() -> io::Result<bool>,
    mut read: impl FnMut() -> io::Result<Event>,
) -> Result<usize, AppError> {
    let mut dropped = 0;
    while poll().map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
        read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))?;
        dropped += 1;
    }
    Ok(dropped)
}

/// Y tick label in millions: `2500000` → `2,5M`.
fn fmt_axis_millions(v: f64) -> String {
    format!("{}M", format_grouped(v / 1_000_000.0))
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 3,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    sales: &crate::dashboard::SalesChart,
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);
    let x_bounds = sales.x_bounds();
    let y_bounds = sales.y_bounds;

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let label = short_date(sales.label_at(x_val)).to_string();
        if label.is_empty() {
            continue;
        }
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label_len = label.len() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_axis_millions(y_val);
        let label_len = label.chars().count() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new(X_AXIS_LABEL)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("FCFA")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::Rc;

    use crossterm::event::{KeyEvent, KeyModifiers};
    use serde_json::{Value, json};

    use crate::data::SalesSource;
    use crate::domain::TransportKind;
    use crate::error::FetchError;

    struct CountingSource {
        calls: Rc<Cell<usize>>,
    }

    impl SalesSource for CountingSource {
        fn kind(&self) -> TransportKind {
            TransportKind::Direct
        }

        fn fetch(&self, _range: &DateRange) -> Result<Value, FetchError> {
            self.calls.set(self.calls.get() + 1);
            Ok(json!({"daily": [{"date": "2025-09-01", "sales": 5}], "totalOrders": 1}))
        }
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn reload_presses_during_a_load_are_dropped() {
        let calls = Rc::new(Cell::new(0));
        let loader = Loader::new(Box::new(CountingSource { calls: calls.clone() }), None);
        let today = NaiveDate::from_ymd_opt(2025, 9, 2).unwrap();
        let range = DateRange::new(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(), today).unwrap();
        let mut app = App::new(loader, range);

        // Three reload presses queued while the request is in flight.
        let queue = RefCell::new(VecDeque::from([key('r'), key('r'), key('l')]));
        let dropped = Cell::new(0);
        app.run_pending_load(today, || {
            let n = drain_queued(
                || Ok(!queue.borrow().is_empty()),
                || Ok(queue.borrow_mut().pop_front().unwrap()),
            )?;
            dropped.set(n);
            Ok(n)
        })
        .unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(dropped.get(), 3);
        assert!(queue.borrow().is_empty());
        assert!(!app.load_requested);
        assert_eq!(app.view.kpis.total_orders, "1");
        assert_eq!(app.view.chart().map(|c| c.generation()), Some(1));
    }

    #[test]
    fn drain_stops_at_read_errors() {
        let err = drain_queued(|| Ok(true), || Err(io::Error::other("gone"))).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn axis_ticks_in_millions() {
        assert_eq!(fmt_axis_millions(0.0), "0M");
        assert_eq!(fmt_axis_millions(2_500_000.0), "2,5M");
        assert_eq!(fmt_axis_millions(10_000_000.0), "10M");
    }

    #[test]
    fn layout_reserves_axis_space_only_when_it_fits() {
        let big = Rect { x: 0, y: 0, width: 80, height: 20 };
        let (rect, insets) = chart_layout(big);
        assert!(insets.is_some());
        assert_eq!(rect.width, 80 - 8 - 3);

        let tiny = Rect { x: 0, y: 0, width: 15, height: 6 };
        let (rect, insets) = chart_layout(tiny);
        assert!(insets.is_none());
        assert_eq!(rect, tiny);
    }
}
