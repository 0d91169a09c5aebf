//! Ratatui-based terminal dashboard.
//!
//! Summary cards on top, the status bar chart and traffic proportions in the
//! middle, daily sales at the bottom. All widgets are drawn from the
//! `ChartBoard` owned by `DashboardState`, so a refresh or period change
//! replaces every chart at once.

use std::io;
use std::time::Duration;

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
    widgets::{BarChart, Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::warn;

use crate::app::pipeline;
use crate::dashboard::{ChartSpec, ChartTarget, DashboardState};
use crate::data::SheetClient;
use crate::domain::PeriodFilter;
use crate::error::{AppError, EXIT_EXTERNAL};
use crate::report::{TIMESTAMP_FORMAT, format_brl, format_count, format_percent};

mod plotters_chart;

use plotters_chart::DailySalesChart;

const FG_LABEL: Color = Color::Rgb(158, 158, 158);
const FG_VALUE: Color = Color::Rgb(224, 224, 224);
const BAR_COLOR: Color = Color::Rgb(189, 189, 189);

/// Start the TUI.
pub fn run(client: SheetClient, period: PeriodFilter) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_EXTERNAL, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(client, period);
    app.refresh(&mut terminal)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::new(EXIT_EXTERNAL, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(EXIT_EXTERNAL, format!("Failed to enter alternate screen: {e}")));
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
enum KeyAction {
    None,
    Redraw,
    Refresh,
    Quit,
}

struct App {
    client: SheetClient,
    state: DashboardState,
    status: String,
    /// Last load failure; cleared by the next successful load.
    error: Option<String>,
}

impl App {
    fn new(client: SheetClient, period: PeriodFilter) -> Self {
        Self {
            client,
            state: DashboardState::new(period),
            status: String::new(),
            error: None,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                self.draw_now(terminal)?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_EXTERNAL, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_EXTERNAL, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match self.handle_key(key.code) {
                        KeyAction::Quit => break,
                        KeyAction::Refresh => {
                            self.refresh(terminal)?;
                            needs_redraw = true;
                        }
                        KeyAction::Redraw => needs_redraw = true,
                        KeyAction::None => {}
                    }
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> KeyAction {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') => KeyAction::Refresh,
            KeyCode::Right => {
                self.state.next_period();
                self.status = format!("period: {}", self.state.selected().display_name());
                KeyAction::Redraw
            }
            KeyCode::Left => {
                self.state.prev_period();
                self.status = format!("period: {}", self.state.selected().display_name());
                KeyAction::Redraw
            }
            KeyCode::Char('a') => {
                self.state.select(PeriodFilter::All);
                self.status = "period: all periods".to_string();
                KeyAction::Redraw
            }
            _ => KeyAction::None,
        }
    }

    /// Paint the loading state, then fetch and aggregate.
    ///
    /// A failed fetch leaves the previous dashboard on screen and reports
    /// the failure in the error banner.
    fn refresh<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        self.status = format!("Loading {} ...", self.client.source());
        self.draw_now(terminal)?;

        match pipeline::refresh(&self.client, &mut self.state) {
            Ok(()) => {
                self.error = None;
                self.status = match self.state.fetched_at() {
                    Some(ts) => format!("Updated {}", ts.format(TIMESTAMP_FORMAT)),
                    None => "Updated".to_string(),
                };
            }
            Err(err) => {
                warn!(error = %err, "refresh failed");
                self.status = "Refresh failed.".to_string();
                self.error = Some(err.to_string());
            }
        }
        Ok(())
    }

    fn draw_now<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        terminal
            .draw(|f| self.draw(f))
            .map_err(|e| AppError::new(EXIT_EXTERNAL, format!("Terminal draw error: {e}")))?;
        Ok(())
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        if self.state.result().is_some() {
            self.draw_body(frame, chunks[1]);
        } else {
            self.draw_placeholder(frame, chunks[1]);
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let updated = self
            .state
            .fetched_at()
            .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_else(|| "-".to_string());

        let mut spans = vec![
            Span::styled("leads", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
            Span::raw(" | sales dashboard"),
            Span::styled(
                format!(
                    " | period: {} | last update: {updated}",
                    self.state.selected().display_name()
                ),
                Style::default().fg(FG_LABEL),
            ),
        ];
        if let Some(err) = &self.error {
            spans.push(Span::styled(format!(" | {err}"), Style::default().fg(Color::Red)));
        }

        let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_placeholder(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let (msg, color) = match &self.error {
            Some(err) => (err.as_str(), Color::Red),
            None => ("Waiting for data...", Color::Yellow),
        };
        let p = Paragraph::new(msg)
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Percentage(45),
                Constraint::Min(0),
            ])
            .split(area);

        self.draw_cards(frame, rows[0]);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[1]);

        let charts = self.state.charts();
        if let Some(spec) = charts.get(ChartTarget::Status) {
            draw_bar_chart(frame, middle[0], spec);
        }
        if let Some(spec) = charts.get(ChartTarget::Traffic) {
            draw_proportions(frame, middle[1], spec);
        }
        if let Some(spec) = charts.get(ChartTarget::DailyRevenue) {
            draw_line_chart(frame, rows[2], spec);
        }
    }

    fn draw_cards(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(result) = self.state.result() else {
            return;
        };

        let cards = [
            ("Total sales", format_brl(result.total_revenue)),
            ("Closed", format_count(result.total_closed)),
            ("Leads", format_count(result.total_leads)),
            ("Conversion", format_percent(result.conversion_rate)),
            ("Average ticket", format_brl(result.average_ticket)),
        ];

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, cards.len() as u32); 5])
            .split(area);

        for ((label, value), rect) in cards.into_iter().zip(cols.iter()) {
            let text = Text::from(vec![Line::from(Span::styled(
                value,
                Style::default().fg(FG_VALUE).add_modifier(Modifier::BOLD),
            ))]);
            let p = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .title(Span::styled(label, Style::default().fg(FG_LABEL)))
                        .borders(Borders::ALL),
                );
            frame.render_widget(p, *rect);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ period  a all periods  r refresh  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn chart_block(spec: &ChartSpec) -> Block<'_> {
    Block::default().title(spec.label.as_str()).borders(Borders::ALL)
}

fn draw_empty(frame: &mut ratatui::Frame<'_>, area: Rect) {
    let msg = Paragraph::new("No data for this period.").style(Style::default().fg(FG_LABEL));
    frame.render_widget(msg, area);
}

fn draw_bar_chart(frame: &mut ratatui::Frame<'_>, area: Rect, spec: &ChartSpec) {
    let block = chart_block(spec);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    if spec.is_empty() {
        draw_empty(frame, inner);
        return;
    }

    let data: Vec<(&str, u64)> = spec
        .points
        .iter()
        .map(|(label, v)| (label.as_str(), v.round().max(0.0) as u64))
        .collect();

    let n = data.len() as u16;
    let bar_width = (inner.width / n.max(1)).saturating_sub(1).clamp(3, 14);

    let chart = BarChart::default()
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(BAR_COLOR))
        .value_style(Style::default().fg(Color::Black).bg(BAR_COLOR))
        .label_style(Style::default().fg(FG_LABEL))
        .data(data.as_slice());
    frame.render_widget(chart, inner);
}

/// Proportion chart: one line per category with a share bar.
fn draw_proportions(frame: &mut ratatui::Frame<'_>, area: Rect, spec: &ChartSpec) {
    let block = chart_block(spec);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    if spec.is_empty() {
        draw_empty(frame, inner);
        return;
    }

    let lines = proportion_lines(spec, inner.width as usize);
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);
}

fn proportion_lines(spec: &ChartSpec, width: usize) -> Vec<Line<'static>> {
    let total = spec.total();
    let label_w = spec
        .points
        .iter()
        .map(|(l, _)| l.chars().count())
        .max()
        .unwrap_or(0)
        .min(16);
    let bar_w = width.saturating_sub(label_w + 10).max(1);

    spec.points
        .iter()
        .map(|(label, v)| {
            let share = if total > 0.0 { v / total } else { 0.0 };
            let n = (share * bar_w as f64).round() as usize;
            let label: String = label.chars().take(label_w).collect();
            Line::from(vec![
                Span::styled(format!("{label:<label_w$} "), Style::default().fg(FG_LABEL)),
                Span::styled("█".repeat(n), Style::default().fg(BAR_COLOR)),
                Span::styled(
                    format!(" {}", format_percent(share * 100.0)),
                    Style::default().fg(FG_VALUE),
                ),
            ])
        })
        .collect()
}

fn draw_line_chart(frame: &mut ratatui::Frame<'_>, area: Rect, spec: &ChartSpec) {
    let block = chart_block(spec);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    if spec.is_empty() {
        draw_empty(frame, inner);
        return;
    }

    let (series, labels, x_bounds, y_bounds) = line_series(spec);
    let widget = DailySalesChart {
        series: &series,
        day_labels: &labels,
        x_bounds,
        y_bounds,
        y_label: "R$",
        fmt_y: fmt_axis_brl,
    };
    frame.render_widget(widget, inner);
}

/// Index-spaced series with the y axis starting at zero.
fn line_series(spec: &ChartSpec) -> (Vec<(f64, f64)>, Vec<String>, [f64; 2], [f64; 2]) {
    let series: Vec<(f64, f64)> = spec
        .points
        .iter()
        .enumerate()
        .map(|(i, (_, v))| (i as f64, *v))
        .collect();
    let labels = spec.points.iter().map(|(l, _)| l.clone()).collect();

    let x_bounds = if series.len() < 2 {
        [-1.0, 1.0]
    } else {
        [0.0, (series.len() - 1) as f64]
    };

    let y_max = series.iter().map(|&(_, y)| y).fold(0.0, f64::max);
    let y_min = series.iter().map(|&(_, y)| y).fold(0.0, f64::min);
    let y_max = if y_max > y_min { y_max } else { y_min + 1.0 };
    let pad = (y_max - y_min) * 0.05;

    (series, labels, x_bounds, [y_min, y_max + pad])
}

fn fmt_axis_brl(v: f64) -> String {
    format!("{v:.0}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::ChartKind;

    fn spec(points: &[(&str, f64)]) -> ChartSpec {
        ChartSpec {
            kind: ChartKind::TimeSeriesLine,
            label: "t".to_string(),
            points: points.iter().map(|(l, v)| (l.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn line_series_starts_at_zero() {
        let (series, labels, x, y) = line_series(&spec(&[("20/12/2023", 50.0), ("05/01/2024", 100.0)]));
        assert_eq!(series, vec![(0.0, 50.0), (1.0, 100.0)]);
        assert_eq!(labels, vec!["20/12/2023".to_string(), "05/01/2024".to_string()]);
        assert_eq!(x, [0.0, 1.0]);
        assert_eq!(y[0], 0.0);
        assert!(y[1] > 100.0);
    }

    #[test]
    fn single_day_gets_usable_bounds() {
        let (_, _, x, y) = line_series(&spec(&[("05/07/2024", 0.0)]));
        assert!(x[1] > x[0]);
        assert!(y[1] > y[0]);
    }

    #[test]
    fn proportions_sum_to_the_whole() {
        let s = ChartSpec {
            kind: ChartKind::ProportionPie,
            label: "Traffic".to_string(),
            points: vec![("FACEBOOK".to_string(), 3.0), ("GOOGLE".to_string(), 1.0)],
        };
        let lines = proportion_lines(&s, 40);
        assert_eq!(lines.len(), 2);
        let first: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(first.starts_with("FACEBOOK "));
        assert!(first.ends_with("75,0%"));
    }

    #[test]
    fn keys_drive_period_selection() {
        let client = SheetClient::new(crate::domain::DataSource::File("unused.csv".into()));
        let mut app = App::new(client, PeriodFilter::All);
        app.state.load(&[
            crate::domain::RawRow::from_fields(["05/07/2024", "", "", "x", "ok", "R$ 1,00"]),
            crate::domain::RawRow::from_fields(["05/06/2024", "", "", "x", "ok", "R$ 1,00"]),
        ]);

        assert_eq!(app.handle_key(KeyCode::Right), KeyAction::Redraw);
        assert_eq!(app.state.selected().display_name(), "07/2024");
        assert_eq!(app.handle_key(KeyCode::Char('a')), KeyAction::Redraw);
        assert_eq!(app.state.selected(), PeriodFilter::All);
        assert_eq!(app.handle_key(KeyCode::Char('r')), KeyAction::Refresh);
        assert_eq!(app.handle_key(KeyCode::Char('q')), KeyAction::Quit);
    }
}
