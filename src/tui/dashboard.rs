//! Dashboard screen: selection controls, the chart area and the save prompt.

use std::path::Path;

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
};

use super::plotters_chart::{BarPlottersChart, TrendPlottersChart};
use super::{Notice, button_span, centered, field_line};
use crate::analysis::Selection;
use crate::app::pipeline::{self, ChartData};
use crate::app::session::Session;
use crate::domain::{ChartKind, Dataset};
use crate::report::{CompositionChart, StackedBarChart, TrendChart};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Country,
    From,
    To,
    Trend,
    Bar,
    Composition,
    Save,
}

impl Field {
    const ORDER: [Field; 7] = [
        Field::Country,
        Field::From,
        Field::To,
        Field::Trend,
        Field::Bar,
        Field::Composition,
        Field::Save,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|&f| f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn chart_kind(self) -> Option<ChartKind> {
        match self {
            Field::Trend => Some(ChartKind::Trend),
            Field::Bar => Some(ChartKind::Bar),
            Field::Composition => Some(ChartKind::Composition),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DashAction {
    None,
    Quit,
}

pub(crate) struct Dashboard {
    session: Session,
    entities: Vec<String>,
    entity_idx: Option<usize>,
    from: String,
    to: String,
    focus: Field,
    chart: Option<ChartData>,
    /// `Some` while the save-path prompt is open.
    save_path: Option<String>,
    notice: Option<Notice>,
}

impl Dashboard {
    pub fn new(username: String, entities: Vec<String>) -> Self {
        let entity_idx = if entities.is_empty() { None } else { Some(0) };
        Self {
            session: Session::new(username),
            entities,
            entity_idx,
            from: String::new(),
            to: String::new(),
            focus: Field::Country,
            chart: None,
            save_path: None,
            notice: None,
        }
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    fn entity(&self) -> &str {
        self.entity_idx
            .and_then(|i| self.entities.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    fn selection(&self) -> Selection {
        Selection::new(self.entity(), self.from.as_str(), self.to.as_str())
    }

    pub fn handle_key(&mut self, key: KeyEvent, dataset: &Dataset) -> DashAction {
        if self.save_path.is_some() {
            self.handle_save_key(key);
            return DashAction::None;
        }

        match key.code {
            KeyCode::Esc => return DashAction::Quit,
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Enter => match self.focus {
                Field::Save => self.open_save_prompt(),
                field => {
                    // Enter on an input redraws the chart currently shown.
                    let kind = field
                        .chart_kind()
                        .or_else(|| self.chart.as_ref().map(ChartData::kind))
                        .unwrap_or(ChartKind::Trend);
                    self.plot(dataset, kind);
                }
            },
            _ => self.edit_field(key),
        }
        DashAction::None
    }

    fn edit_field(&mut self, key: KeyEvent) {
        match self.focus {
            Field::Country => match key.code {
                KeyCode::Left => self.step_entity(-1),
                KeyCode::Right => self.step_entity(1),
                KeyCode::Home if !self.entities.is_empty() => self.entity_idx = Some(0),
                KeyCode::End if !self.entities.is_empty() => self.entity_idx = Some(self.entities.len() - 1),
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.jump_to_letter(c),
                _ => {}
            },
            Field::From | Field::To => {
                let text = if self.focus == Field::From {
                    &mut self.from
                } else {
                    &mut self.to
                };
                match key.code {
                    KeyCode::Backspace => {
                        text.pop();
                    }
                    KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => text.push(c),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn step_entity(&mut self, delta: isize) {
        let n = self.entities.len();
        if n == 0 {
            return;
        }
        let cur = self.entity_idx.unwrap_or(0) as isize;
        self.entity_idx = Some((cur + delta).rem_euclid(n as isize) as usize);
    }

    /// Type-ahead: next country after the current one starting with `c`.
    fn jump_to_letter(&mut self, c: char) {
        let n = self.entities.len();
        let start = self.entity_idx.map_or(0, |i| i + 1);
        let wanted = c.to_lowercase().collect::<String>();
        let hit = (0..n)
            .map(|k| (start + k) % n)
            .find(|&i| self.entities[i].to_lowercase().starts_with(&wanted));
        if let Some(i) = hit {
            self.entity_idx = Some(i);
        }
    }

    fn plot(&mut self, dataset: &Dataset, kind: ChartKind) {
        match pipeline::produce_chart(dataset, &self.selection(), kind, &mut self.session) {
            Ok(chart) => {
                self.notice = None;
                self.chart = Some(chart);
            }
            Err(err) => {
                tracing::debug!(error = %err, "chart request rejected");
                self.notice = Some(Notice::from_error(&err));
            }
        }
    }

    fn open_save_prompt(&mut self) {
        match self.session.summary() {
            Ok(summary) => self.save_path = Some(format!("covid_analysis_{}.txt", summary.entity)),
            Err(err) => self.notice = Some(Notice::from_error(&err)),
        }
    }

    fn handle_save_key(&mut self, key: KeyEvent) {
        let Some(path) = self.save_path.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.save_path = None;
                self.notice = Some(Notice::info("Save canceled."));
            }
            KeyCode::Enter => {
                let path = path.trim().to_string();
                self.save_path = None;
                self.notice = Some(if path.is_empty() {
                    Notice::info("Save canceled.")
                } else {
                    match self.session.export(Path::new(&path)) {
                        Ok(_) => Notice::info(format!("Analysis saved to: {path}")),
                        Err(err) => Notice::from_error(&err),
                    }
                });
            }
            KeyCode::Backspace => {
                path.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => path.push(c),
            _ => {}
        }
    }

    pub fn draw(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(5),
                Constraint::Min(8),
                Constraint::Length(2),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        self.draw_controls(frame, chunks[1]);
        self.draw_chart(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);

        if let Some(path) = &self.save_path {
            let rect = centered(area, 60, 5);
            frame.render_widget(Clear, rect);
            let lines = vec![
                field_line("File:", path.clone(), true),
                Line::styled("Enter save  Esc cancel", Style::default().fg(Color::Gray)),
            ];
            let block = Block::default().title(" Save analysis ").borders(Borders::ALL);
            frame.render_widget(Paragraph::new(Text::from(lines)).block(block), rect);
        }
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                "COVID Data Visualizer",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  |  "),
            Span::styled(
                format!("Logged in as: {}", self.session.username()),
                Style::default().fg(Color::Gray),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_controls(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let country = match self.entity_idx {
            Some(i) => format!("< {} >  ({}/{})", self.entity(), i + 1, self.entities.len()),
            None => "(no countries loaded)".to_string(),
        };
        let mut dates = field_line("From:", self.from.clone(), self.focus == Field::From);
        dates.spans.push(Span::raw("   "));
        dates
            .spans
            .extend(field_line("To:", self.to.clone(), self.focus == Field::To).spans);

        let lines = vec![
            field_line("Country:", country, self.focus == Field::Country),
            dates,
            Line::from(vec![
                button_span("[ Trend ]".to_string(), self.focus == Field::Trend),
                Span::raw(" "),
                button_span("[ Bar ]".to_string(), self.focus == Field::Bar),
                Span::raw(" "),
                button_span("[ Composition ]".to_string(), self.focus == Field::Composition),
                Span::raw("   "),
                button_span("[ Save Analysis ]".to_string(), self.focus == Field::Save),
            ]),
        ];
        let block = Block::default().title(" Selection ").borders(Borders::ALL);
        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(chart) = &self.chart else {
            let block = Block::default().title(" Chart ").borders(Borders::ALL);
            let p = Paragraph::new("Pick a country and a chart type, then press Enter.")
                .style(Style::default().fg(Color::Gray))
                .block(block);
            frame.render_widget(p, area);
            return;
        };

        match chart {
            ChartData::Trend(c) => draw_trend(frame, area, c),
            ChartData::Bar(c) => draw_bars(frame, area, c),
            ChartData::Composition(c) => draw_composition(frame, area, c),
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines = Vec::with_capacity(2);
        lines.push(match &self.notice {
            Some(notice) => Line::from(notice.span()),
            None => Line::raw(""),
        });
        lines.push(Line::styled(
            "Tab/↑↓ move  ←→ country  a-z jump  Enter activate  Esc quit",
            Style::default().fg(Color::Gray),
        ));
        frame.render_widget(Paragraph::new(Text::from(lines)), area);
    }
}

fn draw_trend(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &TrendChart) {
    let title = Line::from(vec![
        Span::raw(format!(" {} Daily | ", chart.entity)),
        Span::styled("● cases", Style::default().fg(Color::Rgb(31, 119, 180))),
        Span::raw("  "),
        Span::styled("● deaths", Style::default().fg(Color::Rgb(214, 39, 40))),
        Span::raw("  "),
        Span::styled("- - 7d avg cases", Style::default().fg(Color::Rgb(255, 127, 14))),
        Span::raw("  "),
        Span::styled("- - 7d avg deaths ", Style::default().fg(Color::Rgb(44, 160, 44))),
    ]);
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(TrendPlottersChart { chart }, inner);
}

fn draw_bars(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &StackedBarChart) {
    let title = Line::from(vec![
        Span::raw(format!(" {} Cases/Deaths | ", chart.entity)),
        Span::styled("■ new cases", Style::default().fg(Color::Rgb(31, 119, 180))),
        Span::raw("  "),
        Span::styled("■ new deaths ", Style::default().fg(Color::Rgb(214, 39, 40))),
    ]);
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let dates: Vec<NaiveDate> = chart.bars.iter().map(|b| b.date).collect();
    frame.render_widget(BarPlottersChart { chart, dates: &dates }, inner);
}

fn draw_composition(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &CompositionChart) {
    let block = Block::default()
        .title(format!(" {} Composition as of {} ", chart.entity, chart.as_of))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let colors = [Color::Rgb(31, 119, 180), Color::Rgb(214, 39, 40)];
    for ((slice, color), row) in chart.slices.iter().zip(colors).zip(rows.iter()) {
        let gauge = Gauge::default()
            .block(Block::default().title(format!(" {} ", slice.label)))
            .gauge_style(Style::default().fg(color))
            .ratio((slice.share_pct / 100.0).clamp(0.0, 1.0))
            .label(format!("{} ({:.1}%)", slice.value, slice.share_pct));
        frame.render_widget(gauge, *row);
    }
}
