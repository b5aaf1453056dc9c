//! Display Views
//!
//! View components for the three things the wall can show: a page of entry
//! cards, the instruction page and the loading page. Header and footer are
//! shared by all of them.

use chrono::{DateTime, Local, Utc};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::colors;
use crate::config::DisplayConfig;
use crate::domain::{Entry, Lane};
use crate::lanes::WorkingSet;
use crate::rotation::RenderedPage;

/// Read-only view of one frame's worth of display state
pub struct Screen<'a> {
    pub title: &'a str,
    pub page: &'a RenderedPage,
    pub set: &'a WorkingSet,
    pub display: &'a DisplayConfig,
    /// No snapshot has arrived yet
    pub loading: bool,
    /// Cards revealed so far on an entry page
    pub visible_cards: usize,
    /// Wall-clock time for relative ages
    pub now: DateTime<Utc>,
}

/// Trait for renderable views
pub trait View {
    /// Render the view to the frame
    fn render(&self, frame: &mut Frame, area: Rect, screen: &Screen);

    /// Get the view title
    fn title(&self) -> &'static str;
}

/// Render a whole frame
pub fn render(frame: &mut Frame, screen: &Screen) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    render_header(frame, chunks[0], screen);

    let view: &dyn View = if screen.loading {
        &LoadingView
    } else if screen.page.is_instruction() {
        &InstructionView
    } else {
        &EntriesView
    };
    view.render(frame, chunks[1], screen);

    render_footer(frame, chunks[2], screen);
}

fn render_header(frame: &mut Frame, area: Rect, screen: &Screen) {
    let mut spans = vec![Span::styled(
        screen.title.to_string(),
        Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
    )];

    match screen.page {
        RenderedPage::Entries {
            lane,
            page_index,
            max_pages,
            ..
        } if !screen.loading => {
            spans.push(Span::styled("  •  ", Style::default().fg(colors::DIM)));
            spans.push(Span::styled(
                lane.label(),
                Style::default().fg(colors::lane(*lane)).add_modifier(Modifier::BOLD),
            ));
            if *max_pages > 1 {
                spans.push(Span::styled(
                    format!("  {}/{}", page_index + 1, max_pages),
                    Style::default().fg(colors::DIM),
                ));
            }
        }
        _ => {}
    }

    let header = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(colors::BORDER)),
        );
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut Frame, area: Rect, screen: &Screen) {
    let text = match screen.set.classified_at() {
        Some(at) => format!(
            "Updated {}  •  {}",
            at.with_timezone(&Local).format("%-I:%M %p"),
            screen.set.short_fingerprint()
        ),
        None => "Waiting for first snapshot".to_string(),
    };
    let footer = Paragraph::new(text)
        .style(Style::default().fg(colors::DIM))
        .alignment(Alignment::Right);
    frame.render_widget(footer, area);
}

/// Lines centred vertically inside `area`
fn centered(area: Rect, height: u16) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(height), Constraint::Fill(1)])
        .split(area);
    chunks[1]
}

/// A page of entry cards
pub struct EntriesView;

impl EntriesView {
    fn card(entry: &Entry, lane: Lane, now: DateTime<Utc>) -> Paragraph<'static> {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors::BORDER))
            .title(Line::from(Span::styled(
                format!(" {} ", entry.display_date()),
                Style::default().fg(colors::DIM),
            )))
            .title(
                Line::from(Span::styled(
                    format!(" {} ", entry.relative_age(now)),
                    Style::default().fg(colors::lane(lane)),
                ))
                .right_aligned(),
            );

        Paragraph::new(entry.content.clone())
            .style(Style::default().fg(colors::TEXT))
            .wrap(Wrap { trim: true })
            .block(block)
    }
}

impl View for EntriesView {
    fn render(&self, frame: &mut Frame, area: Rect, screen: &Screen) {
        let entries = screen.page.entries();
        if entries.is_empty() {
            return;
        }

        let slots = entries.len() as u32;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints((0..slots).map(|_| Constraint::Ratio(1, slots)))
            .split(area);

        let lane = screen.page.lane();
        for (entry, chunk) in entries.iter().zip(chunks.iter()).take(screen.visible_cards) {
            frame.render_widget(Self::card(entry, lane, screen.now), *chunk);
        }
    }

    fn title(&self) -> &'static str {
        "Entries"
    }
}

/// How to take part, with aggregate counts
pub struct InstructionView;

impl InstructionView {
    fn lines(screen: &Screen) -> Vec<Line<'static>> {
        let (total, recent) = match screen.page {
            RenderedPage::Instruction {
                total_entries,
                recent_entries,
                ..
            } => (*total_entries, *recent_entries),
            RenderedPage::Entries { .. } => (screen.set.total_entries(), screen.set.recent().len()),
        };

        let mut lines = vec![
            Line::from(Span::styled(
                screen.display.instruction_heading.clone(),
                Style::default().fg(colors::ACCENT).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
        ];
        lines.extend(
            screen
                .display
                .instruction_lines
                .iter()
                .map(|line| Line::from(Span::styled(line.clone(), Style::default().fg(colors::TEXT)))),
        );
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("{} entries shared • {} this week", total, recent),
            Style::default().fg(colors::DIM),
        )));
        lines
    }
}

impl View for InstructionView {
    fn render(&self, frame: &mut Frame, area: Rect, screen: &Screen) {
        let lines = Self::lines(screen);
        let target = centered(area, lines.len() as u16);
        let body = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(body, target);
    }

    fn title(&self) -> &'static str {
        "Instruction"
    }
}

/// Shown until the first snapshot lands
pub struct LoadingView;

impl View for LoadingView {
    fn render(&self, frame: &mut Frame, area: Rect, _screen: &Screen) {
        let body = Paragraph::new("Loading...")
            .style(Style::default().fg(colors::DIM))
            .alignment(Alignment::Center);
        frame.render_widget(body, centered(area, 1));
    }

    fn title(&self) -> &'static str {
        "Loading"
    }
}
