//! History dialog component
//!
//! Shows every answered question of the session with the full answer of
//! the selected entry.

use crate::action::Action;
use crate::component::Component;
use crate::components::inset;
use crate::model::{Answer, QaExchange};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Wrap,
    },
    Frame,
};

/// Characters of a chart's data URI shown in the detail pane
const DATA_URI_PREVIEW: usize = 64;

/// Q&A history dialog
#[derive(Default)]
pub struct HistoryDialog {
    pub selected_index: usize,
    pub detail_scroll: usize,
}

impl Component for HistoryDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Up => Some(Action::ModalUp),
            KeyCode::Down => Some(Action::ModalDown),
            KeyCode::Char('j') => Some(Action::ScrollDown),
            KeyCode::Char('k') => Some(Action::ScrollUp),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::Char('s') => Some(Action::SaveChart),
            KeyCode::Char('C') => Some(Action::ClearHistory),
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::ModalUp => {
                if self.selected_index > 0 {
                    self.selected_index -= 1;
                    self.detail_scroll = 0;
                }
            }
            Action::ModalDown => {
                self.selected_index += 1;
                self.detail_scroll = 0;
            }
            Action::ScrollUp => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
            }
            Action::ScrollDown => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
            }
            Action::PageUp => {
                self.detail_scroll = self.detail_scroll.saturating_sub(10);
            }
            Action::PageDown => {
                self.detail_scroll = self.detail_scroll.saturating_add(10);
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs history data, see draw_with_history
        Ok(())
    }
}

impl HistoryDialog {
    pub fn open_at(&mut self, index: usize) {
        self.selected_index = index;
        self.detail_scroll = 0;
    }

    pub fn draw_with_history(
        &self,
        frame: &mut Frame,
        area: Rect,
        history: &[QaExchange],
    ) -> Result<()> {
        frame.render_widget(Clear, area);
        let background = Block::default().style(Style::default().bg(Color::Reset));
        frame.render_widget(background, area);

        let overlay_area = inset(area, 2);

        if history.is_empty() {
            let paragraph = Paragraph::new("No prompts yet.").block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Prompt History ")
                    .title_style(
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    ),
            );
            frame.render_widget(paragraph, overlay_area);
            return Ok(());
        }

        let selected_idx = self.selected_index.min(history.len().saturating_sub(1));

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(overlay_area);

        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(main_chunks[0]);

        let items: Vec<ListItem> = history
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let (icon, color) = answer_icon(entry);
                let style = if i == selected_idx {
                    Style::default().bg(Color::Blue).fg(Color::White)
                } else {
                    Style::default()
                };

                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", icon), Style::default().fg(color)),
                    Span::styled(
                        format!("{} ", entry.formatted_time()),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(entry.question.clone(), style),
                ]))
                .style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Prompt History ({}) ", history.len()))
                .title_style(
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
        );

        frame.render_widget(list, content_chunks[0]);

        if let Some(entry) = history.get(selected_idx) {
            let detail_lines = render_exchange_detail(entry);
            let total = detail_lines.len();
            let visible_height = content_chunks[1].height.saturating_sub(2) as usize;
            let scroll = self.detail_scroll.min(total.saturating_sub(visible_height));

            let detail = Paragraph::new(detail_lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Details ")
                        .title_style(
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        ),
                )
                .wrap(Wrap { trim: false })
                .scroll((scroll as u16, 0));

            frame.render_widget(detail, content_chunks[1]);

            if total > visible_height {
                let mut scrollbar_state =
                    ScrollbarState::new(total.saturating_sub(visible_height)).position(scroll);
                frame.render_stateful_widget(
                    Scrollbar::new(ScrollbarOrientation::VerticalRight),
                    content_chunks[1].inner(Margin {
                        vertical: 1,
                        horizontal: 0,
                    }),
                    &mut scrollbar_state,
                );
            }
        }

        let key_style = |color| Style::default().fg(color).add_modifier(Modifier::BOLD);
        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Esc/q ", key_style(Color::Yellow)),
            Span::raw("Close  "),
            Span::styled(" ↑/↓ ", key_style(Color::Cyan)),
            Span::raw("Select  "),
            Span::styled(" j/k ", key_style(Color::Cyan)),
            Span::raw("Scroll  "),
            Span::styled(" s ", key_style(Color::Green)),
            Span::raw("Save chart  "),
            Span::styled(" C ", key_style(Color::Red)),
            Span::raw("Clear history"),
        ]))
        .block(Block::default().borders(Borders::ALL));

        frame.render_widget(help, main_chunks[1]);

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helper functions
// ─────────────────────────────────────────────────────────────────────────────

fn answer_icon(entry: &QaExchange) -> (&'static str, Color) {
    if entry.is_graph() {
        ("▦", Color::Magenta)
    } else {
        ("✎", Color::Green)
    }
}

/// One-line description of a chart answer
pub fn chart_summary(answer: &Answer) -> Option<String> {
    let chart = answer.graph_image()?;
    Some(match chart.byte_len() {
        Some(bytes) => format!("[chart: PNG image, {} bytes]", bytes),
        None => "[chart: image data could not be decoded]".to_string(),
    })
}

fn render_exchange_detail(entry: &QaExchange) -> Vec<Line<'static>> {
    let label = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("Time: ", label),
        Span::raw(entry.asked_at.format("%Y-%m-%d %H:%M:%S").to_string()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Dataset: ", label),
        Span::raw(entry.dataset.clone()),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Question:", label)));
    lines.push(Line::from(entry.question.clone()));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "─".repeat(60),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(Span::styled("Answer:", label)));

    match &entry.answer {
        Answer::Text(text) => {
            lines.extend(text.lines().map(|l| Line::from(l.to_string())));
        }
        Answer::Graph(_) => {
            if let Some(summary) = chart_summary(&entry.answer) {
                lines.push(Line::from(Span::styled(
                    summary,
                    Style::default().fg(Color::Magenta),
                )));
            }
            if let Some(chart) = entry.graph_image() {
                let uri = chart.data_uri();
                let shown: String = uri.chars().take(DATA_URI_PREVIEW).collect();
                let ellipsis = if uri.chars().count() > DATA_URI_PREVIEW { "…" } else { "" };
                lines.push(Line::from(Span::styled(
                    format!("{}{}", shown, ellipsis),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            lines.push(Line::from(Span::styled(
                "Press s to save it as a PNG file.",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    lines
}
