//! Help dialog component
//!
//! Keyboard shortcuts, grouped by panel.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Width reserved for the key column
const KEY_COLUMN: usize = 14;

const DIALOG_WIDTH: u16 = 64;

type Shortcuts = &'static [(&'static str, &'static str)];

const SECTIONS: &[(&str, Shortcuts)] = &[
    (
        "Panels",
        &[
            ("Tab", "Focus next panel"),
            ("Shift+Tab", "Focus previous panel"),
            ("Esc", "Dismiss notification"),
        ],
    ),
    (
        "Datasets",
        &[
            ("j / ↓", "Move to next dataset"),
            ("k / ↑", "Move to previous dataset"),
            ("Enter", "Select dataset"),
            ("d", "Remove dataset (asks first)"),
            ("R", "Refresh dataset list"),
        ],
    ),
    (
        "Upload",
        &[
            ("type path", "File to upload (.csv, .xlsx, .xls)"),
            ("Enter", "Choose file and upload"),
        ],
    ),
    (
        "Top Rows",
        &[
            ("type number", "How many rows to fetch"),
            ("Enter", "Fetch rows"),
            ("PgUp / PgDn", "Scroll table"),
        ],
    ),
    (
        "Ask a Question",
        &[
            ("type text", "Question about the selected dataset"),
            ("Enter", "Ask"),
            ("Ctrl+s", "Save chart answer as PNG"),
        ],
    ),
    (
        "Prompt History",
        &[
            ("j / k", "Move through past questions"),
            ("Enter", "Open full answer"),
            ("C", "Clear history"),
        ],
    ),
    (
        "General",
        &[("?", "Show this help"), ("q / Ctrl+c", "Quit")],
    ),
];

#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
}

impl HelpDialog {
    fn scroll(&mut self, delta: isize) {
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta);
    }
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                return Ok(Some(Action::CloseModal))
            }
            KeyCode::Char('j') | KeyCode::Down => self.scroll(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll(-1),
            KeyCode::PageDown => self.scroll(10),
            KeyCode::PageUp => self.scroll(-10),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let lines = help_lines();
        let total = lines.len();

        let popup = centered_popup(area, DIALOG_WIDTH, total as u16 + 2);
        let visible = popup.height.saturating_sub(2) as usize;
        let max_scroll = total.saturating_sub(visible);
        self.scroll_offset = self.scroll_offset.min(max_scroll);

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Help ")
                        .title_bottom(Line::from(" q / Esc / ? close ").right_aligned())
                        .title_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                        .border_style(Style::default().fg(Color::Yellow)),
                )
                .scroll((self.scroll_offset as u16, 0)),
            popup,
        );

        if max_scroll > 0 {
            let mut state = ScrollbarState::new(max_scroll).position(self.scroll_offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                popup.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut state,
            );
        }

        Ok(())
    }
}

fn help_lines() -> Vec<Line<'static>> {
    let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Cyan);

    let mut lines = Vec::new();
    for (i, (title, shortcuts)) in SECTIONS.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(format!(" {}", title), heading)));
        for (key, description) in shortcuts.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("   {:<width$}", key, width = KEY_COLUMN), key_style),
                Span::raw(*description),
            ]));
        }
    }
    lines
}
