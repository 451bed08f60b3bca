//! Top-rows table
//!
//! Renders the preview rows with headers, a separator and aligned columns.

use crate::model::RowPreview;
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a column may get before cells are cut
const MAX_COLUMN_WIDTH: usize = 50;

/// Scrollable preview table
#[derive(Default)]
pub struct PreviewTable {
    pub scroll: usize,
}

impl PreviewTable {
    pub fn scroll_down(&mut self, by: usize, total: usize) {
        self.scroll = (self.scroll + by).min(total.saturating_sub(1));
    }

    pub fn scroll_up(&mut self, by: usize) {
        self.scroll = self.scroll.saturating_sub(by);
    }

    pub fn reset(&mut self) {
        self.scroll = 0;
    }

    pub fn draw_with_preview(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        preview: &RowPreview,
        columns: &[String],
        top_n: &str,
        focused: bool,
    ) {
        let mut content = vec![Line::from(vec![
            Span::styled("Rows: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                if focused {
                    format!("{}_", top_n)
                } else {
                    top_n.to_string()
                },
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Enter to fetch", Style::default().fg(Color::DarkGray)),
        ])];
        content.push(Line::from(""));

        if preview.is_empty() {
            let hint = if preview.dataset.is_empty() {
                "No rows loaded."
            } else {
                "No rows returned."
            };
            content.push(Line::from(Span::styled(
                hint,
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            content.extend(build_table_lines(columns, &preview.cells()));
        }

        let total = content.len();
        let visible_height = area.height.saturating_sub(2) as usize;
        let max_scroll = total.saturating_sub(visible_height);
        self.scroll = self.scroll.min(max_scroll);

        let title = if preview.dataset.is_empty() {
            " Top Rows ".to_string()
        } else {
            format!(" Top Rows: {} ", preview.dataset)
        };

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(border_style(focused)),
            )
            .scroll((self.scroll as u16, 0));

        frame.render_widget(paragraph, area);

        if total > visible_height {
            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(self.scroll);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Build table lines from headers and rows
pub fn build_table_lines(headers: &[String], rows: &[Vec<String>]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if headers.is_empty() {
        return lines;
    }

    let mut col_widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < col_widths.len() {
                col_widths[i] = col_widths[i].max(cell.width());
            }
        }
    }
    for width in &mut col_widths {
        *width = (*width).min(MAX_COLUMN_WIDTH);
    }

    let header_spans: Vec<Span> = headers
        .iter()
        .zip(&col_widths)
        .flat_map(|(h, &width)| {
            vec![
                Span::styled(
                    fit(h, width),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" │ "),
            ]
        })
        .collect();
    lines.push(Line::from(header_spans));

    let separator: String = col_widths
        .iter()
        .map(|w| "─".repeat(*w))
        .collect::<Vec<_>>()
        .join("─┼─");
    lines.push(Line::from(Span::styled(
        separator,
        Style::default().fg(Color::DarkGray),
    )));

    for row in rows {
        let row_spans: Vec<Span> = row
            .iter()
            .zip(&col_widths)
            .flat_map(|(cell, &width)| {
                vec![
                    Span::styled(fit(cell, width), Style::default().fg(Color::White)),
                    Span::raw(" │ "),
                ]
            })
            .collect();
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Total rows: {}", rows.len()),
        Style::default().fg(Color::Yellow),
    )));

    lines
}

/// Pad or cut `text` to exactly `width` terminal columns
fn fit(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width <= width {
        return format!("{}{}", text, " ".repeat(width - text_width));
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}
