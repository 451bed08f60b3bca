//! Home component - the dashboard screen
//!
//! Owns focus, list cursors and text inputs. Dashboard data comes from
//! `DashboardState`, which the App passes in when drawing.

use crate::action::Action;
use crate::component::Component;
use crate::components::history_dialog::chart_summary;
use crate::components::calculate_dashboard_layout;
use crate::components::table::{border_style, PreviewTable};
use crate::model::{Answer, DashboardState, NotificationLevel, Panel};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

// ═══════════════════════════════════════════════════════════════════════════════
// Home Component
// ═══════════════════════════════════════════════════════════════════════════════

pub struct HomeComponent {
    pub focus: Panel,

    /// Cursor in the dataset list
    pub dataset_list: ListState,

    /// Cursor in the history panel
    pub history_list: ListState,

    /// Typed upload path
    pub upload_input: String,

    /// Typed question
    pub question_input: String,

    pub preview_table: PreviewTable,

    /// Advances on every tick while a question is pending
    pub spinner_frame: usize,
}

impl Default for HomeComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeComponent {
    pub fn new() -> Self {
        Self {
            focus: Panel::default(),
            dataset_list: ListState::default(),
            history_list: ListState::default(),
            upload_input: String::new(),
            question_input: String::new(),
            preview_table: PreviewTable::default(),
            spinner_frame: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cursors
    // ─────────────────────────────────────────────────────────────────────────

    /// Dataset name under the cursor
    pub fn cursor_dataset<'a>(&self, state: &'a DashboardState) -> Option<&'a str> {
        let idx = self.dataset_list.selected()?;
        state.datasets.get(idx).map(String::as_str)
    }

    /// Put the dataset cursor on the active dataset
    pub fn sync_dataset_cursor(&mut self, state: &DashboardState) {
        let idx = state
            .selected
            .as_ref()
            .and_then(|s| state.datasets.iter().position(|d| d == s));
        self.dataset_list.select(idx);
    }

    /// Keep the history cursor inside the history
    pub fn clamp_history_cursor(&mut self, len: usize) {
        match (self.history_list.selected(), len) {
            (_, 0) => self.history_list.select(None),
            (None, _) => self.history_list.select(Some(len - 1)),
            (Some(i), _) if i >= len => self.history_list.select(Some(len - 1)),
            _ => {}
        }
    }

    pub fn next(&mut self, state: &DashboardState) {
        match self.focus {
            Panel::Datasets => step(&mut self.dataset_list, state.datasets.len(), true),
            Panel::History => step(&mut self.history_list, state.history.len(), true),
            Panel::Preview => {
                // input line, blank, header, separator, rows, blank, total
                let total = state.preview.rows.len() + 6;
                self.preview_table.scroll_down(1, total);
            }
            _ => {}
        }
    }

    pub fn previous(&mut self, state: &DashboardState) {
        match self.focus {
            Panel::Datasets => step(&mut self.dataset_list, state.datasets.len(), false),
            Panel::History => step(&mut self.history_list, state.history.len(), false),
            Panel::Preview => self.preview_table.scroll_up(1),
            _ => {}
        }
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Text Input
    // ─────────────────────────────────────────────────────────────────────────

    /// Input buffer of the focused panel, if it has one of its own.
    /// The row count lives in `DashboardState`.
    pub fn focused_input(&mut self) -> Option<&mut String> {
        match self.focus {
            Panel::Upload => Some(&mut self.upload_input),
            Panel::Ask => Some(&mut self.question_input),
            _ => None,
        }
    }

    fn submit_action(&self) -> Option<Action> {
        match self.focus {
            Panel::Datasets => Some(Action::SelectDataset),
            Panel::Upload => {
                let path = self.upload_input.trim();
                if path.is_empty() {
                    Some(Action::SubmitUpload)
                } else {
                    Some(Action::ChooseUploadFile(path.into()))
                }
            }
            Panel::Preview => Some(Action::FetchRows),
            Panel::Ask => Some(Action::SubmitQuestion),
            Panel::History => self.history_list.selected().map(Action::OpenHistory),
        }
    }
}

/// Move a list cursor one step, stopping at the ends
fn step(list: &mut ListState, len: usize, forward: bool) {
    if len == 0 {
        list.select(None);
        return;
    }
    let next = match list.selected() {
        None => 0,
        Some(i) if forward => (i + 1).min(len - 1),
        Some(i) => i.saturating_sub(1),
    };
    list.select(Some(next));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for HomeComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Keys that work in every panel
        let global = match key.code {
            KeyCode::Tab => Some(Action::NextPanel),
            KeyCode::BackTab => Some(Action::PrevPanel),
            KeyCode::Char('c') if ctrl => Some(Action::OpenQuitDialog),
            KeyCode::Char('s') if ctrl => Some(Action::SaveChart),
            KeyCode::Esc => Some(Action::DismissNotification),
            KeyCode::Enter => self.submit_action(),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),
            _ => None,
        };
        if global.is_some() {
            return Ok(global);
        }

        let action = if self.focus.takes_text() {
            match key.code {
                KeyCode::Backspace => Some(Action::Backspace),
                KeyCode::Down => Some(Action::ScrollDown),
                KeyCode::Up => Some(Action::ScrollUp),
                KeyCode::Char(c) if !ctrl => Some(Action::Input(c)),
                _ => None,
            }
        } else {
            match key.code {
                KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
                KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
                KeyCode::Char('d') if self.focus == Panel::Datasets => {
                    Some(Action::RequestDelete)
                }
                KeyCode::Char('R') => Some(Action::RefreshDatasets),
                KeyCode::Char('C') if self.focus == Panel::History => Some(Action::ClearHistory),
                KeyCode::Char('q') => Some(Action::OpenQuitDialog),
                KeyCode::Char('?') => Some(Action::OpenHelp),
                _ => None,
            }
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextPanel => self.focus = self.focus.next(),
            Action::PrevPanel => self.focus = self.focus.prev(),
            Action::Backspace => {
                if let Some(input) = self.focused_input() {
                    input.pop();
                }
            }
            Action::Input(c) => {
                if let Some(input) = self.focused_input() {
                    input.push(c);
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs dashboard data, see draw_dashboard
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Draw the dashboard screen
pub fn draw_dashboard(
    frame: &mut Frame,
    area: Rect,
    home: &mut HomeComponent,
    state: &DashboardState,
    base_url: &str,
) {
    let layout = calculate_dashboard_layout(area);

    render_dataset_list(frame, layout.datasets, home, state);
    render_input(
        frame,
        layout.upload,
        Panel::Upload,
        home.focus,
        &home.upload_input,
        state
            .pending_upload
            .as_ref()
            .map(|p| format!(" Upload (chosen: {}) ", p.display())),
    );

    let preview_focused = home.focus == Panel::Preview;
    home.preview_table.draw_with_preview(
        frame,
        layout.preview,
        &state.preview,
        &state.columns(),
        &state.top_n,
        preview_focused,
    );

    let ask_title = state
        .selected
        .as_ref()
        .map(|s| format!(" Ask a Question about {} ", s));
    render_input(
        frame,
        layout.ask,
        Panel::Ask,
        home.focus,
        &home.question_input,
        ask_title,
    );
    render_answer(frame, layout.answer, home, state);
    render_history(frame, layout.history, home, state);
    render_status_bar(frame, layout.status, state, base_url);
    render_help_bar(frame, layout.help, home.focus);
}

fn render_dataset_list(
    frame: &mut Frame,
    area: Rect,
    home: &mut HomeComponent,
    state: &DashboardState,
) {
    let focused = home.focus == Panel::Datasets;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Datasets ({}) ", state.datasets.len()))
        .border_style(border_style(focused));

    if state.datasets.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No datasets found. Upload one!",
            Style::default().fg(Color::DarkGray),
        ))
        .wrap(Wrap { trim: true })
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state
        .datasets
        .iter()
        .map(|name| {
            let active = state.is_selected(name);
            let (marker, style) = if active {
                (
                    "● ",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("  ", Style::default().fg(Color::White))
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Green)),
                Span::styled(name.clone(), style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut home.dataset_list);
}

fn render_input(
    frame: &mut Frame,
    area: Rect,
    panel: Panel,
    focus: Panel,
    value: &str,
    title: Option<String>,
) {
    let focused = panel == focus;
    let text = if focused {
        format!("{}_", value)
    } else {
        value.to_string()
    };

    let paragraph = Paragraph::new(Span::styled(text, Style::default().fg(Color::White))).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.unwrap_or_else(|| format!(" {} ", panel.name())))
            .border_style(border_style(focused)),
    );
    frame.render_widget(paragraph, area);
}

fn render_answer(frame: &mut Frame, area: Rect, home: &HomeComponent, state: &DashboardState) {
    let mut lines = Vec::new();

    if state.query_in_flight {
        lines.push(Line::from(Span::styled(
            format!("{} Thinking...", SPINNER[home.spinner_frame % SPINNER.len()]),
            Style::default().fg(Color::Yellow),
        )));
    }

    match &state.live {
        Some(Answer::Text(text)) => {
            lines.extend(text.lines().map(|l| Line::from(l.to_string())));
        }
        Some(answer) => {
            if let Some(summary) = chart_summary(answer) {
                lines.push(Line::from(Span::styled(
                    summary,
                    Style::default().fg(Color::Magenta),
                )));
            }
            lines.push(Line::from(Span::styled(
                "Press Ctrl+s to save the chart as a PNG file.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        None if !state.query_in_flight => {
            lines.push(Line::from(Span::styled(
                "Answers appear here.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        None => {}
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Answer ")
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(paragraph, area);
}

fn render_history(
    frame: &mut Frame,
    area: Rect,
    home: &mut HomeComponent,
    state: &DashboardState,
) {
    let focused = home.focus == Panel::History;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Prompt History ({}) ", state.history.len()))
        .border_style(border_style(focused));

    if state.history.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No prompts yet.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state
        .history
        .entries()
        .iter()
        .map(|entry| {
            let answer = entry
                .text()
                .map(|text| text.lines().next().unwrap_or("").to_string())
                .unwrap_or_else(|| "[chart]".to_string());
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", entry.formatted_time()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    entry.question.clone(),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(" → ", Style::default().fg(Color::DarkGray)),
                Span::raw(answer),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

    frame.render_stateful_widget(list, area, &mut home.history_list);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &DashboardState, base_url: &str) {
    let mut spans = vec![Span::styled(
        format!(" {} ", base_url),
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::raw(" "));

    if let Some(ref name) = state.selected {
        spans.push(Span::styled(
            format!(" {} ", name),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }

    if let Some(ref notification) = state.notification {
        let color = match notification.level {
            NotificationLevel::Error => Color::Red,
            NotificationLevel::Info => Color::Yellow,
        };
        spans.push(Span::styled(
            format!(" {} ", notification.message),
            Style::default().fg(color),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans));
    frame.render_widget(paragraph, area);
}

fn render_help_bar(frame: &mut Frame, area: Rect, focus: Panel) {
    let key = |k: &'static str, color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };

    let mut help_spans = vec![key(" Tab ", Color::Cyan), Span::raw("Next panel ")];
    match focus {
        Panel::Datasets => help_spans.extend([
            key(" Enter ", Color::Green),
            Span::raw("Select "),
            key(" d ", Color::Red),
            Span::raw("Remove "),
            key(" R ", Color::Cyan),
            Span::raw("Refresh "),
        ]),
        Panel::Upload => help_spans.extend([key(" Enter ", Color::Green), Span::raw("Upload ")]),
        Panel::Preview => {
            help_spans.extend([key(" Enter ", Color::Green), Span::raw("Fetch rows ")])
        }
        Panel::Ask => help_spans.extend([
            key(" Enter ", Color::Green),
            Span::raw("Ask "),
            key(" Ctrl+s ", Color::Magenta),
            Span::raw("Save chart "),
        ]),
        Panel::History => help_spans.extend([
            key(" Enter ", Color::Green),
            Span::raw("Details "),
            key(" C ", Color::Red),
            Span::raw("Clear "),
        ]),
    }
    if !focus.takes_text() {
        help_spans.extend([
            key(" ? ", Color::White),
            Span::raw("Help "),
            key(" q ", Color::Yellow),
            Span::raw("Quit"),
        ]);
    } else {
        help_spans.extend([key(" Ctrl+c ", Color::Yellow), Span::raw("Quit")]);
    }

    let paragraph = Paragraph::new(Line::from(help_spans));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StateEvent;

    fn press(home: &mut HomeComponent, code: KeyCode) -> Option<Action> {
        home.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn loaded(names: &[&str]) -> DashboardState {
        DashboardState::default().reduce(StateEvent::DatasetsLoaded(
            names.iter().map(|s| s.to_string()).collect(),
        ))
    }

    #[test]
    fn test_text_panels_capture_characters() {
        let mut home = HomeComponent::new();
        home.focus = Panel::Ask;

        // 'q' is text here, not quit
        assert_eq!(press(&mut home, KeyCode::Char('q')), Some(Action::Input('q')));
        home.update(Action::Input('q')).unwrap();
        home.update(Action::Input('?')).unwrap();
        assert_eq!(home.question_input, "q?");

        home.update(Action::Backspace).unwrap();
        assert_eq!(home.question_input, "q");
    }

    #[test]
    fn test_ctrl_c_opens_quit_dialog_from_text_panel() {
        let mut home = HomeComponent::new();
        home.focus = Panel::Upload;
        let action = home
            .handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(action, Some(Action::OpenQuitDialog));
    }

    #[test]
    fn test_enter_depends_on_focus() {
        let mut home = HomeComponent::new();
        assert_eq!(press(&mut home, KeyCode::Enter), Some(Action::SelectDataset));

        home.focus = Panel::Upload;
        assert_eq!(press(&mut home, KeyCode::Enter), Some(Action::SubmitUpload));
        home.upload_input = " data/sales.csv ".into();
        assert_eq!(
            press(&mut home, KeyCode::Enter),
            Some(Action::ChooseUploadFile("data/sales.csv".into()))
        );

        home.focus = Panel::Preview;
        assert_eq!(press(&mut home, KeyCode::Enter), Some(Action::FetchRows));

        home.focus = Panel::Ask;
        assert_eq!(press(&mut home, KeyCode::Enter), Some(Action::SubmitQuestion));

        // Nothing to open without a history cursor
        home.focus = Panel::History;
        assert_eq!(press(&mut home, KeyCode::Enter), None);
    }

    #[test]
    fn test_dataset_keys() {
        let mut home = HomeComponent::new();
        assert_eq!(press(&mut home, KeyCode::Char('d')), Some(Action::RequestDelete));
        assert_eq!(press(&mut home, KeyCode::Char('R')), Some(Action::RefreshDatasets));
        assert_eq!(press(&mut home, KeyCode::Char('q')), Some(Action::OpenQuitDialog));
        assert_eq!(press(&mut home, KeyCode::Tab), Some(Action::NextPanel));
    }

    #[test]
    fn test_cursor_moves_and_syncs() {
        let state = loaded(&["a", "b", "c"]);
        let mut home = HomeComponent::new();
        home.sync_dataset_cursor(&state);
        assert_eq!(home.cursor_dataset(&state), Some("a"));

        home.next(&state);
        home.next(&state);
        home.next(&state);
        assert_eq!(home.cursor_dataset(&state), Some("c"));

        home.previous(&state);
        assert_eq!(home.cursor_dataset(&state), Some("b"));

        let state = state.reduce(StateEvent::DatasetsLoaded(Vec::new()));
        home.sync_dataset_cursor(&state);
        assert_eq!(home.cursor_dataset(&state), None);
    }

    #[test]
    fn test_history_cursor_clamps() {
        let mut home = HomeComponent::new();
        home.clamp_history_cursor(3);
        assert_eq!(home.history_list.selected(), Some(2));

        home.clamp_history_cursor(0);
        assert_eq!(home.history_list.selected(), None);
    }
}
