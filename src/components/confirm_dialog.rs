//! Yes/no confirmation dialog, used for quitting and dataset removal

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::modal::Modal;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

#[derive(Default)]
pub struct ConfirmDialog;

impl ConfirmDialog {
    /// Title, question and accept label for a confirmation modal
    pub fn prompt(modal: &Modal) -> Option<(&'static str, String, &'static str)> {
        match modal {
            Modal::QuitConfirm => Some((
                " Quit? ",
                "Are you sure you want to quit?".to_string(),
                "Yes, quit  ",
            )),
            Modal::DeleteConfirm { name } => Some((
                " Remove Dataset ",
                format!("Are you sure you want to remove '{}'?", name),
                "Yes, remove  ",
            )),
            _ => None,
        }
    }

    pub fn draw_for(&self, frame: &mut Frame, area: Rect, modal: &Modal) {
        let Some((title, question, accept)) = Self::prompt(modal) else {
            return;
        };

        let width = (question.chars().count() as u16 + 6).clamp(40, area.width.max(40));
        let popup_area = centered_popup(area, width, 7);

        frame.render_widget(Clear, popup_area);

        let content = vec![
            Line::from(""),
            Line::from(Span::styled(
                question,
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    " y ",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(accept),
                Span::styled(
                    " n/Esc ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::raw("No, cancel"),
            ]),
        ];

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(title)
                    .title_style(
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, popup_area);
    }
}

impl Component for ConfirmDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::ConfirmModal),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs the modal for its text, see draw_for
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_keys() {
        let mut dialog = ConfirmDialog;
        let key = |c| KeyEvent::new(c, KeyModifiers::NONE);

        assert_eq!(
            dialog.handle_key_event(key(KeyCode::Char('y'))).unwrap(),
            Some(Action::ConfirmModal)
        );
        assert_eq!(
            dialog.handle_key_event(key(KeyCode::Esc)).unwrap(),
            Some(Action::CloseModal)
        );
        assert_eq!(dialog.handle_key_event(key(KeyCode::Char('x'))).unwrap(), None);
    }

    #[test]
    fn test_delete_prompt_names_dataset() {
        let (_, question, _) = ConfirmDialog::prompt(&Modal::DeleteConfirm {
            name: "sales".into(),
        })
        .unwrap();
        assert_eq!(question, "Are you sure you want to remove 'sales'?");
        assert!(ConfirmDialog::prompt(&Modal::Help { scroll_offset: 0 }).is_none());
    }
}
