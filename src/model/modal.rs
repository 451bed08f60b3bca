//! Modal stack for managing overlays
//!
//! Only the top modal is drawn and receives input.

/// Represents a modal overlay that can be displayed on top of the dashboard
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// Confirmation before deleting a dataset
    DeleteConfirm { name: String },
    /// Q&A history list and detail view
    History {
        selected_index: usize,
        detail_scroll: usize,
    },
    /// Help dialog showing all keyboard shortcuts
    Help { scroll_offset: usize },
}

/// A stack of modal overlays
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Modal> {
        self.stack.last_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_stack_push_pop() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::History {
            selected_index: 0,
            detail_scroll: 0,
        });
        stack.push(Modal::DeleteConfirm {
            name: "sales".into(),
        });

        assert_eq!(
            stack.pop(),
            Some(Modal::DeleteConfirm {
                name: "sales".into()
            })
        );
        assert!(matches!(stack.pop(), Some(Modal::History { .. })));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_modal_stack_top_mut() {
        let mut stack = ModalStack::new();
        stack.push(Modal::Help { scroll_offset: 0 });

        if let Some(Modal::Help { scroll_offset }) = stack.top_mut() {
            *scroll_offset = 4;
        }

        assert_eq!(stack.top(), Some(&Modal::Help { scroll_offset: 4 }));
    }
}
