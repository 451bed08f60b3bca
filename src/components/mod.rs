//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod confirm_dialog;
pub mod help_dialog;
pub mod history_dialog;
pub mod home;
pub mod layout;
pub mod table;

pub use confirm_dialog::ConfirmDialog;
pub use help_dialog::HelpDialog;
pub use history_dialog::HistoryDialog;
pub use home::{draw_dashboard, HomeComponent};
pub use layout::{calculate_dashboard_layout, centered_popup, inset};
pub use table::PreviewTable;
