//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `DashboardState` - Session data and the reducer that advances it
//! - `QaHistory` / `Answer` - Question/answer log and answer payloads
//! - `RowPreview` - Top rows of the active dataset
//! - `ModalStack` - Modal overlay management

pub mod chart;
pub mod history;
pub mod modal;
pub mod notification;
pub mod rows;
pub mod state;
pub mod ui;

// Re-export commonly used types
pub use chart::ChartImage;
pub use history::{Answer, QaExchange, QaHistory};
pub use notification::{Notification, NotificationLevel};
pub use rows::{Row, RowPreview};
pub use state::{DashboardState, Precondition, StateEvent};
pub use ui::Panel;
