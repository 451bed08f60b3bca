//! Action enum - All possible application actions
//!
//! Components translate key events into Actions; the App applies them,
//! possibly producing a follow-up Action.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick: drain finished requests, expire notifications
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Focus the next panel
    NextPanel,
    /// Focus the previous panel
    PrevPanel,
    /// Move the cursor down in the focused list
    NextItem,
    /// Move the cursor up in the focused list
    PrevItem,
    /// Scroll the focused content up one line
    ScrollUp,
    /// Scroll the focused content down one line
    ScrollDown,
    PageUp,
    PageDown,

    // ─────────────────────────────────────────────────────────────────────────
    // Text Input
    // ─────────────────────────────────────────────────────────────────────────
    /// Type a character into the focused input
    Input(char),
    /// Delete the last character of the focused input
    Backspace,

    // ─────────────────────────────────────────────────────────────────────────
    // Datasets
    // ─────────────────────────────────────────────────────────────────────────
    /// Make the dataset under the cursor active
    SelectDataset,
    /// Re-list datasets from the backend
    RefreshDatasets,
    /// Ask for confirmation before deleting the dataset under the cursor
    RequestDelete,

    // ─────────────────────────────────────────────────────────────────────────
    // Requests
    // ─────────────────────────────────────────────────────────────────────────
    /// Remember a file for upload
    ChooseUploadFile(PathBuf),
    /// Upload the chosen file
    SubmitUpload,
    /// Fetch the top-N rows of the active dataset
    FetchRows,
    /// Ask the typed question about the active dataset
    SubmitQuestion,

    // ─────────────────────────────────────────────────────────────────────────
    // Results
    // ─────────────────────────────────────────────────────────────────────────
    /// Write the live chart to the chart directory
    SaveChart,
    /// Empty the question history
    ClearHistory,
    /// Hide the current notification
    DismissNotification,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    OpenQuitDialog,
    /// Open history detail at the given entry
    OpenHistory(usize),
    OpenHelp,
    /// Close the current modal
    CloseModal,
    /// Confirm the current modal action
    ConfirmModal,
    /// Previous entry inside a modal
    ModalUp,
    /// Next entry inside a modal
    ModalDown,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextPanel => write!(f, "NextPanel"),
            Action::PrevPanel => write!(f, "PrevPanel"),
            Action::NextItem => write!(f, "NextItem"),
            Action::PrevItem => write!(f, "PrevItem"),
            Action::ScrollUp => write!(f, "ScrollUp"),
            Action::ScrollDown => write!(f, "ScrollDown"),
            Action::PageUp => write!(f, "PageUp"),
            Action::PageDown => write!(f, "PageDown"),
            Action::Input(c) => write!(f, "Input('{}')", c),
            Action::Backspace => write!(f, "Backspace"),
            Action::SelectDataset => write!(f, "SelectDataset"),
            Action::RefreshDatasets => write!(f, "RefreshDatasets"),
            Action::RequestDelete => write!(f, "RequestDelete"),
            Action::ChooseUploadFile(path) => write!(f, "ChooseUploadFile({})", path.display()),
            Action::SubmitUpload => write!(f, "SubmitUpload"),
            Action::FetchRows => write!(f, "FetchRows"),
            Action::SubmitQuestion => write!(f, "SubmitQuestion"),
            Action::SaveChart => write!(f, "SaveChart"),
            Action::ClearHistory => write!(f, "ClearHistory"),
            Action::DismissNotification => write!(f, "DismissNotification"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHistory(index) => write!(f, "OpenHistory({})", index),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
            Action::ModalUp => write!(f, "ModalUp"),
            Action::ModalDown => write!(f, "ModalDown"),
        }
    }
}
