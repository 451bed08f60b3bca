//! Dashboard state and its reducer
//!
//! `DashboardState` is owned by the app. Every request completion and user
//! edit is expressed as a `StateEvent`, and `reduce` produces the next
//! snapshot from the current one. A completion either applies all of its
//! effects in one `reduce` call or none of them.

use super::history::{Answer, QaExchange, QaHistory};
use super::notification::Notification;
use super::rows::{Row, RowPreview};
use std::path::PathBuf;
use thiserror::Error;

/// Row count used when nothing else is configured
pub const DEFAULT_TOP_N: &str = "5";

/// Client-side checks that stop a request before it is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("Please select a dataset first.")]
    NoDatasetSelected,
    #[error("Please select a dataset and enter a question.")]
    MissingQuestion,
    #[error("Please choose a file.")]
    NoFileChosen,
    #[error("A question is already being answered. Please wait.")]
    QueryInFlight,
}

/// Everything that can change the dashboard state
#[derive(Debug, Clone, PartialEq)]
pub enum StateEvent {
    /// Fresh registry from the backend
    DatasetsLoaded(Vec<String>),
    /// User picked a dataset
    DatasetSelected(String),
    /// Row-count input changed
    TopNEdited(String),
    RowsLoaded { dataset: String, rows: Vec<Row> },
    QueryStarted,
    QueryAnswered {
        dataset: String,
        question: String,
        answer: Answer,
    },
    QueryFailed(String),
    UploadFileChosen(PathBuf),
    /// Upload accepted; `datasets` is the refreshed registry if re-listing worked
    Uploaded {
        message: String,
        datasets: Option<Vec<String>>,
    },
    /// Dataset deleted; `datasets` is the refreshed registry if re-listing worked
    DatasetRemoved {
        name: String,
        message: String,
        datasets: Option<Vec<String>>,
    },
    HistoryCleared,
    Notify(Notification),
    NotificationDismissed,
}

/// Session state of the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    /// Known dataset names, in backend order
    pub datasets: Vec<String>,
    /// Active dataset; always `None` or a member of `datasets`
    pub selected: Option<String>,
    /// Raw row-count input, passed through to the backend
    pub top_n: String,
    pub preview: RowPreview,
    /// Latest answer for the selected dataset
    pub live: Option<Answer>,
    pub history: QaHistory,
    pub pending_upload: Option<PathBuf>,
    pub query_in_flight: bool,
    pub notification: Option<Notification>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}

impl DashboardState {
    pub fn new(top_n: impl Into<String>) -> Self {
        Self {
            datasets: Vec::new(),
            selected: None,
            top_n: top_n.into(),
            preview: RowPreview::default(),
            live: None,
            history: QaHistory::new(),
            pending_upload: None,
            query_in_flight: false,
            notification: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Preconditions
    // ─────────────────────────────────────────────────────────────────────────

    /// Dataset and row count for a preview request
    pub fn check_fetch_rows(&self) -> Result<(String, String), Precondition> {
        let dataset = self
            .selected
            .clone()
            .ok_or(Precondition::NoDatasetSelected)?;
        Ok((dataset, self.top_n.trim().to_string()))
    }

    /// Dataset and question for a query request
    pub fn check_query(&self, question: &str) -> Result<(String, String), Precondition> {
        if self.query_in_flight {
            return Err(Precondition::QueryInFlight);
        }
        match &self.selected {
            Some(dataset) if !question.trim().is_empty() => {
                Ok((dataset.clone(), question.to_string()))
            }
            _ => Err(Precondition::MissingQuestion),
        }
    }

    pub fn check_upload(&self) -> Result<PathBuf, Precondition> {
        self.pending_upload.clone().ok_or(Precondition::NoFileChosen)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.as_deref() == Some(name)
    }

    /// Preview columns, inferred from the first row
    pub fn columns(&self) -> Vec<String> {
        self.preview.columns()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reducer
    // ─────────────────────────────────────────────────────────────────────────

    /// Produce the state that follows `event`
    pub fn reduce(&self, event: StateEvent) -> DashboardState {
        let mut next = self.clone();
        match event {
            StateEvent::DatasetsLoaded(datasets) => {
                next.replace_registry(datasets);
            }
            StateEvent::DatasetSelected(name) => {
                if next.datasets.contains(&name) && !next.is_selected(&name) {
                    next.selected = Some(name);
                    next.clear_dependent();
                }
            }
            StateEvent::TopNEdited(top_n) => {
                next.top_n = top_n;
            }
            StateEvent::RowsLoaded { dataset, rows } => {
                // A reply for a dataset that is no longer active is stale
                if next.is_selected(&dataset) {
                    next.preview = RowPreview::new(dataset, rows);
                }
            }
            StateEvent::QueryStarted => {
                next.query_in_flight = true;
            }
            StateEvent::QueryAnswered {
                dataset,
                question,
                answer,
            } => {
                next.query_in_flight = false;
                if next.is_selected(&dataset) {
                    next.live = Some(answer.clone());
                }
                next.history.push(QaExchange::new(question, dataset, answer));
            }
            StateEvent::QueryFailed(message) => {
                next.query_in_flight = false;
                next.notification = Some(Notification::error(message));
            }
            StateEvent::UploadFileChosen(path) => {
                next.pending_upload = Some(path);
            }
            StateEvent::Uploaded { message, datasets } => {
                next.pending_upload = None;
                match datasets {
                    Some(datasets) => {
                        next.replace_registry(datasets);
                        next.notification = Some(Notification::info(message));
                    }
                    None => {
                        next.notification = Some(Notification::info(format!(
                            "{} (dataset list could not be refreshed)",
                            message
                        )));
                    }
                }
            }
            StateEvent::DatasetRemoved {
                name,
                message,
                datasets,
            } => {
                let datasets = datasets.unwrap_or_else(|| {
                    next.datasets
                        .iter()
                        .filter(|d| **d != name)
                        .cloned()
                        .collect()
                });
                next.replace_registry(datasets);
                next.notification = Some(Notification::info(message));
            }
            StateEvent::HistoryCleared => {
                next.history.clear();
            }
            StateEvent::Notify(notification) => {
                next.notification = Some(notification);
            }
            StateEvent::NotificationDismissed => {
                next.notification = None;
            }
        }
        next
    }

    /// Swap in a new registry and re-establish the selection invariant
    fn replace_registry(&mut self, datasets: Vec<String>) {
        self.datasets = datasets;

        let still_present = self
            .selected
            .as_ref()
            .is_some_and(|s| self.datasets.contains(s));

        if !still_present {
            self.selected = self.datasets.first().cloned();
            self.clear_dependent();
        }
    }

    /// Drop everything derived from the previously active dataset
    fn clear_dependent(&mut self) {
        self.preview = RowPreview::default();
        self.live = None;
    }
}
