//! Background request runner
//!
//! Each request runs on its own thread with a clone of the API client and
//! reports back over a channel. The app drains completions on every tick,
//! so state changes are applied one at a time on the UI thread.

use crate::model::history::Answer;
use crate::model::notification::Notification;
use crate::model::rows::Row;
use crate::model::state::StateEvent;
use crate::services::api::{ApiClient, ApiError, QueryReply};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use tracing::{info, warn};

/// Work the runner can perform against the backend
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    ListDatasets,
    FetchRows { dataset: String, top: String },
    Ask { dataset: String, question: String },
    Upload { path: PathBuf },
    Remove { name: String },
}

/// Outcome of an `ApiRequest`
#[derive(Debug)]
pub enum ApiCompletion {
    Datasets(Result<Vec<String>, ApiError>),
    Rows {
        dataset: String,
        result: Result<Vec<Row>, ApiError>,
    },
    Answer {
        dataset: String,
        question: String,
        result: Result<QueryReply, ApiError>,
    },
    /// Upload result; on success `datasets` holds the re-listed registry
    Uploaded {
        result: Result<String, ApiError>,
        datasets: Option<Vec<String>>,
    },
    /// Removal result; on success `datasets` holds the re-listed registry
    Removed {
        name: String,
        result: Result<String, ApiError>,
        datasets: Option<Vec<String>>,
    },
}

impl ApiCompletion {
    /// Translate the outcome into the state change it causes
    pub fn into_event(self) -> StateEvent {
        match self {
            ApiCompletion::Datasets(Ok(datasets)) => StateEvent::DatasetsLoaded(datasets),
            ApiCompletion::Datasets(Err(e)) => notify_error(describe(
                &e,
                "Error loading datasets",
                "Could not reach the backend",
            )),
            ApiCompletion::Rows {
                dataset,
                result: Ok(rows),
            } => StateEvent::RowsLoaded { dataset, rows },
            ApiCompletion::Rows { result: Err(e), .. } => {
                notify_error(describe(&e, "Error fetching data", "Request failed"))
            }
            ApiCompletion::Answer {
                dataset,
                question,
                result: Ok(reply),
            } => StateEvent::QueryAnswered {
                dataset,
                question,
                answer: Answer::from_reply(reply.answer, reply.is_graph),
            },
            ApiCompletion::Answer { result: Err(e), .. } => {
                let message = match &e {
                    ApiError::Server { .. } => {
                        format!("Error: {}", e.detail().unwrap_or("query failed"))
                    }
                    _ => "Query request failed".to_string(),
                };
                StateEvent::QueryFailed(message)
            }
            ApiCompletion::Uploaded {
                result: Ok(message),
                datasets,
            } => StateEvent::Uploaded { message, datasets },
            ApiCompletion::Uploaded { result: Err(e), .. } => {
                notify_error(describe(&e, "Error uploading file", "Upload failed"))
            }
            ApiCompletion::Removed {
                name,
                result: Ok(message),
                datasets,
            } => StateEvent::DatasetRemoved {
                name,
                message,
                datasets,
            },
            ApiCompletion::Removed { result: Err(e), .. } => {
                let message = match &e {
                    ApiError::Server { .. } => format!(
                        "Error removing dataset: {}",
                        e.detail().unwrap_or("unknown error")
                    ),
                    _ => "Remove request failed".to_string(),
                };
                notify_error(message)
            }
        }
    }
}

fn notify_error(message: String) -> StateEvent {
    StateEvent::Notify(Notification::error(message))
}

/// Pick the user-facing text for a failed request
fn describe(err: &ApiError, server_fallback: &str, transport_fallback: &str) -> String {
    match err {
        ApiError::Server { .. } => err.user_message(server_fallback),
        ApiError::File { .. } => err.to_string(),
        ApiError::Transport(_) => transport_fallback.to_string(),
    }
}

/// Runs API requests off the UI thread
pub struct RequestRunner {
    client: ApiClient,
    sender: Sender<ApiCompletion>,
    receiver: Receiver<ApiCompletion>,
    in_flight: usize,
}

impl RequestRunner {
    pub fn new(client: ApiClient) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            client,
            sender,
            receiver,
            in_flight: 0,
        }
    }

    /// Number of requests still running
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Start a request in the background
    pub fn spawn(&mut self, request: ApiRequest) {
        info!(request = ?request, "dispatching request");
        let client = self.client.clone();
        let tx = self.sender.clone();
        self.in_flight += 1;

        thread::spawn(move || {
            let completion = Self::execute(&client, request);
            let _ = tx.send(completion);
        });
    }

    /// Drain finished requests without blocking
    pub fn poll(&mut self) -> Vec<ApiCompletion> {
        let mut done = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(completion) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    done.push(completion);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        done
    }

    /// Run a request to completion on the current thread
    pub fn execute(client: &ApiClient, request: ApiRequest) -> ApiCompletion {
        match request {
            ApiRequest::ListDatasets => ApiCompletion::Datasets(client.list_datasets()),
            ApiRequest::FetchRows { dataset, top } => {
                let result = client.fetch_rows(&dataset, &top);
                ApiCompletion::Rows { dataset, result }
            }
            ApiRequest::Ask { dataset, question } => {
                let result = client.ask(&dataset, &question);
                ApiCompletion::Answer {
                    dataset,
                    question,
                    result,
                }
            }
            ApiRequest::Upload { path } => {
                let result = client.upload(&path);
                let datasets = result.as_ref().ok().and_then(|_| relist(client));
                ApiCompletion::Uploaded { result, datasets }
            }
            ApiRequest::Remove { name } => {
                let result = client.remove(&name);
                let datasets = result.as_ref().ok().and_then(|_| relist(client));
                ApiCompletion::Removed {
                    name,
                    result,
                    datasets,
                }
            }
        }
    }
}

/// Refresh the registry after a mutation
fn relist(client: &ApiClient) -> Option<Vec<String>> {
    match client.list_datasets() {
        Ok(datasets) => Some(datasets),
        Err(e) => {
            warn!(error = %e, "failed to refresh dataset list");
            None
        }
    }
}
