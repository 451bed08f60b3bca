//! Root application component
//!
//! The App owns the dashboard state and the request runner. It turns
//! Actions into precondition checks, background requests and state events,
//! and delegates rendering to child components.

use crate::action::Action;
use crate::component::Component;
use crate::components::{draw_dashboard, ConfirmDialog, HelpDialog, HistoryDialog, HomeComponent};
use crate::config::Config;
use crate::model::modal::{Modal, ModalStack};
use crate::model::{ChartImage, DashboardState, Notification, Panel, Precondition, StateEvent};
use crate::services::{ApiClient, ApiRequest, RequestRunner};
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use std::time::Instant;
use tracing::{debug, info, warn};

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

pub struct App {
    /// Dashboard data, replaced by every reduce
    pub state: DashboardState,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Background request runner
    pub runner: RequestRunner,

    pub config: Config,

    pub should_quit: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub home: HomeComponent,
    pub confirm_dialog: ConfirmDialog,
    pub history_dialog: HistoryDialog,
    pub help_dialog: HelpDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    pub fn new(config: Config) -> Result<App> {
        let client = ApiClient::new(&config.base_url)?;
        Ok(App {
            state: DashboardState::new(config.default_top_n.clone()),
            modals: ModalStack::new(),
            runner: RequestRunner::new(client),
            config,
            should_quit: false,
            home: HomeComponent::new(),
            confirm_dialog: ConfirmDialog,
            history_dialog: HistoryDialog::default(),
            help_dialog: HelpDialog::default(),
        })
    }

    /// Fold one event into the state and keep UI cursors consistent with it
    fn apply(&mut self, event: StateEvent) {
        let next = self.state.reduce(event);

        if next.datasets != self.state.datasets || next.selected != self.state.selected {
            self.home.sync_dataset_cursor(&next);
        }
        if next.preview != self.state.preview {
            self.home.preview_table.reset();
        }
        self.home.clamp_history_cursor(next.history.len());

        self.state = next;
    }

    fn reject(&mut self, precondition: Precondition) {
        debug!(%precondition, "request blocked");
        self.apply(StateEvent::Notify(Notification::error(precondition.to_string())));
    }

    fn dispatch(&mut self, request: ApiRequest) {
        self.runner.spawn(request);
    }

    /// Apply every request that finished since the last tick
    fn drain_completions(&mut self) {
        for completion in self.runner.poll() {
            let event = completion.into_event();
            match &event {
                StateEvent::Notify(n) if n.is_error() => warn!(message = %n.message, "request failed"),
                StateEvent::QueryFailed(message) => warn!(%message, "question failed"),
                _ => debug!("request completed"),
            }
            self.apply(event);
        }
    }

    /// Chart shown in the history dialog if it is open, else the live chart
    fn chart_to_save(&self) -> Option<ChartImage> {
        if let Some(Modal::History { .. }) = self.modals.top() {
            let idx = self
                .history_dialog
                .selected_index
                .min(self.state.history.len().saturating_sub(1));
            return self.state.history.get(idx)?.graph_image().cloned();
        }
        self.state.live.as_ref()?.graph_image().cloned()
    }

    fn save_chart(&mut self) {
        let Some(chart) = self.chart_to_save() else {
            self.apply(StateEvent::Notify(Notification::error("No chart to save.")));
            return;
        };

        let notification = match chart.save_to(&self.config.chart_dir()) {
            Ok(path) => {
                info!(path = %path.display(), "chart saved");
                Notification::info(format!("Chart saved to {}", path.display()))
            }
            Err(e) => {
                warn!(error = %e, "chart save failed");
                Notification::error(format!("Could not save chart: {}", e))
            }
        };
        self.apply(StateEvent::Notify(notification));
    }

    fn edit_top_n(&mut self, edit: impl FnOnce(&mut String)) {
        let mut top_n = self.state.top_n.clone();
        edit(&mut top_n);
        self.apply(StateEvent::TopNEdited(top_n));
    }

    fn history_modal_changed(&mut self) {
        let (selected, scroll) = (
            self.history_dialog.selected_index,
            self.history_dialog.detail_scroll,
        );
        if let Some(Modal::History {
            selected_index,
            detail_scroll,
        }) = self.modals.top_mut()
        {
            *selected_index = selected;
            *detail_scroll = scroll;
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        info!(base_url = %self.config.base_url, "loading datasets");
        self.dispatch(ApiRequest::ListDatasets);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.modals.top() {
            Some(Modal::QuitConfirm) | Some(Modal::DeleteConfirm { .. }) => {
                self.confirm_dialog.handle_key_event(key)
            }
            Some(Modal::History { .. }) => self.history_dialog.handle_key_event(key),
            Some(Modal::Help { .. }) => self.help_dialog.handle_key_event(key),
            None => self.home.handle_key_event(key),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let in_history = matches!(self.modals.top(), Some(Modal::History { .. }));

        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                self.drain_completions();
                if self.runner.in_flight() > 0 {
                    self.home.tick_spinner();
                }
                let expired = self
                    .state
                    .notification
                    .as_ref()
                    .is_some_and(|n| n.is_expired(Instant::now()));
                if expired {
                    self.apply(StateEvent::NotificationDismissed);
                }
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Navigation
            // ─────────────────────────────────────────────────────────────────
            Action::NextPanel | Action::PrevPanel => {
                self.home.update(action)?;
            }
            Action::NextItem => self.home.next(&self.state),
            Action::PrevItem => self.home.previous(&self.state),
            Action::ScrollUp | Action::ScrollDown | Action::PageUp | Action::PageDown
                if in_history =>
            {
                self.history_dialog.update(action)?;
                self.history_modal_changed();
            }
            Action::ScrollDown => self.home.next(&self.state),
            Action::ScrollUp => self.home.previous(&self.state),
            Action::PageDown => {
                let total = self.state.preview.rows.len() + 6;
                self.home.preview_table.scroll_down(10, total);
            }
            Action::PageUp => self.home.preview_table.scroll_up(10),

            // ─────────────────────────────────────────────────────────────────
            // Text Input
            // ─────────────────────────────────────────────────────────────────
            Action::Input(c) if self.home.focus == Panel::Preview => {
                self.edit_top_n(|top_n| top_n.push(c));
            }
            Action::Backspace if self.home.focus == Panel::Preview => {
                self.edit_top_n(|top_n| {
                    top_n.pop();
                });
            }
            Action::Input(_) | Action::Backspace => {
                self.home.update(action)?;
            }

            // ─────────────────────────────────────────────────────────────────
            // Datasets
            // ─────────────────────────────────────────────────────────────────
            Action::SelectDataset => {
                if let Some(name) = self.home.cursor_dataset(&self.state).map(str::to_string) {
                    info!(dataset = %name, "dataset selected");
                    self.apply(StateEvent::DatasetSelected(name));
                }
            }
            Action::RefreshDatasets => {
                self.dispatch(ApiRequest::ListDatasets);
            }
            Action::RequestDelete => {
                if let Some(name) = self.home.cursor_dataset(&self.state).map(str::to_string) {
                    self.modals.push(Modal::DeleteConfirm { name });
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Requests
            // ─────────────────────────────────────────────────────────────────
            Action::ChooseUploadFile(path) => {
                self.apply(StateEvent::UploadFileChosen(path));
                return Ok(Some(Action::SubmitUpload));
            }
            Action::SubmitUpload => match self.state.check_upload() {
                Ok(path) => self.dispatch(ApiRequest::Upload { path }),
                Err(p) => self.reject(p),
            },
            Action::FetchRows => match self.state.check_fetch_rows() {
                Ok((dataset, top)) => self.dispatch(ApiRequest::FetchRows { dataset, top }),
                Err(p) => self.reject(p),
            },
            Action::SubmitQuestion => match self.state.check_query(&self.home.question_input) {
                Ok((dataset, question)) => {
                    self.apply(StateEvent::QueryStarted);
                    self.dispatch(ApiRequest::Ask { dataset, question });
                }
                Err(p) => self.reject(p),
            },

            // ─────────────────────────────────────────────────────────────────
            // Results
            // ─────────────────────────────────────────────────────────────────
            Action::SaveChart => self.save_chart(),
            Action::ClearHistory => {
                self.apply(StateEvent::HistoryCleared);
                self.history_dialog.open_at(0);
                self.history_modal_changed();
            }
            Action::DismissNotification => {
                self.apply(StateEvent::NotificationDismissed);
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHistory(index) => {
                self.history_dialog.open_at(index);
                self.modals.push(Modal::History {
                    selected_index: index,
                    detail_scroll: 0,
                });
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help { scroll_offset: 0 });
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ConfirmModal => match self.modals.top().cloned() {
                Some(Modal::QuitConfirm) => {
                    self.should_quit = true;
                }
                Some(Modal::DeleteConfirm { name }) => {
                    self.modals.pop();
                    info!(dataset = %name, "removing dataset");
                    self.dispatch(ApiRequest::Remove { name });
                }
                _ => {}
            },
            Action::ModalUp if in_history => {
                self.history_dialog.update(Action::ModalUp)?;
                self.history_modal_changed();
            }
            Action::ModalDown if in_history => {
                // Clamp before incrementing
                let max = self.state.history.len().saturating_sub(1);
                if self.history_dialog.selected_index < max {
                    self.history_dialog.update(Action::ModalDown)?;
                }
                self.history_modal_changed();
            }
            Action::ModalUp | Action::ModalDown => {}
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        draw_dashboard(
            frame,
            area,
            &mut self.home,
            &self.state,
            &self.config.base_url,
        );

        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm | Modal::DeleteConfirm { .. } => {
                self.confirm_dialog.draw_for(frame, area, modal);
            }
            Modal::History { .. } => {
                self.history_dialog
                    .draw_with_history(frame, area, self.state.history.entries())?;
            }
            Modal::Help { .. } => {
                self.help_dialog.draw(frame, area)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Answer;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn config(base_url: &str, chart_dir: &std::path::Path) -> Config {
        Config {
            base_url: base_url.to_string(),
            default_top_n: "5".to_string(),
            chart_dir: Some(chart_dir.to_path_buf()),
        }
    }

    /// App pointed at a port nothing listens on
    fn offline_app() -> App {
        App::new(config("http://127.0.0.1:1", std::path::Path::new("charts"))).unwrap()
    }

    fn with_datasets(app: &mut App, names: &[&str]) {
        app.apply(StateEvent::DatasetsLoaded(
            names.iter().map(|s| s.to_string()).collect(),
        ));
    }

    /// Tick until every dispatched request has been applied
    fn settle(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.runner.in_flight() > 0 && Instant::now() < deadline {
            app.update(Action::Tick).unwrap();
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(app.runner.in_flight(), 0, "requests did not finish");
    }

    fn notification(app: &App) -> String {
        app.state
            .notification
            .as_ref()
            .map(|n| n.message.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_fetch_rows_requires_selection() {
        let mut app = offline_app();

        app.update(Action::FetchRows).unwrap();

        assert_eq!(notification(&app), "Please select a dataset first.");
        assert_eq!(app.runner.in_flight(), 0);
    }

    #[test]
    fn test_blank_question_is_rejected() {
        let mut app = offline_app();
        with_datasets(&mut app, &["sales"]);
        app.home.question_input = "   ".into();

        app.update(Action::SubmitQuestion).unwrap();

        assert_eq!(
            notification(&app),
            "Please select a dataset and enter a question."
        );
        assert!(!app.state.query_in_flight);
        assert_eq!(app.runner.in_flight(), 0);
    }

    #[test]
    fn test_second_question_rejected_while_busy() {
        let mut app = offline_app();
        with_datasets(&mut app, &["sales"]);
        app.apply(StateEvent::QueryStarted);
        app.home.question_input = "another?".into();

        app.update(Action::SubmitQuestion).unwrap();

        assert_eq!(
            notification(&app),
            "A question is already being answered. Please wait."
        );
        assert_eq!(app.runner.in_flight(), 0);
    }

    #[test]
    fn test_upload_without_file() {
        let mut app = offline_app();
        app.update(Action::SubmitUpload).unwrap();
        assert_eq!(notification(&app), "Please choose a file.");
    }

    #[test]
    fn test_choosing_file_chains_submit() {
        let mut app = offline_app();
        let next = app
            .update(Action::ChooseUploadFile("data/sales.csv".into()))
            .unwrap();

        assert_eq!(next, Some(Action::SubmitUpload));
        assert_eq!(
            app.state.pending_upload.as_deref(),
            Some(std::path::Path::new("data/sales.csv"))
        );
    }

    #[test]
    fn test_top_n_typed_into_state() {
        let mut app = offline_app();
        app.home.focus = Panel::Preview;

        app.update(Action::Backspace).unwrap();
        app.update(Action::Input('1')).unwrap();
        app.update(Action::Input('2')).unwrap();

        assert_eq!(app.state.top_n, "12");
        assert!(app.home.question_input.is_empty());
    }

    #[test]
    fn test_load_fetch_and_ask() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/list")
            .with_body(r#"["sales","inventory"]"#)
            .create();
        server
            .mock("GET", "/data")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("name".into(), "sales".into()),
                Matcher::UrlEncoded("top".into(), "5".into()),
            ]))
            .with_body(r#"{"rows":[{"id":1,"amount":9.5},{"id":2,"amount":3}]}"#)
            .create();
        server
            .mock("POST", "/query")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("name".into(), "sales".into()),
                Matcher::UrlEncoded("question".into(), "total amount?".into()),
            ]))
            .with_body(r#"{"answer":"12.5","isGraph":false}"#)
            .create();

        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(config(&server.url(), dir.path())).unwrap();
        app.init().unwrap();
        settle(&mut app);

        assert_eq!(app.state.datasets, vec!["sales", "inventory"]);
        assert_eq!(app.state.selected.as_deref(), Some("sales"));
        assert_eq!(app.home.cursor_dataset(&app.state), Some("sales"));

        app.update(Action::FetchRows).unwrap();
        settle(&mut app);
        assert_eq!(app.state.columns(), vec!["id", "amount"]);

        app.home.question_input = "total amount?".into();
        app.update(Action::SubmitQuestion).unwrap();
        assert!(app.state.query_in_flight);
        settle(&mut app);

        assert!(!app.state.query_in_flight);
        assert_eq!(app.state.live, Some(Answer::Text("12.5".into())));
        assert_eq!(app.state.history.len(), 1);
        assert_eq!(app.home.history_list.selected(), Some(0));
    }

    #[test]
    fn test_confirmed_delete_removes_and_relists() {
        let mut server = mockito::Server::new();
        server
            .mock("DELETE", "/remove")
            .match_query(Matcher::UrlEncoded("name".into(), "sales".into()))
            .with_body(r#"{"message":"Dataset 'sales' removed successfully."}"#)
            .create();
        server
            .mock("GET", "/list")
            .with_body(r#"["inventory"]"#)
            .create();

        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(config(&server.url(), dir.path())).unwrap();
        with_datasets(&mut app, &["sales", "inventory"]);

        app.update(Action::RequestDelete).unwrap();
        assert_eq!(
            app.modals.top(),
            Some(&Modal::DeleteConfirm {
                name: "sales".into()
            })
        );

        app.update(Action::ConfirmModal).unwrap();
        assert!(app.modals.is_empty());
        settle(&mut app);

        assert_eq!(app.state.datasets, vec!["inventory"]);
        assert_eq!(app.state.selected.as_deref(), Some("inventory"));
        assert_eq!(notification(&app), "Dataset 'sales' removed successfully.");
    }

    #[test]
    fn test_cancelled_delete_sends_nothing() {
        let mut app = offline_app();
        with_datasets(&mut app, &["sales"]);

        app.update(Action::RequestDelete).unwrap();
        app.update(Action::CloseModal).unwrap();

        assert!(app.modals.is_empty());
        assert_eq!(app.runner.in_flight(), 0);
        assert_eq!(app.state.datasets, vec!["sales"]);
    }

    #[test]
    fn test_save_live_chart() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(config("http://127.0.0.1:1", dir.path())).unwrap();
        with_datasets(&mut app, &["sales"]);
        app.apply(StateEvent::QueryAnswered {
            dataset: "sales".into(),
            question: "plot it".into(),
            answer: Answer::Graph(ChartImage::from_base64("iVBORw0KGgo=")),
        });

        app.update(Action::SaveChart).unwrap();

        let saved: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(saved.len(), 1);
        assert!(notification(&app).starts_with("Chart saved to "));
    }

    #[test]
    fn test_save_without_chart() {
        let mut app = offline_app();
        app.update(Action::SaveChart).unwrap();
        assert_eq!(notification(&app), "No chart to save.");
    }

    #[test]
    fn test_history_dialog_navigation_and_clear() {
        let mut app = offline_app();
        with_datasets(&mut app, &["sales"]);
        for q in ["one", "two"] {
            app.apply(StateEvent::QueryAnswered {
                dataset: "sales".into(),
                question: q.into(),
                answer: Answer::Text("x".into()),
            });
        }

        app.update(Action::OpenHistory(0)).unwrap();
        app.update(Action::ModalDown).unwrap();
        app.update(Action::ModalDown).unwrap();
        assert_eq!(
            app.modals.top(),
            Some(&Modal::History {
                selected_index: 1,
                detail_scroll: 0
            })
        );

        app.update(Action::ClearHistory).unwrap();
        assert!(app.state.history.is_empty());
        assert_eq!(app.home.history_list.selected(), None);
    }

    #[test]
    fn test_quit_confirmation() {
        let mut app = offline_app();
        app.update(Action::OpenQuitDialog).unwrap();
        assert!(!app.should_quit);
        app.update(Action::ConfirmModal).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_render_empty_dashboard() {
        let mut app = offline_app();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

        terminal
            .draw(|frame| app.draw(frame, frame.area()).unwrap())
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("No datasets found. Upload one!"));
        assert!(text.contains("No prompts yet."));
    }

    #[test]
    fn test_render_delete_dialog() {
        let mut app = offline_app();
        with_datasets(&mut app, &["sales"]);
        app.update(Action::RequestDelete).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

        terminal
            .draw(|frame| app.draw(frame, frame.area()).unwrap())
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Are you sure you want to remove 'sales'?"));
    }
}
