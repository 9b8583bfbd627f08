//! Main (quick-launch) window controller.
//!
//! Ties the selection machine to the engine, the surface and the launcher.
//! Queries run on spawned tasks and come back as [`QueryResponse`]s, so the
//! window keeps taking keystrokes while the engine works.

use super::{ThemedWindow, WindowContext};
use crate::launcher::{LaunchOutcome, WindowLauncher};
use crate::selection::{Change, QueryTicket, SelectionMachine};
use crate::services::MatchEngine;
use crate::surface::MainSurface;
use crate::view::{ListView, render};
use crate::window::bring_forward;
use crate::{Error, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use unialias_types::{AppEvent, Candidate, DEFAULT_MAX_CANDIDATES, EventKind, Key};

/// Host input for the main window, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MainInput {
    Input(String),
    Key(Key),
    Click(usize),
    Open(String),
    Reload,
    SetTheme(String),
}

/// Engine answer for one issued query
#[derive(Debug)]
pub struct QueryResponse {
    pub seq: u64,
    pub result: Result<Vec<Candidate>>,
}

pub struct MainController<E: MatchEngine> {
    window: ThemedWindow,
    surface: Arc<dyn MainSurface>,
    engine: Arc<E>,
    launcher: Arc<WindowLauncher>,
    machine: SelectionMachine,
    max_results: usize,
    responses_tx: mpsc::UnboundedSender<QueryResponse>,
    responses_rx: mpsc::UnboundedReceiver<QueryResponse>,
}

impl<E: MatchEngine> MainController<E> {
    /// Set up the main window and start loading the dataset.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        ctx: WindowContext,
        surface: Arc<dyn MainSurface>,
        engine: Arc<E>,
        launcher: Arc<WindowLauncher>,
    ) -> Self {
        let window = ThemedWindow::start(ctx, surface.clone(), &[EventKind::ShowWindow]);
        let (responses_tx, responses_rx) = mpsc::unbounded_channel();
        let controller = Self {
            window,
            surface,
            engine,
            launcher,
            machine: SelectionMachine::new(),
            max_results: DEFAULT_MAX_CANDIDATES,
            responses_tx,
            responses_rx,
        };
        controller.reload();
        controller
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    #[must_use]
    pub fn machine(&self) -> &SelectionMachine {
        &self.machine
    }

    #[must_use]
    pub fn theme(&self) -> &str {
        self.window.theme()
    }

    /// The global hotkey fired: show, restore, focus the window, then the input.
    pub fn on_show_window(&self) {
        if let Err(e) = bring_forward(self.window.handle().as_ref()) {
            warn!("Failed to bring main window forward: {e}");
            return;
        }
        self.surface.focus_input();
    }

    pub fn on_input(&mut self, text: &str) {
        let (change, ticket) = self.machine.input_changed(text);
        self.show_change(change);
        if let Some(ticket) = ticket {
            self.issue(ticket);
        }
    }

    fn issue(&self, ticket: QueryTicket) {
        let engine = Arc::clone(&self.engine);
        let tx = self.responses_tx.clone();
        let max_results = self.max_results;
        debug!("Query seq={} text='{}'", ticket.seq, ticket.text);
        tokio::spawn(async move {
            let result = engine.query_matches(&ticket.text, max_results).await;
            // Receiver gone means the window is gone
            let _ = tx.send(QueryResponse {
                seq: ticket.seq,
                result,
            });
        });
    }

    /// Wait for the next query response. Used by [`Self::run`] and by tests
    /// that drive the controller step by step.
    pub async fn recv_response(&mut self) -> Option<QueryResponse> {
        self.responses_rx.recv().await
    }

    pub fn on_response(&mut self, response: QueryResponse) {
        let candidates = match response.result {
            Ok(candidates) => candidates,
            Err(e @ Error::EngineUnavailable(_)) => {
                warn!("{e}");
                Vec::new()
            }
            Err(e) => {
                warn!("Query seq={} failed: {e}", response.seq);
                Vec::new()
            }
        };
        if self.machine.candidates_arrived(response.seq, candidates) {
            self.show_change(Change::List);
        }
    }

    /// Apply the keyboard contract. Returns whether the key was consumed.
    pub fn on_key(&mut self, key: Key) -> bool {
        match key {
            Key::Escape => {
                self.clear_and_hide();
                true
            }
            Key::Enter => {
                if let Some(candidate) = self.machine.confirm() {
                    self.commit(&candidate);
                    true
                } else {
                    false
                }
            }
            Key::Tab => {
                let change = self.machine.navigate_next();
                self.show_change(change);
                self.surface.focus_input();
                true
            }
            Key::ArrowDown => {
                let change = self.machine.navigate_next();
                self.show_change(change);
                change != Change::None
            }
            Key::ArrowUp => {
                let change = self.machine.navigate_prev();
                self.show_change(change);
                change != Change::None
            }
            Key::Other => false,
        }
    }

    /// A list item was clicked.
    pub fn on_click(&mut self, index: usize) {
        if let Some(candidate) = self.machine.confirm_at(index) {
            self.commit(&candidate);
        }
    }

    /// Hide first so the alias lands in whatever had focus before.
    fn commit(&mut self, candidate: &Candidate) {
        info!("Selected alias {}", candidate.text);
        self.clear_and_hide();

        let engine = Arc::clone(&self.engine);
        let alias = candidate.text.clone();
        tokio::spawn(async move {
            if let Err(e) = engine.select_alias(&alias).await {
                error!("Failed to select alias {alias}: {e}");
            }
        });
    }

    /// Reset query, list and cursor, empty the input field and hide.
    pub fn clear_and_hide(&mut self) {
        self.machine.clear();
        self.surface.clear_input();
        self.surface.render_list(&ListView::default());
        self.window.hide();
    }

    /// Reload the dataset in the background. Failures are logged only.
    pub fn reload(&self) {
        let engine = Arc::clone(&self.engine);
        tokio::spawn(async move {
            match engine.reload_dataset().await {
                Ok(()) => info!("Dataset loaded"),
                Err(e) => error!("Failed to load dataset: {e}"),
            }
        });
    }

    /// Open a satellite window with the current theme.
    ///
    /// # Errors
    ///
    /// Returns the launcher's error; it has already been logged.
    pub fn open_window(&self, name: &str) -> Result<LaunchOutcome> {
        self.launcher
            .open(name, self.window.theme())
            .inspect_err(|e| warn!("Failed to open {name}: {e}"))
    }

    pub fn set_theme(&mut self, theme: &str) {
        self.window.set_theme(theme);
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        if let Some(AppEvent::ShowWindow) = self.window.absorb(event) {
            self.on_show_window();
        }
    }

    pub fn handle_input(&mut self, input: MainInput) {
        match input {
            MainInput::Input(text) => self.on_input(&text),
            MainInput::Key(key) => {
                let consumed = self.on_key(key);
                debug!("Key {key:?} consumed={consumed}");
            }
            MainInput::Click(index) => self.on_click(index),
            MainInput::Open(name) => {
                let _ = self.open_window(&name);
            }
            MainInput::Reload => self.reload(),
            MainInput::SetTheme(theme) => self.set_theme(&theme),
        }
    }

    fn show_change(&self, change: Change) {
        match change {
            Change::None => {}
            Change::List => {
                let view = render(self.machine.candidates(), self.machine.cursor());
                self.surface.render_list(&view);
            }
            Change::Cursor { from, to } => self.surface.move_marker(from, to),
        }
    }

    /// Drive the window until its input channel or the event channel closes.
    pub async fn run(mut self, mut inputs: mpsc::UnboundedReceiver<MainInput>) {
        info!("Main window controller started");
        loop {
            tokio::select! {
                input = inputs.recv() => {
                    let Some(input) = input else {
                        info!("Main window input closed");
                        break;
                    };
                    self.handle_input(input);
                }

                Some(response) = self.responses_rx.recv() => {
                    self.on_response(response);
                }

                event = self.window.next_event() => {
                    let Some(event) = event else {
                        info!("Event channel closed, stopping main window");
                        break;
                    };
                    self.handle_event(event);
                }
            }
        }
    }
}
