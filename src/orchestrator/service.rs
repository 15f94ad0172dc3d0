//! Async owner of an [`Orchestrator`].
//!
//! The service task is the only place the view state changes. Callers talk to
//! it through an [`OrchestratorHandle`]; each fetch runs as its own task and
//! reports back over a channel, so a slow request never blocks newer input.
//! A refresh timer sends [`Command::Tick`] at a fixed interval no matter how
//! earlier fetches ended, and stops only when the service shuts down.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use movieskyy_common::{CatalogPage, Category};
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::debounce::{Keystroke, SearchDebouncer};
use super::machine::{Completion, FetchTicket, Orchestrator};
use super::state::ViewState;
use crate::catalog::{CatalogClient, FetchError, Normalizer};
use crate::config::ViewConfig;

const COMMAND_BUFFER: usize = 64;

/// Messages accepted by the service task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SelectCategory(Category),
    /// Already-debounced search text.
    SubmitSearchText(String),
    Retry,
    Tick,
}

/// The service task has stopped.
#[derive(Debug, Clone, thiserror::Error)]
#[error("view orchestrator is not running")]
pub struct ServiceClosed;

/// Timing knobs for the service.
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub default_category: Category,
    pub refresh_interval: Duration,
    pub search_debounce: Duration,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        ViewConfig::default().into()
    }
}

impl From<ViewConfig> for ServiceOptions {
    fn from(config: ViewConfig) -> Self {
        Self {
            default_category: config.default_category,
            refresh_interval: config.refresh_interval(),
            search_debounce: config.search_debounce(),
        }
    }
}

type FetchOutcome = (FetchTicket, Result<CatalogPage, FetchError>);

pub struct OrchestratorService {
    orchestrator: Orchestrator,
    client: Arc<dyn CatalogClient>,
    normalizer: Normalizer,
    completions_tx: mpsc::UnboundedSender<FetchOutcome>,
    state_tx: watch::Sender<ViewState>,
}

impl OrchestratorService {
    /// Start the service, its refresh timer and its search debouncer.
    ///
    /// The initial load for the default category is issued immediately.
    pub fn spawn(
        client: Arc<dyn CatalogClient>,
        normalizer: Normalizer,
        options: ServiceOptions,
    ) -> OrchestratorHandle {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let (keystrokes_tx, keystrokes_rx) = mpsc::channel(COMMAND_BUFFER);
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        let mut orchestrator = Orchestrator::new(options.default_category);
        let initial = orchestrator.start();
        let (state_tx, state_rx) = watch::channel(orchestrator.state().clone());

        let service = Self {
            orchestrator,
            client,
            normalizer,
            completions_tx,
            state_tx,
        };
        service.dispatch(initial);

        let debouncer =
            SearchDebouncer::new(options.search_debounce, keystrokes_rx, commands_tx.clone());
        let tasks = vec![
            tokio::spawn(service.run(commands_rx, completions_rx)),
            tokio::spawn(debouncer.run()),
            spawn_refresh_timer(commands_tx.clone(), options.refresh_interval),
        ];

        tracing::info!(
            category = %options.default_category,
            refresh_secs = options.refresh_interval.as_secs(),
            "View orchestrator started"
        );

        OrchestratorHandle {
            commands: commands_tx,
            keystrokes: keystrokes_tx,
            state: state_rx,
            tasks: Arc::new(ServiceTasks(Mutex::new(tasks))),
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut completions: mpsc::UnboundedReceiver<FetchOutcome>,
    ) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some((ticket, outcome)) = completions.recv() => {
                    self.handle_completion(ticket, outcome);
                }
            }
            self.publish();
        }

        tracing::debug!("View orchestrator stopped");
    }

    fn handle_command(&mut self, command: Command) {
        let ticket = match command {
            Command::SelectCategory(category) => self.orchestrator.select_category(category),
            Command::SubmitSearchText(text) => self.orchestrator.submit_search_text(&text),
            Command::Retry => self.orchestrator.retry(),
            Command::Tick => self.orchestrator.tick(),
        };
        self.dispatch(ticket);
    }

    fn handle_completion(&mut self, ticket: FetchTicket, outcome: Result<CatalogPage, FetchError>) {
        if let Err(e) = &outcome {
            tracing::warn!(
                generation = ticket.generation,
                mode = %ticket.mode,
                error = %e,
                "Catalog fetch failed"
            );
        }

        let outcome = outcome.map(|page| self.normalizer.normalize(page));
        if self.orchestrator.complete(&ticket, outcome, Utc::now()) == Completion::Discarded {
            tracing::debug!(generation = ticket.generation, "Stale completion dropped");
        }
    }

    /// Run the fetch for `ticket` on its own task.
    fn dispatch(&self, ticket: FetchTicket) {
        let client = Arc::clone(&self.client);
        let completions = self.completions_tx.clone();

        tracing::debug!(
            generation = ticket.generation,
            mode = %ticket.mode,
            trigger = ?ticket.trigger,
            "Dispatching catalog fetch"
        );

        tokio::spawn(async move {
            let outcome = client.fetch_catalog(&ticket.mode, ticket.page).await;
            // Closed only during shutdown.
            let _ = completions.send((ticket, outcome));
        });
    }

    fn publish(&self) {
        let next = self.orchestrator.state();
        self.state_tx.send_if_modified(|current| {
            if current == next {
                false
            } else {
                *current = next.clone();
                true
            }
        });
    }
}

fn spawn_refresh_timer(commands: mpsc::Sender<Command>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            tracing::debug!("Auto-refresh tick");
            if commands.send(Command::Tick).await.is_err() {
                break;
            }
        }
    })
}

struct ServiceTasks(Mutex<Vec<JoinHandle<()>>>);

impl ServiceTasks {
    fn abort_all(&self) {
        for task in self.0.lock().drain(..) {
            task.abort();
        }
    }
}

impl Drop for ServiceTasks {
    fn drop(&mut self) {
        self.abort_all();
    }
}

/// Cloneable front door to a running [`OrchestratorService`].
///
/// The service, its timer and its debouncer are torn down when
/// [`shutdown`](Self::shutdown) is called or the last handle is dropped.
#[derive(Clone)]
pub struct OrchestratorHandle {
    commands: mpsc::Sender<Command>,
    keystrokes: mpsc::Sender<Keystroke>,
    state: watch::Receiver<ViewState>,
    tasks: Arc<ServiceTasks>,
}

impl OrchestratorHandle {
    pub async fn select_category(&self, category: Category) -> Result<(), ServiceClosed> {
        self.send(Command::SelectCategory(category)).await
    }

    /// Submit search text immediately, bypassing the debouncer.
    pub async fn submit_search_text(&self, text: impl Into<String>) -> Result<(), ServiceClosed> {
        self.send(Command::SubmitSearchText(text.into())).await
    }

    /// Feed one keystroke's worth of search text through the debouncer.
    pub async fn type_search(&self, text: impl Into<String>) -> Result<(), ServiceClosed> {
        self.keystrokes
            .send(Keystroke::Text(text.into()))
            .await
            .map_err(|_| ServiceClosed)
    }

    /// Cancel pending keystrokes and return to the category listing.
    pub async fn clear_search(&self) -> Result<(), ServiceClosed> {
        self.keystrokes
            .send(Keystroke::Cancel)
            .await
            .map_err(|_| ServiceClosed)?;
        self.send(Command::SubmitSearchText(String::new())).await
    }

    pub async fn retry(&self) -> Result<(), ServiceClosed> {
        self.send(Command::Retry).await
    }

    /// Trigger a refresh now, as the timer would.
    pub async fn tick(&self) -> Result<(), ServiceClosed> {
        self.send(Command::Tick).await
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified whenever the view state changes.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    /// Wait for the first state matching `predicate`.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&ViewState) -> bool,
    ) -> Result<ViewState, ServiceClosed> {
        let mut rx = self.subscribe();
        let state = rx.wait_for(predicate).await.map_err(|_| ServiceClosed)?;
        Ok(state.clone())
    }

    pub fn shutdown(&self) {
        self.tasks.abort_all();
        tracing::info!("View orchestrator shut down");
    }

    async fn send(&self, command: Command) -> Result<(), ServiceClosed> {
        self.commands.send(command).await.map_err(|_| ServiceClosed)
    }
}
