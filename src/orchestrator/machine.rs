//! The fetch orchestration state machine.
//!
//! [`Orchestrator`] performs no I/O. Every user action or timer tick updates
//! the [`ViewState`] and returns a [`FetchTicket`] describing the request the
//! caller must issue; the caller later reports the outcome through
//! [`Orchestrator::complete`]. Each ticket is tagged with the
//! (category, search text) pair it was issued for, and a completion is applied
//! only if that pair is still the active one. Two completions for the same
//! current pair are both applied, in arrival order.

use chrono::{DateTime, Utc};
use movieskyy_common::{CatalogMode, Category, DisplayRecord};
use serde::Serialize;
use tracing::debug;

use super::state::{ViewKey, ViewState};
use crate::catalog::FetchError;

/// What caused a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    UserAction,
    TimerTick,
}

/// A request the orchestrator wants issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Strictly increasing per orchestrator.
    pub generation: u64,
    pub key: ViewKey,
    pub trigger: Trigger,
    pub mode: CatalogMode,
    pub page: u32,
}

/// Whether a completion changed the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The active pair moved on while the request was in flight.
    Discarded,
}

#[derive(Debug)]
pub struct Orchestrator {
    state: ViewState,
    next_generation: u64,
    /// Generation of the latest timer fetch, which owns `auto_updating`.
    pending_tick: Option<u64>,
}

impl Orchestrator {
    pub fn new(default_category: Category) -> Self {
        Self {
            state: ViewState::new(default_category),
            next_generation: 1,
            pending_tick: None,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Initial load: behaves as selecting the configured default category.
    pub fn start(&mut self) -> FetchTicket {
        let category = self.state.category;
        self.select_category(category)
    }

    /// A filter tab was chosen.
    pub fn select_category(&mut self, category: Category) -> FetchTicket {
        self.state.category = category;
        self.state.search_text.clear();
        self.state.searching = false;
        self.state.loading = true;
        self.issue(Trigger::UserAction)
    }

    /// The (already debounced) search text changed.
    ///
    /// Whitespace-only text counts as empty and falls back to the listing of
    /// the category that is active right now.
    pub fn submit_search_text(&mut self, text: &str) -> FetchTicket {
        let text = text.trim();
        self.state.search_text = text.to_string();
        self.state.searching = !text.is_empty();
        self.state.loading = true;
        self.issue(Trigger::UserAction)
    }

    /// Manual retry of whatever is currently shown.
    pub fn retry(&mut self) -> FetchTicket {
        self.state.loading = true;
        self.issue(Trigger::UserAction)
    }

    /// Periodic refresh. Leaves results, `searching` and `loading` alone.
    pub fn tick(&mut self) -> FetchTicket {
        self.state.auto_updating = true;
        let ticket = self.issue(Trigger::TimerTick);
        self.pending_tick = Some(ticket.generation);
        ticket
    }

    /// Apply the outcome of `ticket` if its pair is still active.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<Vec<DisplayRecord>, FetchError>,
        completed_at: DateTime<Utc>,
    ) -> Completion {
        if ticket.trigger == Trigger::TimerTick && self.pending_tick == Some(ticket.generation) {
            self.state.auto_updating = false;
            self.pending_tick = None;
        }

        if ticket.key != self.state.active_key() {
            debug!(
                generation = ticket.generation,
                mode = %ticket.mode,
                "Discarding stale catalog completion"
            );
            return Completion::Discarded;
        }

        match outcome {
            Ok(results) => {
                let trending_listing = ticket.mode == CatalogMode::category(Category::Trending);
                if trending_listing && !results.is_empty() {
                    self.state.featured = results.first().cloned();
                }
                self.state.results = results;
                self.state.last_updated = Some(completed_at);
                self.state.error = None;
                self.state.setup_required = false;
            }
            Err(FetchError::MissingCredential) => {
                self.state.setup_required = true;
            }
            Err(e) => {
                debug!(generation = ticket.generation, error = %e, "Catalog fetch failed");
                self.state.error = Some(e.user_message().to_string());
            }
        }
        self.state.loading = false;

        Completion::Applied
    }

    fn issue(&mut self, trigger: Trigger) -> FetchTicket {
        let generation = self.next_generation;
        self.next_generation += 1;

        let key = self.state.active_key();
        FetchTicket {
            generation,
            mode: key.mode(),
            key,
            trigger,
            page: 1,
        }
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(Category::default())
    }
}
