//! Client-side fetch orchestration.
//!
//! Decides when a catalog fetch is issued in response to filter changes,
//! search text and the periodic refresh, and which completions may update
//! the view.
//!
//! # Module layout
//!
//! - [`state`] -- [`ViewState`] and the request pair [`ViewKey`].
//! - [`machine`] -- The I/O-free [`Orchestrator`] state machine.
//! - [`service`] -- Tokio task owning an orchestrator, plus its handle.
//! - [`debounce`] -- Quiet-period filter for search keystrokes.

pub mod debounce;
pub mod machine;
pub mod service;
pub mod state;

pub use debounce::{Keystroke, SearchDebouncer};
pub use machine::{Completion, FetchTicket, Orchestrator, Trigger};
pub use service::{Command, OrchestratorHandle, OrchestratorService, ServiceClosed, ServiceOptions};
pub use state::{ViewKey, ViewState};
