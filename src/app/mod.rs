//! Application layer: the search state machine.
//!
//! This module sits between the page runtime ([`runtime`](crate::runtime)) and the
//! leaf components ([`search`](crate::search)). It decides *what* happens; the
//! runtime decides *how*.
//!
//! # Architecture
//!
//! ```text
//! DOM events, timers → Event → handle_event → SearchState mutations → Actions
//!                        ↑                                              ↓
//!                        └────────── fetch completions ◀── Host ◀───────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing and state transitions
//! - [`modes`]: The search phase type
//! - [`state`]: Central search state and the stale-response guard

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::SearchPhase;
pub use state::{InFlight, SearchState};
