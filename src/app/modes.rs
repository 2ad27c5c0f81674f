//! Search phase state machine type.
//!
//! The controller is always in exactly one [`SearchPhase`]:
//!
//! ```text
//!            input                 timer fires
//!   Idle ───────────▶ PendingDebounce ───────────▶ Fetching
//!    ▲                                            │      │
//!    │          success: render + rebind          │      │ failure
//!    └────────────────────────────────────────────┘      ▼
//!    └──────────────────────────────────────────────── Error
//! ```
//!
//! Clear, Escape and submit skip `PendingDebounce` and go straight to `Fetching`.
//! `Error` is transient; the controller settles it back to `Idle`.

use std::fmt;

/// Where the controller is in the input → fetch → render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// Nothing pending; the displayed list is current.
    #[default]
    Idle,

    /// A debounce timer is armed for the latest input.
    PendingDebounce,

    /// A fetch is in flight for the current query.
    Fetching,

    /// The last fetch failed. The previous list is still displayed.
    Error,
}

impl SearchPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PendingDebounce => "pending_debounce",
            Self::Fetching => "fetching",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
