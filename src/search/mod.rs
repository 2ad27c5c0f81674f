//! The leaf components of the live search feature.
//!
//! Each component does one thing and knows nothing about the others; the
//! [`SearchController`](crate::runtime::SearchController) wires them together.
//!
//! # Modules
//!
//! - [`debouncer`]: Coalesces bursts of input into one pending action
//! - [`query_store`]: The current query and its mirror in the address bar
//! - [`fetcher`]: Partial (rows-only) requests and their outcomes
//! - [`renderer`]: Whole-subtree replacement of the rows container
//! - [`row_binder`]: Hover toolbars and tooltips on every row
//! - [`edit_binder`]: Edit dialog pre-fill from the triggering row

pub mod debouncer;
pub mod edit_binder;
pub mod fetcher;
pub mod query_store;
pub mod renderer;
pub mod row_binder;

pub use debouncer::{Debouncer, Scheduled, Ticket};
pub use edit_binder::{EditFormLayout, EditRequestBinder};
pub use fetcher::{FetchRequest, PartialFetcher, RequestSeq, PARTIAL_HEADER};
pub use query_store::SearchQueryStore;
pub use row_binder::{RowBehaviorBinder, ToolbarVisibility};
