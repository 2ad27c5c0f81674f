//! Domain layer for the live search controller.
//!
//! This module contains the core domain types, independent of any browser API or
//! document model.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`fragment`]: The row markup returned by the server
//! - [`record`]: Row record attributes and the edit form defaults table
//!
//! # Examples
//!
//! ```
//! use livesearch::domain::{EditFormState, Result};
//!
//! fn empty_form() -> Result<EditFormState> {
//!     Ok(EditFormState::defaults())
//! }
//! ```

pub mod error;
pub mod fragment;
pub mod record;

pub use error::{FetchFailure, LiveSearchError, Result};
pub use fragment::ListFragment;
pub use record::{EditField, EditFormState};
