//! Structured logging for the live search controller.
//!
//! Every component logs through `tracing`. This module installs the subscriber that
//! turns those events into console lines: the browser's developer console on
//! wasm32, stderr everywhere else.
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → ConsoleWriter → console.{debug,log,warn,error}
//! ```
//!
//! # Configuration
//!
//! The filter comes from `Config::trace_level` (any `EnvFilter` directive string,
//! e.g. `"debug"` or `"livesearch=trace"`), defaulting to `"info"`.
//!
//! # Usage
//!
//! ```rust
//! use livesearch::observability::init_tracing;
//! use livesearch::Config;
//!
//! init_tracing(&Config::default());
//! tracing::debug!("search controller starting");
//! ```
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`console_writer`]: Level-aware line writer for the console

mod console_writer;
mod init;

pub use console_writer::{ConsoleWriter, MakeConsoleWriter};
pub use init::init_tracing;
