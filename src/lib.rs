//! # cordex - Terminal Explorer for CORD-19 Metadata
//!
//! Loads a CORD-19 `metadata.csv` once, then lets the user narrow it down by keyword,
//! publication year and journal while a dashboard of summaries follows every change.
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`config`] - Defaults, optional TOML settings file, CLI overrides
//! - [`data`] - Record model, CSV parsing and the one-shot [`DataStore`]
//! - [`filter`] - Filter criteria and the order-preserving [`FilterEngine`]
//! - [`aggregate`] - Per-year counts and top journals
//! - [`terms`] - Title term frequencies for the word cloud
//! - [`export`] - CSV serialization of a filtered view
//! - [`pipeline`] - One filter-and-aggregate pass as a [`Snapshot`]
//! - [`input`] / [`render`] - Terminal input and the ratatui dashboard
//! - [`app`] - Application core and component coordination

// Core modules
pub mod config;
pub mod error;

// Data path
pub mod aggregate;
pub mod data;
pub mod export;
pub mod filter;
pub mod pipeline;
pub mod terms;

// Interactive surface
pub mod app;
pub mod input;
pub mod render;

// Re-export commonly used types for convenience
pub use error::{CordexError, Result};

pub use app::Application;
pub use config::{Settings, SettingsOverrides, ThemeName};
pub use data::{DataStore, Dataset, Record, Schema};
pub use filter::{FilterCriteria, FilterEngine, FilteredView, YearRange};
pub use pipeline::Snapshot;
pub use terms::TermFrequency;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
