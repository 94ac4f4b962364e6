//! Core library for slk - Slack search from the terminal.
//!
//! This crate provides:
//! - Configuration loading and management
//! - XDG-compliant path resolution
//! - Schema and example config generation
//! - A Slack Web API client for the search endpoints
//! - Search option validation, invocation, and result rendering
//! - The output sink used for text, table, and JSON rendering

pub mod config;
pub mod error;
pub mod output;
pub mod paths;
pub mod schema;
pub mod search;
pub mod slack;

pub use config::{
    AppConfig, LogLevel, LoggingConfig, OutputConfig, RuntimeConfig, SearchDefaults, SlackConfig,
};
pub use error::{CoreError, Result};
pub use output::{Output, OutputFormat, Printer};
pub use paths::{AppPaths, default_config_dir};
pub use schema::{generate_example_config, generate_schema};
pub use search::{
    SearchKind, SearchOptions, SearchResult, SearchTransport, SortBy, SortDirection,
    ValidationError,
};
pub use slack::SlackClient;

/// Application name used for config directories and environment prefix.
pub const APP_NAME: &str = "slk";

/// Returns the environment variable prefix for this application.
#[must_use]
pub fn env_prefix() -> String {
    APP_NAME
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
