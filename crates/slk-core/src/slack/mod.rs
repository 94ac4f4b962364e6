//! Slack Web API access.
//!
//! Only the two search endpoints are used. Both require a user token
//! (`xoxp-*`) with the `search:read` scope.

pub mod client;

pub use client::{SLACK_TOKEN_ENV, SlackClient, resolve_token};
