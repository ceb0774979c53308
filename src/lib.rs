//! merge-gate: label-driven merge gating for pull requests
//!
//! Decides whether a PR may be merged from the labels attached to it and
//! the forge's record of who attached them, then merges it with the method
//! its labels select. Reviewers and maintainers drive the labels through
//! PR comment commands (`/lgtm`, `/approve`, `/rebase`, `/squash`,
//! `/check-pr`) handled by the bot identity.
//!
//! The flow is gather, plan, execute: forge state is fetched through a
//! [`platform::PlatformService`], evaluated by pure functions in [`merge`],
//! and the resulting plan is carried out against the forge.

pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod labels;
pub mod merge;
pub mod platform;
pub mod types;

pub use error::{Error, Result};
