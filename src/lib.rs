//! Lifetrace - component lifecycle and usage statistics from device traces
//!
//! This library reconstructs component lifecycles from a flat event log,
//! aggregates them per component and per owning package, and joins the result
//! with usage history and the installed package inventory. Reports are plain
//! typed tables rendered by the text, CSV, HTML and JSON outputs.

pub mod cli;
pub mod config;
pub mod csv_output;
pub mod error;
pub mod event;
pub mod html_output;
pub mod ingest;
pub mod inventory;
pub mod json_output;
pub mod lifecycle_index;
pub mod render;
pub mod report;
pub mod stats;
pub mod text_output;
pub mod usage;
