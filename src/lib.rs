//! Criba - deterministic auto-submit engine and trace replayer for admin
//! filter forms
//!
//! This library models the auto-submit behavior attached to the filter forms
//! on the admin list pages (areas, departamentos, trabajadores): debounced
//! free-text search, immediate submission on select changes, and Enter-key
//! submission on the RUT field. The engine replays recorded interaction
//! traces on a virtual clock and reports every form submission the binding
//! would fire, with an optional tokio-based live runner for wall-clock
//! replay.

pub mod binder;
pub mod cli;
pub mod csv_output;
pub mod debounce;
pub mod event;
pub mod form;
pub mod json_output;
pub mod live;
pub mod pages;
pub mod policy;
pub mod script;
pub mod session;
pub mod stats;
