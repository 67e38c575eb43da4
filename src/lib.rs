//! `adspend-dss` library crate.
//!
//! The binary (`dss`) is a thin wrapper around this library so that:
//!
//! - the engines are testable without spawning processes
//! - a web or CRUD layer can call `app::pipeline` directly
//! - persistence stays behind the `store::HistoryStore` seam

pub mod analytics;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod report;
pub mod store;
