//! Fundfolio - daily fund and asset portfolio tracker
//!
//! Records daily values of investment funds and of a fixed set of asset
//! categories, and derives daily changes, period summaries and top/bottom
//! rankings from them.

pub mod analytics;
pub mod cli;
pub mod config;
pub mod db;
pub mod dispatcher;
pub mod error;
pub mod importers;
pub mod utils;
