//! Loadstone - CLI frontend for an external load-order sorting engine
//!
//! This crate implements everything a mod manager needs around the sorting
//! engine itself:
//! - Reconstruction of per-game settings from legacy configuration documents
//! - Masterlist source migration and download
//! - Reconciliation of a saved load order against the data directory
//! - A structured JSON report built from the engine's per-plugin metadata
//!
//! The engine (graph construction, condition evaluation, the topological
//! sort) sits behind the traits in [`engine`] and is supplied by the caller.

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod engine;
pub mod error;
mod fsutil;
pub mod games;
pub mod logging;
pub mod masterlist;
pub mod plugins;
pub mod report;
pub mod runner;
pub mod settings;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::Error;
pub use runner::Runner;
pub use settings::GameSettings;
