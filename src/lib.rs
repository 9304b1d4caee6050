//! Exploration helpers for quiescent-galaxy survey catalogs.
//!
//! The crate is split into three layers:
//! * [`catalog`] – loading a tabular catalog file, summary statistics,
//!   subsample selection, and delimited-text export.
//! * [`stats`] – NaN-aware reductions and binning shared by the other layers.
//! * [`plot`] – chart producers rendering PNG files via `plotters`.

pub mod catalog;
pub mod plot;
pub mod stats;
