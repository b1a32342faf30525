//! Tabscope: Tabular Exploration Library
//!
//! Loads a labeled numeric dataset, inspects and forward-fills it,
//! computes descriptive statistics and per-category means, and renders
//! four descriptive charts.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
pub mod views;
