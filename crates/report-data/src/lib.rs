//! Data layer for the IEG ratings report.
//!
//! Responsible for discovering, verifying and parsing the ratings CSV,
//! running the stratified 2×2 aggregations and producing the structured
//! [`analysis::AnalysisReport`] consumed by the renderers.

pub mod aggregator;
pub mod analysis;
pub mod reader;

pub use report_core as core;
