//! Normalize, align and chart benchmark results from several runtimes.
//!
//! The pipeline is: [`document::load`] a result file, [`extract::extract`] its
//! groups into count-keyed series of canonical nanoseconds, [`align::align`]
//! series across groups or runtimes, then compose and render a chart with
//! [`chart`].

pub mod align;
pub mod chart;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod label;
pub mod locate;
pub mod montage;
pub mod path;
pub mod styling;
pub mod table;
pub mod units;

pub use error::ReportError;
