//! Terminal dashboard for the second round of the 2024 French anticipated
//! legislative election.
//!
//! The results file is loaded once through [`data::DatasetCache`]; the
//! selected page is rebuilt with [`pages::render`] when the selection
//! changes, and each frame draws it with [`ui::render`].

pub mod app;
pub mod braille;
pub mod chart;
pub mod data;
pub mod error;
pub mod pages;
pub mod ui;
pub mod view;

#[cfg(test)]
mod test_support;

pub use error::{DashboardError, Result};
