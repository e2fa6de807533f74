//! Declarative chart descriptions.
//!
//! Builders validate their inputs and produce a [`ChartSpec`]; drawing is
//! left to the terminal layer (`ui`), which turns bars into a ratatui
//! `BarChart` and pies into Braille layers via [`pie::rasterize_pie`].

mod palette;
pub mod pie;

use crate::error::{DashboardError, Result};
use num_format::{Locale, ToFormattedString};
use std::collections::HashMap;

pub use palette::PaletteColor;

/// Offset of the first pie slice, as a fraction of the radius
pub const FIRST_SLICE_PULL: f64 = 0.05;

/// Format a count with `,` thousands separators
pub fn format_count(value: u64) -> String {
    value.to_formatted_string(&Locale::en)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFormat {
    Plain,
    Thousands,
}

impl TickFormat {
    pub fn format(self, value: u64) -> String {
        match self {
            TickFormat::Plain => value.to_string(),
            TickFormat::Thousands => format_count(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisLabels {
    pub x: String,
    pub y: String,
}

impl AxisLabels {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarDatum {
    pub label: String,
    pub value: u64,
    pub color: PaletteColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChartSpec {
    pub title: String,
    pub axis_labels: AxisLabels,
    pub bars: Vec<BarDatum>,
    /// `None` leaves the plot area transparent
    pub plot_background: Option<PaletteColor>,
    pub tick_format: TickFormat,
}

impl BarChartSpec {
    pub fn max_value(&self) -> u64 {
        self.bars.iter().map(|b| b.value).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: u64,
    pub color: PaletteColor,
    /// Radial offset as a fraction of the radius
    pub pull: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChartSpec {
    pub title: String,
    pub slices: Vec<Slice>,
}

impl PieChartSpec {
    /// Sum of slice values, widened so any set of `u64` slices fits
    pub fn total(&self) -> u128 {
        self.slices.iter().map(|s| u128::from(s.value)).sum()
    }

    /// Share of each slice in percent; all zero when the pie is empty
    pub fn percentages(&self) -> Vec<f64> {
        let total = self.total();
        self.slices
            .iter()
            .map(|s| {
                if total == 0 {
                    0.0
                } else {
                    s.value as f64 / total as f64 * 100.0
                }
            })
            .collect()
    }

    /// Percent and label text shown on each slice
    pub fn annotations(&self) -> Vec<String> {
        self.slices
            .iter()
            .zip(self.percentages())
            .map(|(s, pct)| format!("{} {:.1}%", s.label, pct))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    Bar(BarChartSpec),
    Pie(PieChartSpec),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Bar(bar) => &bar.title,
            ChartSpec::Pie(pie) => &pie.title,
        }
    }

    pub fn categories(&self) -> Vec<&str> {
        match self {
            ChartSpec::Bar(bar) => bar.bars.iter().map(|b| b.label.as_str()).collect(),
            ChartSpec::Pie(pie) => pie.slices.iter().map(|s| s.label.as_str()).collect(),
        }
    }

    pub fn values(&self) -> Vec<u64> {
        match self {
            ChartSpec::Bar(bar) => bar.bars.iter().map(|b| b.value).collect(),
            ChartSpec::Pie(pie) => pie.slices.iter().map(|s| s.value).collect(),
        }
    }
}

fn check_lengths(categories: &[&str], values: &[u64]) -> Result<()> {
    if categories.is_empty() {
        return Err(DashboardError::invalid_input("chart has no categories"));
    }
    if categories.len() != values.len() {
        return Err(DashboardError::invalid_input(format!(
            "{} categories but {} values",
            categories.len(),
            values.len()
        )));
    }
    Ok(())
}

/// Bar chart with one bar per category, colored through `color_map`
pub fn build_bar_chart(
    categories: &[&str],
    values: &[u64],
    color_map: &HashMap<&str, PaletteColor>,
    title: &str,
    axis_labels: AxisLabels,
) -> Result<ChartSpec> {
    check_lengths(categories, values)?;

    let bars = categories
        .iter()
        .zip(values)
        .map(|(category, value)| {
            let color = color_map.get(category).copied().ok_or_else(|| {
                DashboardError::invalid_input(format!("no color assigned to {category:?}"))
            })?;
            Ok(BarDatum {
                label: category.to_string(),
                value: *value,
                color,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ChartSpec::Bar(BarChartSpec {
        title: title.to_string(),
        axis_labels,
        bars,
        plot_background: None,
        tick_format: TickFormat::Thousands,
    }))
}

/// Pie chart coloring slices by position in `color_sequence`.
/// The first slice is pulled out of the pie by [`FIRST_SLICE_PULL`].
pub fn build_pie_chart(
    categories: &[&str],
    values: &[u64],
    color_sequence: &[PaletteColor],
    title: &str,
) -> Result<ChartSpec> {
    check_lengths(categories, values)?;
    if color_sequence.len() < categories.len() {
        return Err(DashboardError::invalid_input(format!(
            "{} colors for {} categories",
            color_sequence.len(),
            categories.len()
        )));
    }

    let slices = categories
        .iter()
        .zip(values)
        .zip(color_sequence)
        .enumerate()
        .map(|(idx, ((category, value), color))| Slice {
            label: category.to_string(),
            value: *value,
            color: *color,
            pull: if idx == 0 { FIRST_SLICE_PULL } else { 0.0 },
        })
        .collect();

    Ok(ChartSpec::Pie(PieChartSpec {
        title: title.to_string(),
        slices,
    }))
}
