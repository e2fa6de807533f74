use crate::chart::{format_count, ChartSpec};
use std::fmt::Write as _;

/// A labeled total, e.g. "Total Voters: 230"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    pub label: String,
    pub value: u64,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: u64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    pub fn formatted(&self) -> String {
        format_count(self.value)
    }
}

/// One vertical section of a page
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Text(String),
    /// Selector with its options and the index of the chosen one
    Selector {
        label: String,
        options: Vec<String>,
        selected: usize,
    },
    /// Metrics laid out side by side
    Metrics(Vec<Metric>),
    Separator,
    /// Charts laid out side by side
    Charts(Vec<ChartSpec>),
    Error(String),
}

/// Everything a page displays, independent of how it is drawn
#[derive(Debug, Clone, PartialEq, Default)]
pub struct View {
    pub blocks: Vec<Block>,
}

impl View {
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Title(t) => Some(t.as_str()),
            _ => None,
        })
    }

    pub fn metrics(&self) -> impl Iterator<Item = &Metric> {
        self.blocks.iter().flat_map(|b| match b {
            Block::Metrics(m) => m.as_slice(),
            _ => &[],
        })
    }

    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.blocks.iter().flat_map(|b| match b {
            Block::Charts(c) => c.as_slice(),
            _ => &[],
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Error(e) => Some(e.as_str()),
            _ => None,
        })
    }

    /// Metric value by label
    pub fn metric(&self, label: &str) -> Option<u64> {
        self.metrics().find(|m| m.label == label).map(|m| m.value)
    }

    /// Plain-text rendering, used by `--print`
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Title(t) => {
                    let _ = writeln!(out, "{t}\n{}", "=".repeat(t.chars().count()));
                }
                Block::Text(t) => {
                    let _ = writeln!(out, "{t}");
                }
                Block::Selector {
                    label,
                    options,
                    selected,
                } => {
                    let choices: Vec<String> = options
                        .iter()
                        .enumerate()
                        .map(|(i, o)| if i == *selected { format!("[{o}]") } else { o.clone() })
                        .collect();
                    let _ = writeln!(out, "{label} {}", choices.join(" "));
                }
                Block::Metrics(metrics) => {
                    for m in metrics {
                        let _ = writeln!(out, "{}: {}", m.label, m.formatted());
                    }
                }
                Block::Separator => {
                    let _ = writeln!(out, "{}", "-".repeat(40));
                }
                Block::Charts(charts) => {
                    for chart in charts {
                        write_chart(&mut out, chart);
                    }
                }
                Block::Error(e) => {
                    let _ = writeln!(out, "error: {e}");
                }
            }
        }
        out
    }
}

fn write_chart(out: &mut String, chart: &ChartSpec) {
    let _ = writeln!(out, "\n{}", chart.title());
    match chart {
        ChartSpec::Bar(bar) => {
            let _ = writeln!(out, "  ({} by {})", bar.axis_labels.y, bar.axis_labels.x);
            for datum in &bar.bars {
                let _ = writeln!(
                    out,
                    "  {:<16} {:>14}  {}",
                    datum.label,
                    bar.tick_format.format(datum.value),
                    datum.color.hex()
                );
            }
        }
        ChartSpec::Pie(pie) => {
            for (slice, note) in pie.slices.iter().zip(pie.annotations()) {
                let _ = writeln!(out, "  {:<24} {}", note, slice.color.hex());
            }
        }
    }
}
