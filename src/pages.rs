//! Page routing and the page renderers.
//!
//! [`render`] is a pure function of the current [`Selection`] and a
//! [`DatasetSource`]: it builds a fresh [`View`] on every call and logs
//! nothing, failures land in the view. Only the National Analysis / Vote
//! Analysis page touches the dataset.

use crate::chart::{build_bar_chart, build_pie_chart, AxisLabels, ChartSpec, PaletteColor};
use crate::data::{sum_columns, CellPolicy, Column, DatasetSource, Totals};
use crate::error::Result;
use crate::view::{Block, Metric, View};
use std::collections::HashMap;

/// Shown in the sidebar above the page list
pub const SIDEBAR_TITLE: &str = "French Anticipated Legislative Election Second Round Analysis";
pub const PAGE_SELECTOR_LABEL: &str = "Go to";
pub const ANALYSIS_SELECTOR_LABEL: &str = "Select Analysis Type:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Homepage,
    NationalAnalysis,
    RegionalAnalysis,
    DepartmentalAnalysis,
    CityAnalysis,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Homepage,
        Page::NationalAnalysis,
        Page::RegionalAnalysis,
        Page::DepartmentalAnalysis,
        Page::CityAnalysis,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Page::Homepage => "Homepage",
            Page::NationalAnalysis => "National Analysis",
            Page::RegionalAnalysis => "Regional Analysis",
            Page::DepartmentalAnalysis => "Departmental Analysis",
            Page::CityAnalysis => "City Analysis",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(label.trim()))
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisType {
    #[default]
    VoteAnalysis,
    CandidateAnalysis,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 2] = [AnalysisType::VoteAnalysis, AnalysisType::CandidateAnalysis];

    pub fn label(self) -> &'static str {
        match self {
            AnalysisType::VoteAnalysis => "Vote Analysis",
            AnalysisType::CandidateAnalysis => "Candidate Analysis",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.label().eq_ignore_ascii_case(label.trim()))
    }

    pub fn index(self) -> usize {
        match self {
            AnalysisType::VoteAnalysis => 0,
            AnalysisType::CandidateAnalysis => 1,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            AnalysisType::VoteAnalysis => AnalysisType::CandidateAnalysis,
            AnalysisType::CandidateAnalysis => AnalysisType::VoteAnalysis,
        }
    }
}

/// What the user is currently looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub page: Page,
    pub analysis: AnalysisType,
}

/// Build the view for the selected page
pub fn render(selection: &Selection, source: &dyn DatasetSource, policy: CellPolicy) -> View {
    let mut view = View::default();
    match selection.page {
        Page::Homepage => render_home(&mut view),
        Page::NationalAnalysis => render_national(&mut view, selection.analysis, source, policy),
        Page::RegionalAnalysis => view.push(title("Analysis of a specific region")),
        Page::DepartmentalAnalysis => view.push(title("Analysis of a specific department")),
        Page::CityAnalysis => view.push(title("Analysis of a specific city")),
    }
    view
}

fn title(text: &str) -> Block {
    Block::Title(text.to_string())
}

fn render_home(view: &mut View) {
    view.push(title("Homepage"));
    view.push(Block::Text(
        "Welcome to the analysis of the French Anticipated Legislative Election of 2024".to_string(),
    ));
}

fn render_national(
    view: &mut View,
    analysis: AnalysisType,
    source: &dyn DatasetSource,
    policy: CellPolicy,
) {
    view.push(Block::Selector {
        label: ANALYSIS_SELECTOR_LABEL.to_string(),
        options: AnalysisType::ALL.iter().map(|a| a.label().to_string()).collect(),
        selected: analysis.index(),
    });

    match analysis {
        AnalysisType::VoteAnalysis => {
            view.push(title(
                "French Legislative Election: National Voter Turnout and Ballot Analysis",
            ));
            if let Err(e) = render_vote_analysis(view, source, policy) {
                view.push(Block::Error(e.to_string()));
            }
        }
        AnalysisType::CandidateAnalysis => {
            view.push(title("French Legislative Election: Candidate Analysis"));
        }
    }
}

/// Metrics and chart pairs, in display order; stops at the first failure
fn render_vote_analysis(
    view: &mut View,
    source: &dyn DatasetSource,
    policy: CellPolicy,
) -> Result<()> {
    let dataset = source.dataset()?;

    let turnout = sum_columns(
        &dataset,
        &[
            Column::Registered.name(),
            Column::Voters.name(),
            Column::Abstentionists.name(),
        ],
        policy,
    )?;
    view.push(Block::Metrics(vec![
        metric("Total Registered Voters", &turnout, Column::Registered),
        metric("Total Voters", &turnout, Column::Voters),
        metric("Total Abstentionists", &turnout, Column::Abstentionists),
    ]));
    view.push(Block::Separator);
    view.push(Block::Charts(turnout_charts(&turnout)?));

    let ballots = sum_columns(
        &dataset,
        &[Column::Cast.name(), Column::Blank.name(), Column::Invalid.name()],
        policy,
    )?;
    view.push(Block::Metrics(vec![
        metric("Total Votes Cast", &ballots, Column::Cast),
        metric("Total Votes Blank", &ballots, Column::Blank),
        metric("Total Votes Invalid", &ballots, Column::Invalid),
    ]));
    view.push(Block::Separator);
    view.push(Block::Charts(ballot_charts(&ballots)?));

    Ok(())
}

fn metric(label: &str, totals: &Totals, column: Column) -> Metric {
    Metric::new(label, totals.get(column.name()).unwrap_or_default())
}

fn turnout_charts(totals: &Totals) -> Result<Vec<ChartSpec>> {
    let categories = [Column::Voters.name(), Column::Abstentionists.name()];
    let values = [
        totals.get(categories[0]).unwrap_or_default(),
        totals.get(categories[1]).unwrap_or_default(),
    ];
    let colors = [PaletteColor::Burgundy, PaletteColor::Cream];
    chart_pair(
        &categories,
        &values,
        &colors,
        ("Distribution of Voters and Abstentions", "Voter Turnout Proportion"),
        AxisLabels::new("Voting Status", "Number of Registered People"),
    )
}

fn ballot_charts(totals: &Totals) -> Result<Vec<ChartSpec>> {
    let categories = [Column::Cast.name(), Column::Blank.name(), Column::Invalid.name()];
    let values = categories.map(|c| totals.get(c).unwrap_or_default());
    let colors = [PaletteColor::Burgundy, PaletteColor::Coffee, PaletteColor::Cream];
    chart_pair(
        &categories,
        &values,
        &colors,
        ("Distribution of Cast, Blank and Invalid Ballots", "Ballot Proportion"),
        AxisLabels::new("Ballot Status", "Number of Ballots"),
    )
}

/// Bar chart and pie chart over the same categories and colors
fn chart_pair(
    categories: &[&str],
    values: &[u64],
    colors: &[PaletteColor],
    (bar_title, pie_title): (&str, &str),
    axis_labels: AxisLabels,
) -> Result<Vec<ChartSpec>> {
    let color_map: HashMap<&str, PaletteColor> =
        categories.iter().copied().zip(colors.iter().copied()).collect();
    Ok(vec![
        build_bar_chart(categories, values, &color_map, bar_title, axis_labels)?,
        build_pie_chart(categories, values, colors, pie_title)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dataset, DatasetCache};
    use crate::error::DashboardError;
    use std::cell::Cell;
    use std::sync::Arc;

    /// Counts dataset requests
    struct CountingSource {
        dataset: Arc<Dataset>,
        calls: Cell<usize>,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                dataset: Arc::new(fixture()),
                calls: Cell::new(0),
            }
        }
    }

    impl DatasetSource for CountingSource {
        fn dataset(&self) -> Result<Arc<Dataset>> {
            self.calls.set(self.calls.get() + 1);
            Ok(Arc::clone(&self.dataset))
        }
    }

    fn fixture() -> Dataset {
        Dataset::from_rows(
            ["Code", "Inscrits", "Votants", "Abstentions", "Exprimés", "Blancs", "Nuls"],
            [
                ["0101", "100", "80", "20", "78", "1", "1"],
                ["0102", "200", "150", "50", "148", "1", "1"],
            ],
        )
        .unwrap()
    }

    fn national(analysis: AnalysisType) -> Selection {
        Selection {
            page: Page::NationalAnalysis,
            analysis,
        }
    }

    #[test]
    fn test_vote_analysis_metrics() {
        let source = CountingSource::new();
        let view = render(&national(AnalysisType::VoteAnalysis), &source, CellPolicy::Strict);

        assert_eq!(view.errors().count(), 0);
        assert_eq!(view.metric("Total Registered Voters"), Some(300));
        assert_eq!(view.metric("Total Voters"), Some(230));
        assert_eq!(view.metric("Total Abstentionists"), Some(70));
        assert_eq!(view.metric("Total Votes Cast"), Some(226));
        assert_eq!(view.metric("Total Votes Blank"), Some(2));
        assert_eq!(view.metric("Total Votes Invalid"), Some(2));
    }

    #[test]
    fn test_vote_analysis_charts() {
        let source = CountingSource::new();
        let view = render(&national(AnalysisType::VoteAnalysis), &source, CellPolicy::Strict);
        let charts: Vec<&ChartSpec> = view.charts().collect();
        assert_eq!(charts.len(), 4);

        for chart in &charts[..2] {
            assert_eq!(chart.categories(), vec!["Voters", "Abstentionists"]);
            assert_eq!(chart.values(), vec![230, 70]);
        }
        for chart in &charts[2..] {
            assert_eq!(chart.categories(), vec!["Cast", "Blank", "Invalid"]);
            assert_eq!(chart.values(), vec![226, 2, 2]);
        }
        assert!(matches!(charts[0], ChartSpec::Bar(_)));
        assert!(matches!(charts[1], ChartSpec::Pie(_)));
    }

    #[test]
    fn test_vote_analysis_block_order() {
        let source = CountingSource::new();
        let view = render(&national(AnalysisType::VoteAnalysis), &source, CellPolicy::Strict);
        let kinds: Vec<&str> = view
            .blocks
            .iter()
            .map(|b| match b {
                Block::Selector { .. } => "selector",
                Block::Title(_) => "title",
                Block::Metrics(_) => "metrics",
                Block::Separator => "separator",
                Block::Charts(_) => "charts",
                Block::Text(_) => "text",
                Block::Error(_) => "error",
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "selector", "title", "metrics", "separator", "charts", "metrics", "separator",
                "charts"
            ]
        );
    }

    #[test]
    fn test_homepage_does_not_touch_data() {
        let source = CountingSource::new();
        let view = render(&Selection::default(), &source, CellPolicy::Strict);
        assert_eq!(source.calls.get(), 0);
        assert_eq!(view.titles().collect::<Vec<_>>(), vec!["Homepage"]);
        assert_eq!(view.charts().count(), 0);
        assert_eq!(view.metrics().count(), 0);
    }

    #[test]
    fn test_candidate_analysis_is_title_only() {
        let source = CountingSource::new();
        let view = render(&national(AnalysisType::CandidateAnalysis), &source, CellPolicy::Strict);
        assert_eq!(source.calls.get(), 0);
        assert_eq!(
            view.titles().collect::<Vec<_>>(),
            vec!["French Legislative Election: Candidate Analysis"]
        );
        assert_eq!(view.charts().count(), 0);
    }

    #[test]
    fn test_stub_pages_do_not_touch_data() {
        let source = CountingSource::new();
        for page in [Page::RegionalAnalysis, Page::DepartmentalAnalysis, Page::CityAnalysis] {
            let view = render(&Selection { page, ..Default::default() }, &source, CellPolicy::Strict);
            assert_eq!(view.blocks.len(), 1);
        }
        assert_eq!(source.calls.get(), 0);
    }

    #[test]
    fn test_render_is_repeatable() {
        let source = CountingSource::new();
        let selection = national(AnalysisType::VoteAnalysis);
        let first = render(&selection, &source, CellPolicy::Strict);
        let second = render(&selection, &source, CellPolicy::Strict);
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_file_shows_error() {
        let cache = DatasetCache::new("no/such/results.csv");
        let view = render(&national(AnalysisType::VoteAnalysis), &cache, CellPolicy::Strict);
        let errors: Vec<&str> = view.errors().collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("File not found"));
        assert_eq!(view.metrics().count(), 0);
    }

    #[test]
    fn test_repeated_failed_renders_log_once() {
        crate::test_support::start_counting();
        let cache = DatasetCache::new("no/such/results.csv");
        let selection = national(AnalysisType::VoteAnalysis);
        for _ in 0..60 {
            let view = render(&selection, &cache, CellPolicy::Strict);
            assert_eq!(view.errors().count(), 1);
        }
        // Only the first failed load is logged
        assert_eq!(crate::test_support::records(), 1);
    }

    #[test]
    fn test_malformed_cell_strict_and_zero_fill() {
        let ds = Dataset::from_rows(
            ["Inscrits", "Votants", "Abstentions", "Exprimés", "Blancs", "Nuls"],
            [["100", "80", "20", "78", "", "1"], ["200", "150", "50", "148", "1", "1"]],
        )
        .unwrap();
        let cache = DatasetCache::preloaded("fixture.csv", ds);
        let selection = national(AnalysisType::VoteAnalysis);

        let strict = render(&selection, &cache, CellPolicy::Strict);
        assert_eq!(strict.errors().count(), 1);
        // Turnout metrics render before the ballot step fails
        assert_eq!(strict.metric("Total Voters"), Some(230));
        assert_eq!(strict.metric("Total Votes Blank"), None);

        let lenient = render(&selection, &cache, CellPolicy::ZeroFill);
        assert_eq!(lenient.errors().count(), 0);
        assert_eq!(lenient.metric("Total Votes Blank"), Some(1));
    }

    #[test]
    fn test_missing_column_shows_error() {
        let ds = Dataset::from_rows(["Inscrits", "Votants"], [["1", "1"]]).unwrap();
        let cache = DatasetCache::preloaded("fixture.csv", ds);
        let view = render(&national(AnalysisType::VoteAnalysis), &cache, CellPolicy::Strict);
        let expected = DashboardError::MissingColumn("Abstentionists".to_string()).to_string();
        assert_eq!(view.errors().collect::<Vec<_>>(), vec![expected.as_str()]);
    }

    #[test]
    fn test_page_navigation_wraps() {
        assert_eq!(Page::Homepage.previous(), Page::CityAnalysis);
        assert_eq!(Page::CityAnalysis.next(), Page::Homepage);
        assert_eq!(Page::Homepage.next(), Page::NationalAnalysis);
    }

    #[test]
    fn test_labels_round_trip() {
        for page in Page::ALL {
            assert_eq!(Page::from_label(page.label()), Some(page));
        }
        assert_eq!(Page::from_label("national analysis"), Some(Page::NationalAnalysis));
        assert_eq!(Page::from_label("Overseas"), None);
        assert_eq!(
            AnalysisType::from_label("Candidate Analysis"),
            Some(AnalysisType::CandidateAnalysis)
        );
    }
}
