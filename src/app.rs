use crate::data::{CellPolicy, DatasetCache};
use crate::pages::{self, Page, Selection};
use crate::view::View;
use log::{debug, warn};
use std::sync::Arc;

/// Which selector arrow keys drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Pages,
    Analysis,
}

/// Per-session application state
pub struct App {
    selection: Selection,
    pub focus: Focus,
    pub should_quit: bool,
    policy: CellPolicy,
    /// Shared, read-only once loaded
    data: Arc<DatasetCache>,
    /// Contents of the selected page, rebuilt when the selection changes
    view: View,
    /// Last page error written to the log
    last_error: Option<String>,
}

impl App {
    pub fn new(data: Arc<DatasetCache>, selection: Selection, policy: CellPolicy) -> Self {
        let mut app = Self {
            selection,
            focus: Focus::default(),
            should_quit: false,
            policy,
            data,
            view: View::default(),
            last_error: None,
        };
        app.refresh();
        app
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn policy(&self) -> CellPolicy {
        self.policy
    }

    pub fn data(&self) -> &DatasetCache {
        &self.data
    }

    /// Current page contents
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Rebuild the page for the current selection. A page error is logged
    /// once, not again until a different one shows up.
    fn refresh(&mut self) {
        self.view = pages::render(&self.selection, &*self.data, self.policy);
        let error = self.view.errors().next().map(str::to_owned);
        if let Some(e) = &error {
            if self.last_error.as_ref() != Some(e) {
                warn!("{}: {e}", self.selection.page.label());
            }
        }
        if error.is_some() {
            self.last_error = error;
        }
    }

    /// The analysis selector only exists on the national page
    pub fn has_analysis_selector(&self) -> bool {
        self.selection.page == Page::NationalAnalysis
    }

    pub fn next_page(&mut self) {
        self.select_page(self.selection.page.next());
    }

    pub fn previous_page(&mut self) {
        self.select_page(self.selection.page.previous());
    }

    pub fn select_page(&mut self, page: Page) {
        debug!("page -> {}", page.label());
        self.selection.page = page;
        if !self.has_analysis_selector() {
            self.focus = Focus::Pages;
        }
        self.refresh();
    }

    pub fn toggle_analysis(&mut self) {
        if self.has_analysis_selector() {
            self.selection.analysis = self.selection.analysis.toggle();
            debug!("analysis -> {}", self.selection.analysis.label());
            self.refresh();
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Pages if self.has_analysis_selector() => Focus::Analysis,
            _ => Focus::Pages,
        };
    }

    /// Up/down arrows: page list when focused, otherwise the analysis selector
    pub fn move_selection(&mut self, forward: bool) {
        match (self.focus, forward) {
            (Focus::Pages, true) => self.next_page(),
            (Focus::Pages, false) => self.previous_page(),
            (Focus::Analysis, _) => self.toggle_analysis(),
        }
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
