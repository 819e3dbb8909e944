//! The record table: full list, live search, suggestions and paging.

use std::collections::BTreeSet;

use log::debug;

use crate::client::RecordStore;
use crate::errors::ClientError;
use crate::forms::RecordForm;
use crate::search::{self, Page, Pager, NO_RESULTS_MESSAGE};
use crate::types::{PropertyRecord, RecordId};

/// User actions the table reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    Query(String),
    SelectSuggestion(String),
    NextPage,
    PreviousPage,
}

#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    records: Vec<PropertyRecord>,
    query: String,
    filtered: Vec<PropertyRecord>,
    suggestions: BTreeSet<String>,
    no_results: bool,
    pager: Pager,
}

impl RecordTable {
    pub fn new(page_size: usize) -> Self {
        Self {
            pager: Pager::new(page_size),
            ..Self::default()
        }
    }

    /// Replaces the record set, keeping the query and returning to page 0.
    pub fn load(&mut self, records: Vec<PropertyRecord>) {
        self.records = records;
        self.pager.reset();
        self.recompute();
    }

    /// Fetches the full list from the store and loads it.
    pub async fn refresh<S>(&mut self, store: &S) -> Result<usize, ClientError>
    where
        S: RecordStore + ?Sized,
    {
        let records = store.list().await?;
        let count = records.len();
        self.load(records);
        Ok(count)
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.pager.reset();
        self.recompute();
    }

    pub fn select_suggestion(&mut self, suggestion: impl Into<String>) {
        self.set_query(suggestion);
    }

    pub fn next_page(&mut self) -> bool {
        self.pager.next(self.filtered.len())
    }

    pub fn previous_page(&mut self) -> bool {
        self.pager.previous()
    }

    /// Jumps to `page`, clamped to the last page. Returns the page landed on.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        let last = self.pager.page_count(self.filtered.len()) - 1;
        self.pager = self.pager.with_page(page.min(last));
        self.pager.page()
    }

    pub fn apply(&mut self, event: TableEvent) {
        match event {
            TableEvent::Query(query) => self.set_query(query),
            TableEvent::SelectSuggestion(suggestion) => self.select_suggestion(suggestion),
            TableEvent::NextPage => {
                self.next_page();
            }
            TableEvent::PreviousPage => {
                self.previous_page();
            }
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn records(&self) -> &[PropertyRecord] {
        &self.records
    }

    pub fn filtered(&self) -> &[PropertyRecord] {
        &self.filtered
    }

    pub fn suggestions(&self) -> &BTreeSet<String> {
        &self.suggestions
    }

    /// Suggestions containing the current query.
    pub fn autocomplete(&self) -> Vec<&str> {
        search::autocomplete(&self.suggestions, &self.query)
    }

    pub fn pager(&self) -> Pager {
        self.pager
    }

    pub fn current_page(&self) -> Page<&PropertyRecord> {
        self.pager.paginate(&self.filtered)
    }

    pub fn no_results(&self) -> bool {
        self.no_results
    }

    pub fn message(&self) -> Option<&'static str> {
        self.no_results.then_some(NO_RESULTS_MESSAGE)
    }

    pub fn find(&self, id: &RecordId) -> Option<&PropertyRecord> {
        self.records.iter().find(|record| record.has_id(id))
    }

    /// Opens an edit form for the record with `id`, if it is loaded.
    pub fn edit(&self, id: &RecordId) -> Option<RecordForm> {
        self.find(id).and_then(|record| RecordForm::edit(record).ok())
    }

    fn recompute(&mut self) {
        let outcome = search::filter(&self.records, &self.query);
        self.suggestions = search::build_suggestions(&outcome.records);
        self.no_results = outcome.no_results;
        self.filtered = outcome.records;
        debug!(
            "query {:?} kept {} of {} records",
            self.query,
            self.filtered.len(),
            self.records.len()
        );
    }
}
