//! Application state: no dataset, or one loaded dataset with its view state.
//!
//! Uploads are two-step. [`Session::begin_upload`] hands out a ticket when
//! the user picks a file; [`Session::finish_upload`] is called with that
//! ticket once the bytes have been read. Only the most recently issued ticket
//! may load: finishing an older one is a no-op, so a slow read of an earlier
//! file can never overwrite a newer one.

use crate::config::ViewerConfig;
use crate::engine::{filter_sort_paginate, View};
use crate::query::ViewQuery;
use crate::stats::{compute_stats, CategoryStats};
use sheetlens_sheet::{decode, Dataset, DecodeError, EncodeError};

/// Handle for one in-flight upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    generation: u64,
    file_name: String,
}

impl UploadTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// What happened to a finished upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The dataset was replaced
    Loaded,
    /// A newer upload (or a reset) was issued first; nothing changed
    Superseded,
}

/// A loaded dataset together with everything derived from it
#[derive(Debug, Clone)]
pub struct LoadedSheet {
    dataset: Dataset,
    stats: CategoryStats,
    query: ViewQuery,
}

impl LoadedSheet {
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub fn stats(&self) -> &CategoryStats {
        &self.stats
    }

    #[must_use]
    pub fn query(&self) -> &ViewQuery {
        &self.query
    }
}

#[derive(Debug, Clone, Default)]
enum State {
    #[default]
    Empty,
    Loaded(Box<LoadedSheet>),
}

/// Single-owner viewer state
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: ViewerConfig,
    state: State,
    latest_ticket: u64,
}

impl Session {
    #[must_use]
    pub fn new(config: ViewerConfig) -> Self {
        Session {
            config,
            state: State::Empty,
            latest_ticket: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, State::Loaded(_))
    }

    #[must_use]
    pub fn loaded(&self) -> Option<&LoadedSheet> {
        match &self.state {
            State::Loaded(sheet) => Some(&**sheet),
            State::Empty => None,
        }
    }

    #[must_use]
    pub fn dataset(&self) -> Option<&Dataset> {
        self.loaded().map(LoadedSheet::dataset)
    }

    #[must_use]
    pub fn stats(&self) -> Option<&CategoryStats> {
        self.loaded().map(LoadedSheet::stats)
    }

    /// Start an upload; any ticket issued earlier stops being current
    pub fn begin_upload(&mut self, file_name: &str) -> UploadTicket {
        self.latest_ticket += 1;
        tracing::debug!(generation = self.latest_ticket, file = file_name, "upload started");
        UploadTicket {
            generation: self.latest_ticket,
            file_name: file_name.to_string(),
        }
    }

    /// Finish an upload with the bytes that were read for it.
    ///
    /// A stale ticket is dropped without decoding. A decode failure leaves the
    /// current state as it was.
    pub fn finish_upload(&mut self, ticket: &UploadTicket, bytes: &[u8]) -> Result<UploadOutcome, DecodeError> {
        if ticket.generation != self.latest_ticket {
            tracing::warn!(
                generation = ticket.generation,
                latest = self.latest_ticket,
                file = %ticket.file_name,
                "discarding superseded upload"
            );
            return Ok(UploadOutcome::Superseded);
        }

        let dataset = decode(bytes, &ticket.file_name).inspect_err(|e| {
            tracing::warn!(file = %ticket.file_name, error = %e, "upload failed to decode");
        })?;
        self.replace(dataset);
        Ok(UploadOutcome::Loaded)
    }

    /// Load an already-decoded dataset, replacing whatever was there
    pub fn replace(&mut self, dataset: Dataset) {
        let stats = compute_stats(&dataset, &self.config.category);
        tracing::info!(
            file = dataset.file_name(),
            rows = dataset.len(),
            total = stats.total,
            "dataset loaded"
        );
        self.state = State::Loaded(Box::new(LoadedSheet {
            dataset,
            stats,
            query: ViewQuery::default(),
        }));
    }

    /// Drop the dataset and invalidate any upload still in flight
    pub fn reset(&mut self) {
        self.latest_ticket += 1;
        self.state = State::Empty;
        tracing::info!("session reset");
    }

    /// Mutable view state, or `None` when nothing is loaded
    pub fn query_mut(&mut self) -> Option<&mut ViewQuery> {
        match &mut self.state {
            State::Loaded(sheet) => Some(&mut sheet.query),
            State::Empty => None,
        }
    }

    /// Current page of the table; empty when nothing is loaded
    #[must_use]
    pub fn view(&self) -> View<'_> {
        match &self.state {
            State::Loaded(sheet) => filter_sort_paginate(&sheet.dataset, &sheet.query, self.config.page_size),
            State::Empty => View::empty(1),
        }
    }

    /// Apply `f` to the view state; no-op when nothing is loaded
    pub fn update_query<F>(&mut self, f: F)
    where
        F: FnOnce(&mut ViewQuery),
    {
        if let Some(query) = self.query_mut() {
            f(query);
        }
    }

    /// Move to the next page, clamped to the current page count
    pub fn next_page(&mut self) {
        let pages = self.view().total_pages;
        self.update_query(|q| q.next_page(pages));
    }

    /// Encode the loaded dataset with the configured export options
    pub fn export(&self) -> Result<Option<Vec<u8>>, EncodeError> {
        self.dataset()
            .map(|dataset| dataset.to_xlsx_bytes(&self.config.export))
            .transpose()
    }
}
