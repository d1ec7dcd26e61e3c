//! Debounced search session.
//!
//! Every call to [`SearchSession::input`] bumps a sequence number. The search
//! for that input runs in a spawned task after the debounce window and posts
//! a [`Completion`] tagged with the number it was issued under. Only a
//! completion carrying the latest number is ever applied, so a superseded
//! search can never overwrite the candidates of a newer one, whatever order
//! the responses arrive in.

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tracing::debug;

use crate::{
    geocoding::Geocoder,
    model::SearchCandidate,
    search::{LocationSearch, MIN_QUERY_CHARS},
};

/// Result of one scheduled search.
#[derive(Debug, Clone)]
pub struct Completion {
    pub seq: u64,
    pub query: String,
    pub candidates: Vec<SearchCandidate>,
}

#[derive(Debug)]
pub struct SearchSession<G> {
    search: Arc<LocationSearch<G>>,
    debounce: Duration,
    query: String,
    latest: u64,
    pending: Option<JoinHandle<()>>,
    tx: UnboundedSender<Completion>,
    rx: UnboundedReceiver<Completion>,
    candidates: Vec<SearchCandidate>,
    open: bool,
    loading: bool,
}

impl<G: Geocoder + 'static> SearchSession<G> {
    pub fn new(search: Arc<LocationSearch<G>>, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            search,
            debounce,
            query: String::new(),
            latest: 0,
            pending: None,
            tx,
            rx,
            candidates: Vec::new(),
            open: false,
            loading: false,
        }
    }

    /// Record a new query. Cancels whatever search is still pending and,
    /// for queries long enough, schedules a new one after the debounce window.
    pub fn input(&mut self, query: impl Into<String>) {
        self.invalidate();
        self.query = query.into();

        if self.query.chars().count() < MIN_QUERY_CHARS {
            self.candidates.clear();
            self.open = false;
            return;
        }

        let seq = self.latest;
        let query = self.query.clone();
        let search = Arc::clone(&self.search);
        let tx = self.tx.clone();
        let debounce = self.debounce;

        self.loading = true;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let candidates = search.search(&query).await;
            // Send only fails once the session is gone.
            let _ = tx.send(Completion { seq, query, candidates });
        }));
    }

    /// Apply a completion if it belongs to the latest input. Returns whether it was applied.
    pub fn apply(&mut self, completion: Completion) -> bool {
        if completion.seq != self.latest {
            debug!(
                seq = completion.seq,
                latest = self.latest,
                query = %completion.query,
                "discarding superseded search result"
            );
            return false;
        }

        self.candidates = completion.candidates;
        self.open = true;
        self.loading = false;
        self.pending = None;
        true
    }

    /// Wait for the latest search to complete and return its candidates.
    /// Superseded completions are dropped on the way. With no search
    /// pending, the current candidates are returned at once.
    pub async fn next_results(&mut self) -> &[SearchCandidate] {
        if self.pending.is_none() {
            return &self.candidates;
        }

        // The session owns a sender, so `recv` only yields `None` after close.
        while let Some(completion) = self.rx.recv().await {
            if self.apply(completion) {
                break;
            }
        }

        &self.candidates
    }

    /// Pick a candidate from the current list. Ends the current search: the
    /// query and candidates are cleared and the result panel closes.
    pub fn select(&mut self, id: i64) -> Option<SearchCandidate> {
        let chosen = self.candidates.iter().find(|c| c.id == id).cloned()?;

        self.invalidate();
        self.query.clear();
        self.candidates.clear();
        self.open = false;

        Some(chosen)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn candidates(&self) -> &[SearchCandidate] {
        &self.candidates
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Make every outstanding completion stale and stop the pending task.
    fn invalidate(&mut self) {
        self.latest += 1;
        self.loading = false;
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

impl<G> Drop for SearchSession<G> {
    fn drop(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}
