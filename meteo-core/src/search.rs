//! Location search against a geocoding service.
//!
//! One logical search may fan out into several lookups (see [`expand_query`]).
//! Every branch fails soft; the merged, deduplicated candidates are returned.

use futures::future::join_all;
use std::collections::HashSet;
use tracing::debug;

use crate::{geocoding::Geocoder, model::SearchCandidate};

/// Queries shorter than this (in chars) are not looked up.
pub const MIN_QUERY_CHARS: usize = 2;

/// Endings that already name a municipality level.
const LOCALITY_SUFFIXES: [char; 4] = ['市', '区', '町', '村'];

/// Appended to bare Japanese names; the geocoder often indexes only the suffixed form.
const AUGMENT_SUFFIXES: [char; 2] = ['市', '区'];

/// Kanji, hiragana, katakana and the long vowel mark.
pub fn is_japanese(c: char) -> bool {
    matches!(
        c,
        '\u{4E00}'..='\u{9FA0}' | '\u{3041}'..='\u{3094}' | '\u{30A1}'..='\u{30F4}' | '\u{30FC}'
    )
}

/// The lookups issued for one query, plain query first.
pub fn expand_query(query: &str) -> Vec<String> {
    let mut queries = vec![query.to_string()];

    let has_suffix = query.ends_with(LOCALITY_SUFFIXES);
    if query.chars().any(is_japanese) && !has_suffix {
        queries.extend(AUGMENT_SUFFIXES.iter().map(|suffix| format!("{query}{suffix}")));
    }

    queries
}

/// Concatenate branches in order and keep the first candidate seen per id.
pub fn merge_unique<I>(branches: I) -> Vec<SearchCandidate>
where
    I: IntoIterator<Item = Vec<SearchCandidate>>,
{
    let mut seen = HashSet::new();

    branches
        .into_iter()
        .flatten()
        .filter(|candidate| seen.insert(candidate.id))
        .collect()
}

#[derive(Debug)]
pub struct LocationSearch<G> {
    geocoder: G,
}

impl<G: Geocoder> LocationSearch<G> {
    pub fn new(geocoder: G) -> Self {
        Self { geocoder }
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Look up `query`. Never fails: a broken branch contributes nothing.
    pub async fn search(&self, query: &str) -> Vec<SearchCandidate> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        let queries = expand_query(query);
        let lookups = queries.iter().map(|q| async move {
            match self.geocoder.lookup(q).await {
                Ok(found) => found,
                Err(err) => {
                    debug!(query = %q, error = %err, "geocoding branch failed");
                    Vec::new()
                }
            }
        });

        let merged = merge_unique(join_all(lookups).await);
        debug!(query, branches = queries.len(), found = merged.len(), "search finished");
        merged
    }
}
