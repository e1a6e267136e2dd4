//! Offset/limit pagination over the rating service's page envelope.
//!
//! Every paginated endpoint takes a POSTed [`PageRequest`] and answers with a
//! [`PageEnvelope`] whose `hits` are opaque JSON records. The [`Paginator`]
//! only reads the envelope's `total`; turning hits into typed records is the
//! caller's job (see [`crate::mapper`]).
//!
//! # Termination
//!
//! After each page `next = offset + limit`. The walk continues while
//! `next < total`, so `total = 25, limit = 10` visits offsets 0, 10 and 20.
//! An optional safety cap stops the walk once `next >= cap`, whatever the
//! server claims `total` to be.

use async_trait::async_trait;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{DuprError, Result};
use crate::mapper::lenient;

// ============================================================================
// Request
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortOrder {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub order: SortOrder,
    pub parameter: String,
}

impl SortSpec {
    pub fn desc(parameter: impl Into<String>) -> Self {
        Self {
            order: SortOrder::Desc,
            parameter: parameter.into(),
        }
    }
}

/// Wire name of the filter list. The members endpoint says `filter`, the
/// history endpoint says `filters`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    Filter,
    Filters,
}

impl FilterKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::Filter => "filter",
            FilterKey::Filters => "filters",
        }
    }
}

/// Body POSTed for every page. Only `offset` changes between pages.
///
/// `exclude` and `filters` serialize as `null` when `None`. The service
/// rejects an empty list where it accepts `null`, so the two are kept
/// distinct.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub exclude: Option<Vec<String>>,
    pub limit: u64,
    pub offset: u64,
    pub query: String,
    pub filter_key: FilterKey,
    pub filters: Option<Vec<String>>,
    pub sort: SortSpec,
}

pub const DEFAULT_PAGE_LIMIT: u64 = 10;
pub const WILDCARD_QUERY: &str = "*";

impl PageRequest {
    /// Wildcard query, members sorted by name descending.
    pub fn club_members() -> Self {
        Self {
            exclude: None,
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
            query: WILDCARD_QUERY.to_string(),
            filter_key: FilterKey::Filter,
            filters: None,
            sort: SortSpec::desc("fullNameSort"),
        }
    }

    /// Wildcard query, matches sorted by date descending.
    pub fn match_history() -> Self {
        Self {
            exclude: None,
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
            query: WILDCARD_QUERY.to_string(),
            filter_key: FilterKey::Filters,
            filters: None,
            sort: SortSpec::desc("MATCH_DATE"),
        }
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }
}

impl Serialize for PageRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(6))?;
        map.serialize_entry("exclude", &self.exclude)?;
        map.serialize_entry("limit", &self.limit)?;
        map.serialize_entry("offset", &self.offset)?;
        map.serialize_entry("query", &self.query)?;
        map.serialize_entry(self.filter_key.as_str(), &self.filters)?;
        map.serialize_entry("sort", &self.sort)?;
        map.end()
    }
}

// ============================================================================
// Envelope
// ============================================================================

/// Generic page wrapper returned by every paginated endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageEnvelope {
    #[serde(deserialize_with = "lenient")]
    pub offset: u64,
    #[serde(deserialize_with = "lenient")]
    pub limit: u64,
    #[serde(deserialize_with = "lenient")]
    pub total: u64,
    /// Missing or `null` hits decode as an empty page.
    #[serde(deserialize_with = "lenient")]
    pub hits: Vec<Value>,
}

/// Offset of the page after `offset`, or `None` once `total` is reached.
pub fn next_offset(offset: u64, limit: u64, total: u64) -> Option<u64> {
    let next = offset.saturating_add(limit);
    (next < total).then_some(next)
}

// ============================================================================
// Page source
// ============================================================================

/// Anything that can answer one page request.
///
/// Implemented by [`crate::DuprClient`] over HTTP and by
/// [`crate::testing::MockPageSource`] in tests.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, path: &str, request: &PageRequest) -> Result<PageEnvelope>;
}

// ============================================================================
// Outcome
// ============================================================================

/// How a walk ended.
#[derive(Debug)]
pub enum Completion {
    /// Every page up to `total` was fetched.
    Exhausted,
    /// The safety cap stopped the walk before `total` was reached.
    Capped { next_offset: u64 },
    /// A page request failed; items hold everything fetched before it.
    Partial(DuprError),
}

/// Items accumulated by a walk together with how it ended.
#[derive(Debug)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub pages: usize,
    pub completion: Completion,
}

impl<T> Paged<T> {
    /// Transform the accumulated items, keeping page count and completion.
    pub fn map_items<U>(self, f: impl FnOnce(Vec<T>) -> Vec<U>) -> Paged<U> {
        Paged {
            items: f(self.items),
            pages: self.pages,
            completion: self.completion,
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self.completion, Completion::Partial(_))
    }

    pub fn is_capped(&self) -> bool {
        matches!(self.completion, Completion::Capped { .. })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items when the walk did not fail; the page error otherwise.
    pub fn into_result(self) -> Result<Vec<T>> {
        match self.completion {
            Completion::Partial(e) => Err(e),
            Completion::Exhausted | Completion::Capped { .. } => Ok(self.items),
        }
    }
}

// ============================================================================
// Paginator
// ============================================================================

/// Drives the sequential page loop against one endpoint.
pub struct Paginator<'a, S: PageSource + ?Sized> {
    source: &'a S,
    cap: Option<u64>,
}

impl<'a, S: PageSource + ?Sized> Paginator<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source, cap: None }
    }

    /// Stop once the next offset would reach `cap` records.
    pub fn with_cap(mut self, cap: u64) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Fetch pages starting at `request.offset` until the envelope is
    /// exhausted, the cap is reached or a request fails.
    ///
    /// Only an invalid request is an `Err`; a failing page ends the walk
    /// with [`Completion::Partial`].
    pub async fn fetch_all(&self, path: &str, request: &mut PageRequest) -> Result<Paged<Value>> {
        if request.limit == 0 {
            return Err(DuprError::Config("page limit must be greater than zero".into()));
        }

        let mut hits = Vec::new();
        let mut pages = 0;

        let completion = loop {
            debug!(path, offset = request.offset, limit = request.limit, "Requesting page");

            let envelope = match self.source.fetch_page(path, request).await {
                Ok(envelope) => envelope,
                Err(e) => {
                    warn!(path, offset = request.offset, error = %e, "Page request failed, returning partial result");
                    break Completion::Partial(e);
                }
            };
            pages += 1;

            // The server may clamp the page size; step by what it served.
            let step = if envelope.limit > 0 { envelope.limit } else { request.limit };
            if step != request.limit {
                debug!(path, requested = request.limit, served = step, "Server adjusted page size");
            }

            let expected = envelope.total.saturating_sub(request.offset).min(step);
            if (envelope.hits.len() as u64) < expected {
                warn!(
                    path,
                    offset = request.offset,
                    total = envelope.total,
                    hits = envelope.hits.len(),
                    "Page shorter than total implies"
                );
            }
            debug!(path, offset = request.offset, total = envelope.total, hits = envelope.hits.len(), "Page received");
            hits.extend(envelope.hits);

            match next_offset(request.offset, step, envelope.total) {
                None => break Completion::Exhausted,
                Some(next) if self.cap.is_some_and(|cap| next >= cap) => {
                    info!(path, next_offset = next, total = envelope.total, "Safety cap reached");
                    break Completion::Capped { next_offset: next };
                }
                Some(next) => request.offset = next,
            }
        };

        Ok(Paged {
            items: hits,
            pages,
            completion,
        })
    }
}
