//! Testing utilities including mock implementations.
//!
//! Useful for exercising pagination and fetch logic without a network.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use crate::error::{DuprError, Result};
use crate::pagination::{PageEnvelope, PageRequest, PageSource};

/// A recorded page request.
#[derive(Debug, Clone)]
pub struct PageCall {
    pub path: String,
    pub request: PageRequest,
}

/// Mock page source with canned or synthesized envelopes.
///
/// Queued pages (see [`MockPageSource::with_page`]) are served first, in
/// order. Once the queue is empty, a source built with
/// [`MockPageSource::uniform`] synthesizes a page for whatever offset is
/// requested; otherwise an empty envelope is returned.
#[derive(Default, Clone)]
pub struct MockPageSource {
    queued: Arc<Mutex<VecDeque<PageEnvelope>>>,
    /// Reported total for synthesized pages
    uniform_total: Option<u64>,
    /// Hit shape for synthesized pages, given the absolute record index
    hit_fn: Option<Arc<dyn Fn(u64) -> Value + Send + Sync>>,
    fail_offsets: Arc<Mutex<HashSet<u64>>>,
    calls: Arc<Mutex<Vec<PageCall>>>,
}

impl MockPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `total` records, each hit being `{"index": n}`.
    pub fn uniform(total: u64) -> Self {
        Self {
            uniform_total: Some(total),
            ..Self::default()
        }
    }

    /// Build synthesized hits with `f(index)` instead of `{"index": n}`.
    pub fn with_hits(mut self, f: impl Fn(u64) -> Value + Send + Sync + 'static) -> Self {
        self.hit_fn = Some(Arc::new(f));
        self
    }

    /// Queue a canned envelope.
    pub fn with_page(self, page: PageEnvelope) -> Self {
        self.queued.lock().unwrap().push_back(page);
        self
    }

    /// Fail any request made at `offset`.
    pub fn fail_at(self, offset: u64) -> Self {
        self.fail_offsets.lock().unwrap().insert(offset);
        self
    }

    /// All requests received, in order.
    pub fn calls(&self) -> Vec<PageCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn requested_offsets(&self) -> Vec<u64> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|call| call.request.offset)
            .collect()
    }

    fn synthesize(&self, total: u64, request: &PageRequest) -> PageEnvelope {
        let end = request.offset.saturating_add(request.limit).min(total);
        let hits = (request.offset..end)
            .map(|index| match &self.hit_fn {
                Some(f) => f(index),
                None => json!({ "index": index }),
            })
            .collect();

        PageEnvelope {
            offset: request.offset,
            limit: request.limit,
            total,
            hits,
        }
    }
}

#[async_trait]
impl PageSource for MockPageSource {
    async fn fetch_page(&self, path: &str, request: &PageRequest) -> Result<PageEnvelope> {
        self.calls.lock().unwrap().push(PageCall {
            path: path.to_string(),
            request: request.clone(),
        });

        if self.fail_offsets.lock().unwrap().contains(&request.offset) {
            return Err(DuprError::Api {
                status: 503,
                message: format!("mock failure at offset {}", request.offset),
            });
        }

        if let Some(page) = self.queued.lock().unwrap().pop_front() {
            return Ok(page);
        }

        Ok(match self.uniform_total {
            Some(total) => self.synthesize(total, request),
            None => PageEnvelope::default(),
        })
    }
}
