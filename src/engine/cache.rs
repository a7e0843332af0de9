//! Structural memoization of collocation queries.

use std::collections::{HashMap, VecDeque};

use super::collocation::{snapshot_collocations, CollocationOptions, CollocationResult};
use crate::corpus::{CorpusSnapshot, Fingerprint};
use crate::types::{LensResult, TermRef};

/// Cache key: the normalized target plus the full option record, compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollocationKey {
    pub target: TermRef,
    pub options: CollocationOptions,
}

impl CollocationKey {
    pub fn new(target: &TermRef, options: &CollocationOptions) -> Self {
        let mut options = options.clone();
        options.pair_term = options
            .pair_term
            .map(|p| TermRef::new(p.kind, &p.value));
        Self {
            target: TermRef::new(target.kind, &target.value),
            options,
        }
    }
}

/// Last computed result per key, bound to one snapshot fingerprint.
///
/// Using the cache with a snapshot whose fingerprint differs from the one
/// it was filled from clears every entry first.
pub struct CollocationCache {
    fingerprint: Option<Fingerprint>,
    entries: HashMap<CollocationKey, Vec<CollocationResult>>,
    /// Insertion order, oldest first.
    order: VecDeque<CollocationKey>,
    max_entries: usize,
    hits: u64,
    misses: u64,
}

impl CollocationCache {
    /// Default number of retained queries.
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache retaining at most `max_entries` queries (minimum 1).
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            fingerprint: None,
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_entries: max_entries.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached result for this query, computing it on a miss.
    /// Errors are never cached.
    pub fn get_or_compute(
        &mut self,
        snapshot: &CorpusSnapshot,
        target: &TermRef,
        options: &CollocationOptions,
    ) -> LensResult<&[CollocationResult]> {
        self.bind(snapshot.fingerprint());
        let key = CollocationKey::new(target, options);

        if self.entries.contains_key(&key) {
            self.hits += 1;
            log::trace!("collocation cache hit: {}", key.target);
        } else {
            self.misses += 1;
            log::trace!("collocation cache miss: {}", key.target);
            let results = snapshot_collocations(snapshot, &key.target, &key.options)?;
            if self.order.len() >= self.max_entries {
                if let Some(oldest) = self.order.pop_front() {
                    self.entries.remove(&oldest);
                }
            }
            self.order.push_back(key.clone());
            self.entries.insert(key.clone(), results);
        }

        Ok(self
            .entries
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    /// Drop every entry if the fingerprint changed.
    fn bind(&mut self, fingerprint: Fingerprint) {
        if self.fingerprint != Some(fingerprint) {
            if self.fingerprint.is_some() {
                log::debug!("collocation cache invalidated: snapshot is now {fingerprint}");
            }
            self.clear();
            self.fingerprint = Some(fingerprint);
        }
    }

    /// Remove every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

impl Default for CollocationCache {
    fn default() -> Self {
        Self::new()
    }
}
