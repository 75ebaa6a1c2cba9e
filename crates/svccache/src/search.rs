//! Memoized substring search over a fixed record collection
//!
//! The index is built once per record set: each record contributes its
//! lowercased, space-joined searchable fields. Queries are lowercased and
//! matched by plain substring containment, results keep collection order.
//! Results are memoized in a [`BoundedCache`] keyed by the lowercased query.

use std::sync::Arc;
use std::time::Instant;

use svcstore::{Result, Searchable};
use tracing::{debug, trace};

use crate::latency::LatencyWindow;
use crate::lru::BoundedCache;
use crate::stats::CacheStats;

/// Ordered, shared result of one query
pub type SearchResults<R> = Arc<[Arc<R>]>;

struct IndexEntry<R> {
    record: Arc<R>,
    text: String,
}

/// Case-insensitive substring search with a bounded query cache
pub struct IndexedSearch<R> {
    entries: Vec<IndexEntry<R>>,
    queries: BoundedCache<String, SearchResults<R>>,
    stats: CacheStats,
    latency: LatencyWindow,
    scans: u64,
}

impl<R: Searchable> IndexedSearch<R> {
    /// Index `records` with a query cache of the default capacity
    pub fn new(records: impl IntoIterator<Item = R>) -> Self {
        Self::with_query_cache(records, BoundedCache::default())
    }

    /// Index `records` with a query cache holding at most `capacity` queries
    pub fn with_cache_capacity(records: impl IntoIterator<Item = R>, capacity: usize) -> Result<Self> {
        Ok(Self::with_query_cache(records, BoundedCache::try_new(capacity)?))
    }

    fn with_query_cache(
        records: impl IntoIterator<Item = R>,
        queries: BoundedCache<String, SearchResults<R>>,
    ) -> Self {
        let mut search = Self {
            entries: Vec::new(),
            queries,
            stats: CacheStats::new(),
            latency: LatencyWindow::default(),
            scans: 0,
        };
        search.build(records);
        search
    }

    fn build(&mut self, records: impl IntoIterator<Item = R>) {
        self.entries = records
            .into_iter()
            .map(|record| IndexEntry {
                text: record.searchable_text(),
                record: Arc::new(record),
            })
            .collect();
    }

    /// Records whose searchable text contains `query`, ignoring case.
    ///
    /// An empty query matches every record. Repeating a query (in any
    /// letter case) returns the memoized result without rescanning.
    pub fn search(&mut self, query: &str) -> SearchResults<R> {
        let started = Instant::now();
        let key = query.to_lowercase();

        if let Some(cached) = self.queries.get(&key) {
            self.stats.record_hit();
            let cached = Arc::clone(cached);
            self.latency.record(started.elapsed());
            return cached;
        }
        self.stats.record_miss();

        self.scans += 1;
        let results: SearchResults<R> = self
            .entries
            .iter()
            .filter(|entry| entry.text.contains(key.as_str()))
            .map(|entry| Arc::clone(&entry.record))
            .collect();
        trace!(query = %key, matches = results.len(), "scanned search index");

        self.stats.record_insert();
        if let Some((evicted, _)) = self.queries.put(key, Arc::clone(&results)) {
            debug!(query = %evicted, "evicted cached query");
            self.stats.record_eviction();
        }

        self.latency.record(started.elapsed());
        results
    }

    /// Replace the record collection, rebuilding the index and dropping
    /// every memoized result
    pub fn reindex(&mut self, records: impl IntoIterator<Item = R>) {
        self.build(records);
        self.queries.clear();
        debug!(records = self.entries.len(), "rebuilt search index");
    }

    /// Indexed records in collection order
    pub fn records(&self) -> impl Iterator<Item = &R> + '_ {
        self.entries.iter().map(|entry| entry.record.as_ref())
    }

    /// Number of indexed records
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no record is indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of memoized queries
    pub fn cached_queries(&self) -> usize {
        self.queries.len()
    }

    /// Full index scans performed so far
    pub fn scan_count(&self) -> u64 {
        self.scans
    }

    /// Query cache counters
    pub fn cache_stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Durations of recent searches
    pub fn latency(&self) -> &LatencyWindow {
        &self.latency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svcstore::{Error, ServiceRecord};

    fn catalog() -> Vec<ServiceRecord> {
        vec![
            ServiceRecord::new("Firewall Setup", "network defense", "network"),
            ServiceRecord::new("Malware Scan", "endpoint defense", "endpoint"),
        ]
    }

    fn names(results: &SearchResults<ServiceRecord>) -> Vec<&str> {
        results.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_end_to_end() {
        let mut search = IndexedSearch::new(catalog());

        assert_eq!(
            names(&search.search("defense")),
            vec!["Firewall Setup", "Malware Scan"]
        );
        assert_eq!(names(&search.search("network")), vec!["Firewall Setup"]);
    }

    #[test]
    fn test_substring_ignores_case() {
        let mut search = IndexedSearch::new(catalog());

        assert_eq!(names(&search.search("WARE sC")), vec!["Malware Scan"]);
        // Matches across the field separator
        assert_eq!(names(&search.search("setup network")), vec!["Firewall Setup"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let mut search = IndexedSearch::new(catalog());
        assert!(search.search("quantum").is_empty());
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let mut search = IndexedSearch::new(catalog());
        assert_eq!(
            names(&search.search("")),
            vec!["Firewall Setup", "Malware Scan"]
        );
    }

    #[test]
    fn test_repeat_query_does_not_rescan() {
        let mut search = IndexedSearch::new(catalog());

        let first = search.search("defense");
        let second = search.search("defense");

        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(search.scan_count(), 1);
        assert_eq!(search.cache_stats().hits(), 1);
        assert_eq!(search.cache_stats().misses(), 1);
    }

    #[test]
    fn test_cache_key_is_lowercased_query() {
        let mut search = IndexedSearch::new(catalog());

        let upper = search.search("Defense");
        let lower = search.search("defense");

        assert_eq!(upper, lower);
        assert_eq!(search.scan_count(), 1);
        assert_eq!(search.cached_queries(), 1);
    }

    #[test]
    fn test_query_cache_is_bounded() {
        let mut search = IndexedSearch::with_cache_capacity(catalog(), 2).unwrap();

        search.search("a");
        search.search("b");
        search.search("c");
        assert_eq!(search.cached_queries(), 2);
        assert_eq!(search.cache_stats().evictions(), 1);

        // "a" was evicted, "c" is still cached
        search.search("a");
        assert_eq!(search.scan_count(), 4);
        search.search("a");
        assert_eq!(search.scan_count(), 4);
    }

    #[test]
    fn test_zero_query_cache_rejected() {
        let result = IndexedSearch::with_cache_capacity(catalog(), 0);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_reindex_drops_cached_results() {
        let mut search = IndexedSearch::new(catalog());
        assert_eq!(search.search("vpn").len(), 0);

        let mut records = catalog();
        records.push(ServiceRecord::new("VPN Gateway", "remote access", "network"));
        search.reindex(records);

        assert_eq!(search.len(), 3);
        assert_eq!(search.cached_queries(), 0);
        assert_eq!(names(&search.search("vpn")), vec!["VPN Gateway"]);
    }

    #[test]
    fn test_subcategory_is_searchable() {
        let records = vec![
            ServiceRecord::new("Pen Test", "offensive review", "audit").with_subcategory("Web Apps"),
            ServiceRecord::new("Code Review", "static analysis", "audit"),
        ];
        let mut search = IndexedSearch::new(records);

        assert_eq!(names(&search.search("web apps")), vec!["Pen Test"]);
    }

    #[test]
    fn test_custom_field_list() {
        struct Tag(&'static str, &'static str);

        impl Searchable for Tag {
            fn searchable_fields(&self) -> Vec<&str> {
                vec![self.0]
            }
        }

        let mut search = IndexedSearch::new(vec![Tag("alpha", "hidden"), Tag("beta", "alpha")]);
        let results = search.search("alpha");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].1, "hidden");
    }

    #[test]
    fn test_records_and_latency() {
        let mut search = IndexedSearch::new(catalog());
        assert_eq!(search.records().count(), 2);
        assert!(search.latency().is_empty());

        search.search("scan");
        search.search("scan");
        assert_eq!(search.latency().len(), 2);
    }
}
