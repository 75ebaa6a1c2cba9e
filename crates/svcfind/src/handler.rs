//! Line command handler
//!
//! Commands (keywords are case-insensitive):
//! - `SEARCH <query>` or any line not starting with a keyword
//!
//! Queries are taken verbatim: after `SEARCH` everything past the single
//! separating space is the query, and a bare line is its own query, so
//! leading and trailing spaces take part in substring matching.
//! - `GET <key>`, `PUT <key> <value>`, `DEL <key>` on the key/value cache
//! - `STATS`
//! - `RELOAD` re-reads the catalog file and rebuilds the index

use std::path::PathBuf;

use serde::Serialize;
use serde_json::{json, Value};
use svccache::{IndexedSearch, SharedCache};
use svcstore::{load_catalog, ServiceRecord};
use tracing::{info, warn};

/// A parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Run a query
    Search(String),
    /// Read a cached value
    Get(String),
    /// Store a value
    Put(String, String),
    /// Remove a value
    Del(String),
    /// Report counters
    Stats,
    /// Reload the catalog
    Reload,
}

impl Command {
    /// Parse one input line.
    ///
    /// Lines whose first word is not a keyword are queries.
    pub fn parse(line: &str) -> Result<Command, String> {
        let head = line.trim_start();
        let (word, raw_rest) = head.split_once(char::is_whitespace).unwrap_or((head, ""));
        let rest = raw_rest.trim();

        match word.to_uppercase().as_str() {
            "SEARCH" => Ok(Command::Search(raw_rest.to_string())),
            "GET" => match rest {
                "" => Err(arity("get")),
                key => Ok(Command::Get(key.to_string())),
            },
            "PUT" => match rest.split_once(char::is_whitespace) {
                Some((key, value)) => Ok(Command::Put(key.to_string(), value.trim().to_string())),
                None => Err(arity("put")),
            },
            "DEL" => match rest {
                "" => Err(arity("del")),
                key => Ok(Command::Del(key.to_string())),
            },
            "STATS" if rest.is_empty() => Ok(Command::Stats),
            "RELOAD" if rest.is_empty() => Ok(Command::Reload),
            _ => Ok(Command::Search(line.to_string())),
        }
    }

    /// True for queries, which are subject to debouncing
    pub fn is_query(&self) -> bool {
        matches!(self, Command::Search(_))
    }
}

fn arity(command: &str) -> String {
    format!("ERR wrong number of arguments for '{}' command", command)
}

#[derive(Serialize)]
struct SearchResponse<'a> {
    query: &'a str,
    count: usize,
    results: Vec<&'a ServiceRecord>,
}

/// Executes commands against the search index and the key/value cache
pub struct CommandHandler {
    search: IndexedSearch<ServiceRecord>,
    kv: SharedCache<String, String>,
    catalog: Option<PathBuf>,
}

impl CommandHandler {
    /// Create a handler; `catalog` is the file `RELOAD` re-reads
    pub fn new(
        search: IndexedSearch<ServiceRecord>,
        kv: SharedCache<String, String>,
        catalog: Option<PathBuf>,
    ) -> Self {
        Self { search, kv, catalog }
    }

    /// Parse and execute one input line
    pub fn handle_line(&mut self, line: &str) -> Value {
        match Command::parse(line) {
            Ok(cmd) => self.handle(cmd),
            Err(e) => json!({ "error": e }),
        }
    }

    /// Execute a parsed command
    pub fn handle(&mut self, cmd: Command) -> Value {
        match cmd {
            Command::Search(query) => self.handle_search(&query),
            Command::Get(key) => json!({ "key": key, "value": self.kv.get(&key) }),
            Command::Put(key, value) => {
                self.kv.put(key, value);
                json!({ "ok": true })
            }
            Command::Del(key) => {
                let removed = self.kv.remove(&key).is_some();
                json!({ "key": key, "removed": removed })
            }
            Command::Stats => self.handle_stats(),
            Command::Reload => self.handle_reload(),
        }
    }

    fn handle_search(&mut self, query: &str) -> Value {
        let results = self.search.search(query);
        let response = SearchResponse {
            query,
            count: results.len(),
            results: results.iter().map(|r| &**r).collect(),
        };

        match serde_json::to_value(&response) {
            Ok(value) => value,
            Err(e) => json!({ "error": format!("ERR {}", e) }),
        }
    }

    fn handle_stats(&self) -> Value {
        let kv = self.kv.stats().snapshot();
        let queries = self.search.cache_stats().snapshot();

        json!({
            "kv": {
                "len": self.kv.len(),
                "capacity": self.kv.capacity(),
                "hits": kv.hits,
                "misses": kv.misses,
                "inserts": kv.inserts,
                "evictions": kv.evictions,
                "hit_ratio": kv.hit_ratio(),
            },
            "search": {
                "records": self.search.len(),
                "cached_queries": self.search.cached_queries(),
                "scans": self.search.scan_count(),
                "hits": queries.hits,
                "misses": queries.misses,
                "evictions": queries.evictions,
                "avg_latency_us": self.search.latency().average().as_micros() as u64,
            },
        })
    }

    fn handle_reload(&mut self) -> Value {
        let Some(path) = &self.catalog else {
            return json!({ "error": "ERR no catalog file to reload" });
        };

        match load_catalog(path) {
            Ok(records) => {
                self.search.reindex(records);
                info!("Reloaded {} records from {}", self.search.len(), path.display());
                json!({ "records": self.search.len() })
            }
            Err(e) => {
                warn!("Reload of {} failed: {}", path.display(), e);
                json!({ "error": format!("ERR {}", e) })
            }
        }
    }
}
