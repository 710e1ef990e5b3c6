use std::collections::HashMap;

use anyhow::{Context, Result};
use regex::Regex;

use crate::parser::QueryRecord;

/// Query-name filter built from the `--domains` patterns.
///
/// The single pattern `"."` is a sentinel meaning "count everything" and
/// skips regex evaluation entirely.
#[derive(Debug)]
pub enum DomainFilter {
    MatchAll,
    Patterns(Vec<Regex>),
}

impl DomainFilter {
    pub fn new(patterns: &[String]) -> Result<Self> {
        if patterns.len() == 1 && patterns[0] == "." {
            return Ok(Self::MatchAll);
        }
        let compiled = patterns
            .iter()
            .map(|p| Regex::new(p).with_context(|| format!("invalid domain pattern {p:?}")))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::Patterns(compiled))
    }

    /// First matching pattern wins; later patterns are not evaluated.
    pub fn matches(&self, query_name: &str) -> bool {
        match self {
            Self::MatchAll => true,
            Self::Patterns(patterns) => patterns.iter().any(|p| p.is_match(query_name)),
        }
    }
}

/// Counter table keyed by query name, client address or record type.
/// Keys appear on first observation; counts only ever increase.
#[derive(Debug, Default)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    pub fn increment(&mut self, key: &str) {
        *self.counts.entry(key.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Top `n` entries by count descending. Ties break on lexical key order
    /// so repeated runs over the same input produce the same report.
    pub fn top(&self, n: usize) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> =
            self.counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }

    /// All entries, count descending with the same tie-break as `top`.
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        self.top(self.counts.len())
    }
}

/// The frequency side of the run: per-name, per-client and per-type counters
/// plus the global query total, all gated by the domain filter.
#[derive(Debug)]
pub struct QueryCounters {
    filter: DomainFilter,
    pub total_queries: u64,
    pub names: FrequencyTable,
    pub clients: FrequencyTable,
    pub record_types: FrequencyTable,
}

impl QueryCounters {
    pub fn new(filter: DomainFilter) -> Self {
        Self {
            filter,
            total_queries: 0,
            names: FrequencyTable::default(),
            clients: FrequencyTable::default(),
            record_types: FrequencyTable::default(),
        }
    }

    /// Counts the record if the domain filter accepts its query name.
    /// Returns whether it was counted.
    pub fn record(&mut self, record: &QueryRecord) -> bool {
        if !self.filter.matches(&record.query_name) {
            return false;
        }
        self.total_queries += 1;
        self.names.increment(&record.query_name);
        self.clients.increment(&record.client_ip);
        self.record_types.increment(&record.record_type);
        true
    }
}
