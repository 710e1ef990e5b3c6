use std::collections::{BTreeMap, HashSet};

use anyhow::{Context, Result};
use regex::Regex;

/// Exclusion rules for the resolution matrix: literal client addresses and
/// regex patterns tested against the client's /24 prefix.
#[derive(Debug, Default)]
pub struct MatrixFilter {
    excluded_ips: HashSet<String>,
    excluded_nets: Vec<Regex>,
}

impl MatrixFilter {
    pub fn new(exclude_ips: &[String], exclude_nets: &[String]) -> Result<Self> {
        let excluded_nets = exclude_nets
            .iter()
            .map(|p| Regex::new(p).with_context(|| format!("invalid network pattern {p:?}")))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            excluded_ips: exclude_ips.iter().cloned().collect(),
            excluded_nets,
        })
    }

    fn excludes(&self, client_ip: &str, client_net: &str) -> bool {
        self.excluded_ips.contains(client_ip)
            || self.excluded_nets.iter().any(|p| p.is_match(client_net))
    }
}

/// Two-level mapping domain -> client -> query count, independent of the
/// domain filter applied to the frequency tables. BTreeMap keeps report
/// ordering deterministic.
#[derive(Debug)]
pub struct ResolutionMatrix {
    filter: MatrixFilter,
    entries: BTreeMap<String, BTreeMap<String, u64>>,
}

impl ResolutionMatrix {
    pub fn new(filter: MatrixFilter) -> Self {
        Self {
            filter,
            entries: BTreeMap::new(),
        }
    }

    /// Records one query unless the client is excluded. `client_net` must be
    /// the precomputed /24 prefix of `client_ip`.
    pub fn record(&mut self, domain: &str, client_ip: &str, client_net: &str) {
        if self.filter.excludes(client_ip, client_net) {
            return;
        }
        *self
            .entries
            .entry(domain.to_string())
            .or_default()
            .entry(client_ip.to_string())
            .or_insert(0) += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn domains(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, u64>)> {
        self.entries.iter().map(|(d, clients)| (d.as_str(), clients))
    }

    #[cfg(test)]
    fn clients_of(&self, domain: &str) -> Vec<(&str, u64)> {
        self.entries
            .get(domain)
            .map(|clients| clients.iter().map(|(c, n)| (c.as_str(), *n)).collect())
            .unwrap_or_default()
    }
}
