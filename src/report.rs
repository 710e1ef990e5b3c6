use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write};
use std::net::IpAddr;

use crate::stats::{RunSummary, render_histogram};

/// Turns a client address into a display name for the report. Failures fall
/// back to showing the raw address, so implementations return `None` instead
/// of an error.
pub trait HostnameResolver {
    fn resolve(&self, client_ip: &str) -> Option<String>;
}

/// Best-effort reverse DNS via the system resolver.
pub struct ReverseDns;

impl HostnameResolver for ReverseDns {
    fn resolve(&self, client_ip: &str) -> Option<String> {
        let addr: IpAddr = client_ip.parse().ok()?;
        dns_lookup::lookup_addr(&addr).ok()
    }
}

/// Writes the final report: summary, top names, top clients, then the
/// optional histogram and matrix sections. Pure formatting over an already
/// assembled summary.
pub fn write_report(
    out: &mut impl Write,
    summary: &RunSummary,
    count: usize,
    resolver: &dyn HostnameResolver,
) -> io::Result<()> {
    let first = summary.time_range.first().unwrap_or("n/a");
    let last = summary.time_range.last().unwrap_or("n/a");
    writeln!(out, "\nSummary for {first} - {last}\n")?;
    writeln!(
        out,
        "{:<25} : {}",
        "Total DNS queries processed", summary.counters.total_queries
    )?;
    for (rr_type, queries) in summary.counters.record_types.ranked() {
        writeln!(out, "  {rr_type:<6} records requested : {queries}")?;
    }

    writeln!(out, "\nTop {count} DNS names requested:")?;
    for (name, queries) in summary.counters.names.top(count) {
        writeln!(out, "  {name} : {queries}")?;
    }

    writeln!(out, "\nTop {count} DNS clients:")?;
    for (client_ip, queries) in summary.counters.clients.top(count) {
        writeln!(out, "  {} : {queries}", display_name(resolver, client_ip))?;
    }

    if let Some(histograms) = &summary.histograms {
        write_histogram(out, "minute", histograms.minute())?;
        write_histogram(out, "hour", histograms.hour())?;
    }

    if let Some(matrix) = &summary.matrix {
        writeln!(out, "\nDomain to client resolution matrix:")?;
        // One lookup per distinct address within this section.
        let mut names: HashMap<&str, String> = HashMap::new();
        for (domain, clients) in matrix.domains() {
            writeln!(out, "\n  {domain}")?;
            for (client_ip, queries) in clients {
                let display = names
                    .entry(client_ip)
                    .or_insert_with(|| display_name(resolver, client_ip));
                writeln!(out, "  |-- {display} {queries}")?;
            }
        }
    }

    Ok(())
}

fn display_name(resolver: &dyn HostnameResolver, client_ip: &str) -> String {
    resolver
        .resolve(client_ip)
        .unwrap_or_else(|| client_ip.to_string())
}

fn write_histogram(
    out: &mut impl Write,
    label: &str,
    table: &BTreeMap<String, u64>,
) -> io::Result<()> {
    writeln!(out, "\nQueries per {label}:")?;
    let rows = render_histogram(table);
    if rows.is_empty() {
        writeln!(out, "  no data")?;
        return Ok(());
    }
    for (interval, bar, queries) in rows {
        writeln!(out, "  {interval:>2}: {bar} ({queries})")?;
    }
    Ok(())
}
