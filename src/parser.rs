use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;

/// Lexical form used by BIND query log timestamps, e.g. `08-Nov-2016 14:05:59.996`.
pub const TIMESTAMP_FORMAT: &str = "%d-%b-%Y %H:%M:%S%.3f";

/// One parsed query log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRecord {
    /// Raw timestamp text, kept for display.
    pub timestamp: String,
    pub when: NaiveDateTime,
    pub client_ip: String,
    pub query_name: String,
    pub record_type: String,
}

impl QueryRecord {
    /// First three dotted segments of the client address, e.g. `10.0.0` for
    /// `10.0.0.5`. Used as a coarse subnet identifier for matrix exclusions.
    pub fn client_net(&self) -> String {
        self.client_ip
            .split('.')
            .take(3)
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Parses one BIND query log line.
///
/// The log format is whitespace-tokenized and positionally ambiguous: the
/// token count depends on whether a view clause and/or a resolved-address
/// suffix are present. Three shapes are known:
///
/// ```text
/// # 11 tokens, no views (BIND 9.3)
/// 08-Nov-2016 14:05:59.996 query: info: client 1.2.3.4#7619: query: 10.10.10.10.in-addr.arpa IN PTR -E
///
/// # 13 tokens, with views (BIND 9.3)
/// 20-Sep-2016 11:26:15.510 query: info: client 1.2.3.4#60010: view standard: query: blip.prefetch.net IN AAAA +
///
/// # 15 tokens, with views and resolved address (BIND 9.9)
/// 20-Sep-2016 11:24:30.025 query: info: client 1.2.3.4#61687 (blip.prefetch.net): view standard: query: blip.prefetch.net IN A + (10.1.1.1)
/// ```
///
/// Any other token count is an error; callers log it and move on.
pub fn parse_line(line: &str) -> Result<QueryRecord> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let (name_idx, type_idx) = match tokens.len() {
        11 => (7, 9),
        13 => (9, 11),
        15 => (10, 12),
        n => bail!("unknown query log format ({n} fields), offending line: {line}"),
    };

    let timestamp = format!("{} {}", tokens[0], tokens[1]);
    let when = NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT)
        .with_context(|| format!("bad timestamp {timestamp:?}, offending line: {line}"))?;

    let client_ip = tokens[5]
        .split('#')
        .next()
        .unwrap_or_default()
        .to_string();

    Ok(QueryRecord {
        timestamp,
        when,
        client_ip,
        query_name: tokens[name_idx].to_string(),
        record_type: tokens[type_idx].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const NO_VIEWS: &str = "08-Nov-2016 14:05:59.996 query: info: client 1.2.3.4#7619: query: 10.10.10.10.in-addr.arpa IN PTR -E";
    const WITH_VIEWS: &str = "20-Sep-2016 11:26:15.510 query: info: client 1.2.3.4#60010: view standard: query: blip.prefetch.net IN AAAA +";
    const WITH_VIEWS_AND_ADDR: &str = "20-Sep-2016 11:24:30.025 query: info: client 1.2.3.4#61687 (blip.prefetch.net): view standard: query: blip.prefetch.net IN A + (10.1.1.1)";

    #[test]
    fn parses_all_known_formats() {
        let cases = [
            (NO_VIEWS, "1.2.3.4", "10.10.10.10.in-addr.arpa", "PTR"),
            (WITH_VIEWS, "1.2.3.4", "blip.prefetch.net", "AAAA"),
            (WITH_VIEWS_AND_ADDR, "1.2.3.4", "blip.prefetch.net", "A"),
        ];
        for (line, client, name, rr_type) in cases {
            let record = parse_line(line).unwrap();
            assert_eq!(record.client_ip, client, "client in {line:?}");
            assert_eq!(record.query_name, name, "name in {line:?}");
            assert_eq!(record.record_type, rr_type, "type in {line:?}");
        }
    }

    #[test]
    fn extracts_timestamp() {
        let record = parse_line(NO_VIEWS).unwrap();
        assert_eq!(record.timestamp, "08-Nov-2016 14:05:59.996");
        assert_eq!(record.when.year(), 2016);
        assert_eq!(record.when.month(), 11);
        assert_eq!(record.when.day(), 8);
        assert_eq!(record.when.hour(), 14);
        assert_eq!(record.when.minute(), 5);
        assert_eq!(record.when.second(), 59);
    }

    #[test]
    fn rejects_unknown_token_counts() {
        for line in ["", "too short", NO_VIEWS.trim_end_matches(" -E")] {
            let err = parse_line(line).unwrap_err();
            assert!(err.to_string().contains("unknown query log format"), "{err}");
        }
    }

    #[test]
    fn rejects_malformed_timestamp() {
        let line = NO_VIEWS.replace("08-Nov-2016", "yesterday-ish");
        let err = parse_line(&line).unwrap_err();
        assert!(err.to_string().contains("bad timestamp"), "{err}");
    }

    #[test]
    fn client_net_is_first_three_octets() {
        let record = parse_line(NO_VIEWS).unwrap();
        assert_eq!(record.client_net(), "1.2.3");
    }
}
