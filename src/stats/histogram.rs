use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Timelike};

/// Bar width allotted to the busiest bucket; everything else scales down.
const MAX_BAR_WIDTH: f64 = 50.0;

/// Buckets queries by minute-of-hour and hour-of-day. Labels are two-digit
/// zero-padded strings so BTreeMap iteration yields them in interval order.
#[derive(Debug, Default)]
pub struct Histograms {
    minute: BTreeMap<String, u64>,
    hour: BTreeMap<String, u64>,
}

impl Histograms {
    pub fn observe(&mut self, when: NaiveDateTime) {
        *self.hour.entry(format!("{:02}", when.hour())).or_insert(0) += 1;
        *self
            .minute
            .entry(format!("{:02}", when.minute()))
            .or_insert(0) += 1;
    }

    pub fn minute(&self) -> &BTreeMap<String, u64> {
        &self.minute
    }

    pub fn hour(&self) -> &BTreeMap<String, u64> {
        &self.hour
    }
}

/// Renders a bucket table as (interval label, scaled bar, raw count) rows in
/// label order. An empty table yields no rows rather than a zero-division
/// when computing the scale.
pub fn render(table: &BTreeMap<String, u64>) -> Vec<(String, String, u64)> {
    let Some(largest) = table.values().max().copied().filter(|n| *n > 0) else {
        return Vec::new();
    };
    let scale = MAX_BAR_WIDTH / largest as f64;
    table
        .iter()
        .map(|(interval, count)| {
            let bar = "*".repeat((*count as f64 * scale) as usize);
            (interval.clone(), bar, *count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TIMESTAMP_FORMAT;

    fn ts(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).unwrap()
    }

    #[test]
    fn buckets_by_hour_and_minute() {
        let mut histograms = Histograms::default();
        histograms.observe(ts("08-Nov-2016 14:05:59.996"));
        histograms.observe(ts("08-Nov-2016 14:07:00.000"));
        histograms.observe(ts("08-Nov-2016 09:05:00.000"));

        assert_eq!(histograms.hour().get("14"), Some(&2));
        assert_eq!(histograms.hour().get("09"), Some(&1));
        assert_eq!(histograms.minute().get("05"), Some(&2));
        assert_eq!(histograms.minute().get("07"), Some(&1));
    }

    #[test]
    fn render_scales_to_fifty_chars() {
        let table = BTreeMap::from([("10".to_string(), 5), ("11".to_string(), 10)]);
        let rows = render(&table);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ("10".to_string(), "*".repeat(25), 5));
        assert_eq!(rows[1], ("11".to_string(), "*".repeat(50), 10));
    }

    #[test]
    fn render_empty_table_yields_no_rows() {
        assert!(render(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn rows_come_out_in_label_order() {
        let table = BTreeMap::from([
            ("23".to_string(), 1),
            ("00".to_string(), 1),
            ("09".to_string(), 1),
        ]);
        let labels: Vec<String> = render(&table).into_iter().map(|(l, _, _)| l).collect();
        assert_eq!(labels, vec!["00", "09", "23"]);
    }
}
