use chrono::NaiveDateTime;

/// Tracks the earliest and latest query timestamps seen during a run.
/// The raw timestamp text is retained so the report shows exactly what the
/// log contained.
#[derive(Debug, Default)]
pub struct TimeRange {
    first: Option<(NaiveDateTime, String)>,
    last: Option<(NaiveDateTime, String)>,
}

impl TimeRange {
    pub fn observe(&mut self, when: NaiveDateTime, raw: &str) {
        match &self.first {
            Some((earliest, _)) if *earliest <= when => {}
            _ => self.first = Some((when, raw.to_string())),
        }
        match &self.last {
            Some((latest, _)) if *latest >= when => {}
            _ => self.last = Some((when, raw.to_string())),
        }
    }

    pub fn first(&self) -> Option<&str> {
        self.first.as_ref().map(|(_, raw)| raw.as_str())
    }

    pub fn last(&self) -> Option<&str> {
        self.last.as_ref().map(|(_, raw)| raw.as_str())
    }
}
