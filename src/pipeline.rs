use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::{info, warn};

use crate::parser::{self, TIMESTAMP_FORMAT};
use crate::stats::{Histograms, QueryCounters, ResolutionMatrix, RunSummary, TimeRange};

/// Optional inclusive time bounds from `--starttime`/`--endtime`. Records
/// outside the window reach no aggregator.
#[derive(Debug, Default)]
pub struct TimeWindow {
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
}

impl TimeWindow {
    pub fn new(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let parse = |raw: &str| {
            NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
                .with_context(|| format!("invalid time bound {raw:?}, expected DD-Mon-YYYY HH:MM:SS.mmm"))
        };
        Ok(Self {
            start: start.map(parse).transpose()?,
            end: end.map(parse).transpose()?,
        })
    }

    fn contains(&self, when: NaiveDateTime) -> bool {
        self.start.is_none_or(|start| when >= start) && self.end.is_none_or(|end| when <= end)
    }
}

/// Drives a run: reads each log file line by line, parses, and fans each
/// record out to the aggregators. Owns all mutable state for the run and
/// gives it up as a `RunSummary` when the input is exhausted.
pub struct Pipeline {
    counters: QueryCounters,
    time_range: TimeRange,
    matrix: Option<ResolutionMatrix>,
    histograms: Option<Histograms>,
    window: TimeWindow,
}

impl Pipeline {
    pub fn new(
        counters: QueryCounters,
        matrix: Option<ResolutionMatrix>,
        histograms: Option<Histograms>,
        window: TimeWindow,
    ) -> Self {
        Self {
            counters,
            time_range: TimeRange::default(),
            matrix,
            histograms,
            window,
        }
    }

    /// Processes the given log files in order. An unopenable file aborts the
    /// whole run; an unparseable line is logged and skipped.
    pub fn run<P: AsRef<str>>(mut self, logfiles: &[P]) -> Result<RunSummary> {
        for path in logfiles {
            let path = path.as_ref();
            info!("processing logfile {path}");
            let file =
                File::open(path).with_context(|| format!("could not open {path} for processing"))?;
            for line in BufReader::new(file).lines() {
                let line = line.with_context(|| format!("error reading from {path}"))?;
                match parser::parse_line(&line) {
                    Ok(record) => self.ingest(&record),
                    Err(err) => warn!("{err:#}"),
                }
            }
        }
        Ok(RunSummary {
            counters: self.counters,
            time_range: self.time_range,
            matrix: self.matrix,
            histograms: self.histograms,
        })
    }

    fn ingest(&mut self, record: &parser::QueryRecord) {
        if !self.window.contains(record.when) {
            return;
        }
        // Derived unconditionally so the matrix never sees a record without it.
        let client_net = record.client_net();

        self.time_range.observe(record.when, &record.timestamp);
        self.counters.record(record);
        if let Some(matrix) = &mut self.matrix {
            matrix.record(&record.query_name, &record.client_ip, &client_net);
        }
        if let Some(histograms) = &mut self.histograms {
            histograms.observe(record.when);
        }
    }
}
