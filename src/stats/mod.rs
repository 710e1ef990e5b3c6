mod frequency;
mod histogram;
mod matrix;
mod timerange;

pub use frequency::{DomainFilter, FrequencyTable, QueryCounters};
pub use histogram::{Histograms, render as render_histogram};
pub use matrix::{MatrixFilter, ResolutionMatrix};
pub use timerange::TimeRange;

/// Everything the report needs, assembled once ingestion has consumed all
/// input. Read-only from then on.
#[derive(Debug)]
pub struct RunSummary {
    pub counters: QueryCounters,
    pub time_range: TimeRange,
    pub matrix: Option<ResolutionMatrix>,
    pub histograms: Option<Histograms>,
}
