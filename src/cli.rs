use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bind-query-stats")]
#[command(about = "Aggregates BIND query logs into summary statistics", long_about = None)]
pub struct Args {
    /// Print client to domain resolution info
    #[arg(long)]
    pub matrix: bool,

    /// Print per-minute and per-hour query histograms
    #[arg(long)]
    pub histogram: bool,

    /// Number of entries to display in the top-name and top-client lists
    #[arg(long, default_value_t = 100, value_name = "COUNT")]
    pub count: usize,

    /// Client addresses to exclude from the resolution matrix
    #[arg(long = "excludeip", num_args = 0.., value_name = "IP")]
    pub exclude_ips: Vec<String>,

    /// Network patterns to exclude from the resolution matrix,
    /// matched against each client's /24 prefix
    #[arg(long = "excludenet", num_args = 0.., value_name = "NET")]
    pub exclude_nets: Vec<String>,

    /// Regex patterns a query name must match to be counted ("." matches all)
    #[arg(long = "domains", num_args = 0.., value_name = "PATTERN", default_values = ["."])]
    pub domains: Vec<String>,

    /// Only count queries at or after this time (DD-Mon-YYYY HH:MM:SS.mmm)
    #[arg(long = "starttime", value_name = "TIME")]
    pub start_time: Option<String>,

    /// Only count queries at or before this time (DD-Mon-YYYY HH:MM:SS.mmm)
    #[arg(long = "endtime", value_name = "TIME")]
    pub end_time: Option<String>,

    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// BIND query logs to process
    #[arg(value_name = "LOGFILE")]
    pub logfiles: Vec<String>,
}
