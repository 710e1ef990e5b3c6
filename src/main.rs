use std::io::{self, Write};
use std::process::exit;

use anyhow::Result;
use clap::Parser;
use log::info;

use bind_query_stats::cli::Args;
use bind_query_stats::pipeline::{Pipeline, TimeWindow};
use bind_query_stats::report::{self, ReverseDns};
use bind_query_stats::stats::{
    DomainFilter, Histograms, MatrixFilter, QueryCounters, ResolutionMatrix,
};

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    if args.logfiles.is_empty() {
        eprintln!("No log files specified on command line");
        exit(1);
    }

    let pipeline = match build_pipeline(&args) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            eprintln!("{err:#}");
            exit(1);
        }
    };

    info!("processing {} logfile(s)", args.logfiles.len());
    let summary = match pipeline.run(&args.logfiles) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("{err:#}");
            exit(1);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::write_report(&mut out, &summary, args.count, &ReverseDns)?;
    out.flush()?;

    Ok(())
}

fn build_pipeline(args: &Args) -> Result<Pipeline> {
    let counters = QueryCounters::new(DomainFilter::new(&args.domains)?);
    let matrix = args
        .matrix
        .then(|| MatrixFilter::new(&args.exclude_ips, &args.exclude_nets))
        .transpose()?
        .map(ResolutionMatrix::new);
    let histograms = args.histogram.then(Histograms::default);
    let window = TimeWindow::new(args.start_time.as_deref(), args.end_time.as_deref())?;
    Ok(Pipeline::new(counters, matrix, histograms, window))
}
