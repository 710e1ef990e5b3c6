pub mod cli;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod stats;
