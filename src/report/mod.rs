pub mod aggregate;
pub mod chart;
pub mod errors;
pub mod loader;
pub mod normalize;
pub mod processor;
pub mod runner;
pub mod structs;
pub mod table;

pub use errors::ReportError;
pub use processor::ReportAggregator;
pub use runner::{run, RunSummary};
pub use structs::{LoadKey, ProcessOutcome, SummaryRow, SummaryTable};
