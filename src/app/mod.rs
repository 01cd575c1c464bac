pub mod pipelines;
pub mod runner;

pub use runner::{run_analytics, run_campaign};
