pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;
pub mod web;

pub use config::cli::LocalStorage;
pub use config::toml_config::DashboardConfig;
#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use app::pipelines::{AnalyticsPipeline, CampaignPipeline, CampaignRequest};
pub use core::etl::DashboardEngine;
pub use utils::error::{DashError, Result};
