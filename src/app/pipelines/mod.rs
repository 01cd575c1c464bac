pub mod analytics_pipeline;
pub mod campaign_pipeline;

pub use analytics_pipeline::AnalyticsPipeline;
pub use campaign_pipeline::{CampaignPipeline, CampaignRequest};
