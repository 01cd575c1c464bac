//! Wires settings to concrete adapters and runs one flow end to end.

use crate::adapters::{AnalyticsAuth, AnalyticsClient, WebDriverConnector};
use crate::app::pipelines::{AnalyticsPipeline, CampaignPipeline, CampaignRequest};
use crate::config::cli::LocalStorage;
use crate::config::toml_config::DashboardConfig;
use crate::core::etl::DashboardEngine;
use crate::core::RenderedChart;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

pub async fn run_analytics(config: &DashboardConfig, monitor: bool) -> Result<RenderedChart> {
    let settings = config.analytics.clone();
    let auth = AnalyticsAuth::from_settings(&settings)?;
    let client = AnalyticsClient::new(&settings, auth)?;

    let storage = LocalStorage::new(config.output_dir());
    let pipeline = AnalyticsPipeline::new(storage, client, settings)
        .with_csv_export(config.output.export_csv);

    DashboardEngine::new_with_monitoring(pipeline, monitor)
        .run()
        .await
}

pub async fn run_campaign(
    config: &DashboardConfig,
    request: CampaignRequest,
    monitor: bool,
) -> Result<RenderedChart> {
    request.validate()?;

    let settings = config.campaign.clone();
    let connector = WebDriverConnector::from_settings(&settings);

    let storage = LocalStorage::new(config.output_dir());
    let pipeline = CampaignPipeline::new(storage, connector, settings, request)
        .with_csv_export(config.output.export_csv);

    DashboardEngine::new_with_monitoring(pipeline, monitor)
        .run()
        .await
}
