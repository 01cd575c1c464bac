use crate::adapters::AnalyticsClient;
use crate::config::toml_config::AnalyticsSettings;
use crate::core::chart::{analytics_figure, render};
use crate::core::export::rows_to_csv;
use crate::core::normalize::{parse_metric, parse_report_date};
use crate::core::{Pipeline, RenderedChart, Storage, Table};
use crate::domain::model::{AnalyticsReport, AnalyticsRow, Metric};
use crate::utils::error::{DashError, Result};
use chrono::Duration;

const DATE_COLUMN: &str = "date";
const CSV_FILE: &str = "analytics.csv";

/// GA4 daily metrics → five stacked line charts.
pub struct AnalyticsPipeline<S: Storage> {
    storage: S,
    client: AnalyticsClient,
    settings: AnalyticsSettings,
    export_csv: bool,
}

impl<S: Storage> AnalyticsPipeline<S> {
    pub fn new(storage: S, client: AnalyticsClient, settings: AnalyticsSettings) -> Self {
        Self {
            storage,
            client,
            settings,
            export_csv: false,
        }
    }

    pub fn with_csv_export(mut self, enabled: bool) -> Self {
        self.export_csv = enabled;
        self
    }
}

fn required_column<'a>(table: &'a Table, name: &str) -> Result<Vec<&'a str>> {
    table
        .column(name)
        .ok_or_else(|| DashError::processing(format!("report has no '{}' column", name)))
}

/// Parses every row, keeps the `window_days` up to the latest date and sorts by date.
pub fn reshape_report(table: &Table, window_days: u32) -> Result<AnalyticsReport> {
    if table.is_empty() {
        return Err(DashError::processing(
            "the analytics report returned no rows",
        ));
    }

    let dates = required_column(table, DATE_COLUMN)?;
    let mut columns = Vec::with_capacity(Metric::ALL.len());
    for metric in Metric::ALL {
        columns.push(required_column(table, metric.api_name())?);
    }

    let mut rows = Vec::with_capacity(dates.len());
    for (i, date) in dates.iter().enumerate() {
        let value = |m: usize| parse_metric(columns[m][i]);
        rows.push(AnalyticsRow {
            date: parse_report_date(date)?,
            new_users: value(0)?,
            active_users: value(1)?,
            event_count: value(2)?,
            total_users: value(3)?,
            sessions: value(4)?,
        });
    }

    if let Some(end) = rows.iter().map(|r| r.date).max() {
        let start = end - Duration::days(i64::from(window_days));
        rows.retain(|r| r.date >= start && r.date <= end);
    }
    rows.sort_by_key(|r| r.date);

    Ok(AnalyticsReport { rows })
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for AnalyticsPipeline<S> {
    type Raw = Table;
    type Report = AnalyticsReport;

    async fn extract(&self) -> Result<Table> {
        tracing::info!(
            "📡 Requesting {} days of GA4 data for property {}",
            self.settings.window_days,
            self.settings.property_id
        );

        let table = self
            .client
            .run_report(&self.settings.property_id, self.settings.window_days)
            .await?;

        tracing::info!("📊 Fetched {} report rows", table.rows.len());
        Ok(table)
    }

    async fn transform(&self, raw: Table) -> Result<AnalyticsReport> {
        let report = reshape_report(&raw, self.settings.window_days)?;

        if let (Some(first), Some(last)) = (report.rows.first(), report.rows.last()) {
            tracing::debug!(
                "Reshaped {} rows from {} to {}",
                report.rows.len(),
                first.date,
                last.date
            );
        }
        for metric in Metric::ALL {
            tracing::debug!("{} max: {}", metric.label(), report.max(metric));
        }

        Ok(report)
    }

    async fn load(&self, report: AnalyticsReport) -> Result<RenderedChart> {
        let (page, inline_html) = render(&analytics_figure(&report));

        self.storage
            .write_file(&self.settings.output_file, page.as_bytes())
            .await?;

        if self.export_csv {
            let csv = rows_to_csv(&report.rows)?;
            self.storage.write_file(CSV_FILE, &csv).await?;
            tracing::debug!("Wrote {} bytes of CSV to {}", csv.len(), CSV_FILE);
        }

        Ok(RenderedChart {
            output_path: self.storage.location(&self.settings.output_file),
            inline_html,
        })
    }
}
