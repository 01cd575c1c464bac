use crate::config::toml_config::{CampaignSettings, TableIndices};
use crate::core::chart::{campaign_figure, render};
use crate::core::export::rows_to_csv;
use crate::core::normalize::{extract_category_names, impressions_or_zero, start_date};
use crate::core::table::extract_table_data;
use crate::core::{BrowserConnector, BrowserSession, Pipeline, RenderedChart, Storage, Table};
use crate::domain::model::{
    CampaignPanel, CampaignReport, CategoryImpressions, DailyImpressions, Locator,
};
use crate::utils::error::{DashError, Result};
use crate::utils::validation::{validate_url, Validate};

const EMAIL_FIELD: &str = "email";
const PASSWORD_FIELD: &str = "password";
const TABLE_TAG: &str = "table";

/// What the user submits: ad-manager credentials and the report to scrape.
#[derive(Clone)]
pub struct CampaignRequest {
    pub email: String,
    pub password: String,
    pub campaign_url: String,
}

impl std::fmt::Debug for CampaignRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampaignRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("campaign_url", &self.campaign_url)
            .finish()
    }
}

impl Validate for CampaignRequest {
    fn validate(&self) -> Result<()> {
        let fields = [
            ("Email", &self.email),
            ("Password", &self.password),
            ("Campaign URL", &self.campaign_url),
        ];
        for (label, value) in fields {
            if value.trim().is_empty() {
                return Err(DashError::ValidationError {
                    message: format!("{} is required.", label),
                });
            }
        }

        validate_url("campaign_url", &self.campaign_url).map_err(|_| DashError::ValidationError {
            message: "Campaign URL must be an http:// or https:// address.".to_string(),
        })
    }
}

fn table_index(indices: &TableIndices, panel: CampaignPanel) -> usize {
    match panel {
        CampaignPanel::TotalImpressions => indices.total_impressions,
        CampaignPanel::Audiences => indices.audiences,
        CampaignPanel::Platforms => indices.platforms,
        CampaignPanel::ContentGenres => indices.content_genres,
    }
}

/// Logs in, opens the campaign report and charts its impression tables.
pub struct CampaignPipeline<S: Storage, B: BrowserConnector> {
    storage: S,
    connector: B,
    settings: CampaignSettings,
    request: CampaignRequest,
    export_csv: bool,
}

impl<S: Storage, B: BrowserConnector> CampaignPipeline<S, B> {
    pub fn new(
        storage: S,
        connector: B,
        settings: CampaignSettings,
        request: CampaignRequest,
    ) -> Self {
        Self {
            storage,
            connector,
            settings,
            request,
            export_csv: false,
        }
    }

    pub fn with_csv_export(mut self, enabled: bool) -> Self {
        self.export_csv = enabled;
        self
    }

    /// Login, settle, open the report, settle, wait for tables. No retries.
    async fn walk(&self, session: &B::Session) -> Result<Vec<String>> {
        let email = Locator::name(EMAIL_FIELD);
        let password = Locator::name(PASSWORD_FIELD);

        tracing::info!("🔐 Opening login page {}", self.settings.login_url);
        session.goto(&self.settings.login_url).await?;
        session.wait_for(&email, self.settings.login_wait()).await?;

        session.type_into(&email, &self.request.email).await?;
        session.type_into(&password, &self.request.password).await?;
        session.press_enter(&password).await?;

        tokio::time::sleep(self.settings.settle()).await;

        tracing::info!("📄 Opening campaign report {}", self.request.campaign_url);
        session.goto(&self.request.campaign_url).await?;

        tokio::time::sleep(self.settings.settle()).await;

        let found = session
            .wait_for(&Locator::tag(TABLE_TAG), self.settings.table_wait())
            .await?;
        tracing::debug!("{} tables present on the report page", found);

        session.tables_html().await
    }

    async fn write_csv(&self, report: &CampaignReport) -> Result<()> {
        for panel in CampaignPanel::ALL {
            let csv = match panel {
                CampaignPanel::TotalImpressions if !report.impressions_over_time.is_empty() => {
                    rows_to_csv(&report.impressions_over_time)?
                }
                CampaignPanel::TotalImpressions => continue,
                _ if report.categories(panel).is_empty() => continue,
                _ => rows_to_csv(report.categories(panel))?,
            };
            let file = format!("campaign_{}.csv", panel.slug());
            self.storage.write_file(&file, &csv).await?;
        }
        Ok(())
    }
}

fn daily_impressions(table: &Table) -> Result<Option<Vec<DailyImpressions>>> {
    let panel = CampaignPanel::TotalImpressions;
    let (Some(counts), Some(days)) = (
        table.column(panel.impressions_column()),
        table.column(panel.category_column()),
    ) else {
        return Ok(None);
    };

    counts
        .iter()
        .zip(days.iter())
        .map(|(count, days)| {
            Ok(DailyImpressions {
                start_date: start_date(days)?,
                impressions: impressions_or_zero(count),
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn category_impressions(table: &Table, panel: CampaignPanel) -> Option<Vec<CategoryImpressions>> {
    let cells = table.column(panel.category_column())?;
    let counts = table.column(panel.impressions_column())?;

    let labels = match panel {
        CampaignPanel::Audiences => extract_category_names(&cells),
        _ => cells.iter().map(|label| label.trim().to_string()).collect(),
    };

    Some(
        labels
            .into_iter()
            .zip(counts.iter())
            .map(|(label, count)| CategoryImpressions {
                label,
                impressions: impressions_or_zero(count),
            })
            .collect(),
    )
}

/// Maps the page's tables onto the four chart panels.
///
/// Only the tables at the panel indices are parsed; the rest of the page is ignored.
pub fn build_report(tables_html: &[String], indices: &TableIndices) -> Result<CampaignReport> {
    let mut report = CampaignReport::default();

    for panel in CampaignPanel::ALL {
        let index = table_index(indices, panel);
        let Some(html) = tables_html.get(index) else {
            tracing::debug!("No table {} on the page for '{}'", index, panel.title());
            continue;
        };

        let table = extract_table_data(html)?;
        if table.is_empty() {
            tracing::debug!("Table {} for '{}' is empty", index, panel.title());
            continue;
        }

        let filled = match panel {
            CampaignPanel::TotalImpressions => daily_impressions(&table)?
                .map(|rows| report.impressions_over_time = rows)
                .is_some(),
            CampaignPanel::Audiences => category_impressions(&table, panel)
                .map(|rows| report.audiences = rows)
                .is_some(),
            CampaignPanel::Platforms => category_impressions(&table, panel)
                .map(|rows| report.platforms = rows)
                .is_some(),
            CampaignPanel::ContentGenres => category_impressions(&table, panel)
                .map(|rows| report.content_genres = rows)
                .is_some(),
        };

        if !filled {
            tracing::warn!(
                "⚠️ Table {} lacks the '{}'/'{}' columns, skipping '{}'",
                index,
                panel.category_column(),
                panel.impressions_column(),
                panel.title()
            );
        }
    }

    Ok(report)
}

#[async_trait::async_trait]
impl<S: Storage, B: BrowserConnector> Pipeline for CampaignPipeline<S, B> {
    type Raw = Vec<String>;
    type Report = CampaignReport;

    async fn extract(&self) -> Result<Vec<String>> {
        let mut session = self.connector.connect().await?;
        let outcome = self.walk(&session).await;

        if let Err(e) = session.quit().await {
            tracing::warn!("Failed to close the browser session: {}", e);
        }

        let tables = outcome?;
        tracing::info!("📊 Scraped {} tables", tables.len());
        Ok(tables)
    }

    async fn transform(&self, raw: Vec<String>) -> Result<CampaignReport> {
        let report = build_report(&raw, &self.settings.tables)?;

        if report.is_empty() {
            tracing::warn!("⚠️ No chartable impressions found on the report page");
        }
        Ok(report)
    }

    async fn load(&self, report: CampaignReport) -> Result<RenderedChart> {
        let (page, inline_html) = render(&campaign_figure(&report));

        self.storage
            .write_file(&self.settings.output_file, page.as_bytes())
            .await?;

        if self.export_csv {
            self.write_csv(&report).await?;
        }

        Ok(RenderedChart {
            output_path: self.storage.location(&self.settings.output_file),
            inline_html,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn table(headers: &[&str], rows: &[&[&str]]) -> String {
        let head: String = headers.iter().map(|h| format!("<th>{}</th>", h)).collect();
        let body: String = rows
            .iter()
            .map(|row| {
                let cells: String = row.iter().map(|c| format!("<td>{}</td>", c)).collect();
                format!("<tr>{}</tr>", cells)
            })
            .collect();
        format!("<table><tr>{}</tr>{}</table>", head, body)
    }

    fn page_tables() -> Vec<String> {
        vec![
            table(
                &["Days", "Total Impressions"],
                &[
                    &["Mon, 01/02/23 - Sun, 01/08/23", "1,234 impressions"],
                    &["Mon, 01/09/23 - Sun, 01/15/23", "2,000 impressions"],
                ],
            ),
            table(&["Summary"], &[]),
            "<table><tr><td>no header</td></tr></table>".to_string(),
            table(
                &["Audiences", "Impressions"],
                &[&["Demo | 18-24", "500 impressions"]],
            ),
            table(
                &["Platforms", "Impressions"],
                &[&["Living Room", "900 impressions"], &["Mobile", "n/a"]],
            ),
            table(
                &["Content Genres", "Impressions"],
                &[&["Drama", "-"], &["Comedy", "1,001 impressions"]],
            ),
        ]
    }

    #[test]
    fn test_build_report_fills_every_panel() {
        let report = build_report(&page_tables(), &TableIndices::default()).unwrap();

        assert_eq!(report.impressions_over_time.len(), 2);
        assert_eq!(
            report.impressions_over_time[0].start_date,
            NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
        );
        assert_eq!(report.impressions_over_time[0].impressions, 1234);

        assert_eq!(report.audiences[0].label, "18-24");
        assert_eq!(report.audiences[0].impressions, 500);

        assert_eq!(report.platforms[1].label, "Mobile");
        assert_eq!(report.platforms[1].impressions, 0);

        assert_eq!(report.content_genres[0].impressions, 0);
        assert_eq!(report.content_genres[1].impressions, 1001);
    }

    #[test]
    fn test_build_report_ignores_malformed_uncharted_tables() {
        let mut tables = page_tables();
        tables[1] = "<table><tr><th>Metric</th><th>Value</th></tr>\
                     <tr><th>Reach</th><td>10</td></tr></table>"
            .to_string();

        let report = build_report(&tables, &TableIndices::default()).unwrap();

        assert_eq!(report.impressions_over_time.len(), 2);
        assert_eq!(report.audiences.len(), 1);
        assert_eq!(report.platforms.len(), 2);
        assert_eq!(report.content_genres.len(), 2);
    }

    #[test]
    fn test_build_report_rejects_malformed_charted_table() {
        let mut tables = page_tables();
        tables[4] = "<table><tr><th>Platforms</th><th>Impressions</th></tr>\
                     <tr><td>Mobile</td></tr></table>"
            .to_string();

        let err = build_report(&tables, &TableIndices::default()).unwrap_err();
        assert!(matches!(err, DashError::ProcessingError { .. }));
    }

    #[test]
    fn test_build_report_skips_missing_tables() {
        let tables = page_tables().into_iter().take(4).collect::<Vec<_>>();

        let report = build_report(&tables, &TableIndices::default()).unwrap();

        assert_eq!(report.audiences.len(), 1);
        assert!(report.platforms.is_empty());
        assert!(report.content_genres.is_empty());
    }

    #[test]
    fn test_build_report_skips_tables_without_expected_columns() {
        let tables = vec![table(&["Week", "Reach"], &[&["1", "2"]])];

        let report = build_report(&tables, &TableIndices::default()).unwrap();

        assert!(report.is_empty());
    }

    #[test]
    fn test_build_report_fails_on_unreadable_day_range() {
        let tables = vec![table(
            &["Days", "Total Impressions"],
            &[&["sometime", "5 impressions"]],
        )];

        assert!(build_report(&tables, &TableIndices::default()).is_err());
    }

    #[test]
    fn test_request_validation() {
        let request = CampaignRequest {
            email: "ops@example.com".to_string(),
            password: "secret".to_string(),
            campaign_url: "https://ads.example.com/campaigns/7".to_string(),
        };
        assert!(request.validate().is_ok());

        let missing_password = CampaignRequest {
            password: " ".to_string(),
            ..request.clone()
        };
        let err = missing_password.validate().unwrap_err();
        assert!(matches!(err, DashError::ValidationError { .. }));
        assert_eq!(err.user_friendly_message(), "Password is required.");

        let bad_url = CampaignRequest {
            campaign_url: "campaigns/7".to_string(),
            ..request
        };
        assert!(bad_url.validate().is_err());
    }

    #[test]
    fn test_request_debug_hides_password() {
        let request = CampaignRequest {
            email: "ops@example.com".to_string(),
            password: "secret".to_string(),
            campaign_url: "https://ads.example.com/campaigns/7".to_string(),
        };
        assert!(!format!("{:?}", request).contains("secret"));
    }
}
