use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Text cells under named columns, as read off a report page or API response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() || self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.headers.iter().position(|h| h == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(index).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    NewUsers,
    ActiveUsers,
    EventCount,
    TotalUsers,
    Sessions,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::NewUsers,
        Metric::ActiveUsers,
        Metric::EventCount,
        Metric::TotalUsers,
        Metric::Sessions,
    ];

    pub fn api_name(self) -> &'static str {
        match self {
            Metric::NewUsers => "newUsers",
            Metric::ActiveUsers => "activeUsers",
            Metric::EventCount => "eventCount",
            Metric::TotalUsers => "totalUsers",
            Metric::Sessions => "sessions",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::NewUsers => "New Users",
            Metric::ActiveUsers => "Returning Users",
            Metric::EventCount => "Key Events",
            Metric::TotalUsers => "Users",
            Metric::Sessions => "Sessions",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsRow {
    pub date: NaiveDate,
    pub new_users: i64,
    pub active_users: i64,
    pub event_count: i64,
    pub total_users: i64,
    pub sessions: i64,
}

impl AnalyticsRow {
    pub fn metric(&self, metric: Metric) -> i64 {
        match metric {
            Metric::NewUsers => self.new_users,
            Metric::ActiveUsers => self.active_users,
            Metric::EventCount => self.event_count,
            Metric::TotalUsers => self.total_users,
            Metric::Sessions => self.sessions,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsReport {
    pub rows: Vec<AnalyticsRow>,
}

impl AnalyticsReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn max(&self, metric: Metric) -> i64 {
        self.rows
            .iter()
            .map(|row| row.metric(metric))
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyImpressions {
    pub start_date: NaiveDate,
    pub impressions: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryImpressions {
    pub label: String,
    pub impressions: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignReport {
    pub impressions_over_time: Vec<DailyImpressions>,
    pub audiences: Vec<CategoryImpressions>,
    pub platforms: Vec<CategoryImpressions>,
    pub content_genres: Vec<CategoryImpressions>,
}

impl CampaignReport {
    pub fn is_empty(&self) -> bool {
        self.impressions_over_time.is_empty()
            && self.audiences.is_empty()
            && self.platforms.is_empty()
            && self.content_genres.is_empty()
    }

    pub fn categories(&self, panel: CampaignPanel) -> &[CategoryImpressions] {
        match panel {
            CampaignPanel::TotalImpressions => &[],
            CampaignPanel::Audiences => &self.audiences,
            CampaignPanel::Platforms => &self.platforms,
            CampaignPanel::ContentGenres => &self.content_genres,
        }
    }
}

/// One quadrant of the campaign chart and the report table feeding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignPanel {
    TotalImpressions,
    Audiences,
    Platforms,
    ContentGenres,
}

impl CampaignPanel {
    pub const ALL: [CampaignPanel; 4] = [
        CampaignPanel::TotalImpressions,
        CampaignPanel::Audiences,
        CampaignPanel::Platforms,
        CampaignPanel::ContentGenres,
    ];

    pub fn title(self) -> &'static str {
        match self {
            CampaignPanel::TotalImpressions => "Total Impressions Over Time",
            CampaignPanel::Audiences => "Impressions by Audiences",
            CampaignPanel::Platforms => "Impressions by Platforms",
            CampaignPanel::ContentGenres => "Impressions by Content Genres",
        }
    }

    /// Column holding the labels; the time series keys on `Days` instead.
    pub fn category_column(self) -> &'static str {
        match self {
            CampaignPanel::TotalImpressions => "Days",
            CampaignPanel::Audiences => "Audiences",
            CampaignPanel::Platforms => "Platforms",
            CampaignPanel::ContentGenres => "Content Genres",
        }
    }

    pub fn impressions_column(self) -> &'static str {
        match self {
            CampaignPanel::TotalImpressions => "Total Impressions",
            _ => "Impressions",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            CampaignPanel::TotalImpressions => "total_impressions",
            CampaignPanel::Audiences => "audiences",
            CampaignPanel::Platforms => "platforms",
            CampaignPanel::ContentGenres => "content_genres",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChart {
    pub output_path: String,
    pub inline_html: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Name(String),
    Tag(String),
}

impl Locator {
    pub fn name(value: &str) -> Self {
        Locator::Name(value.to_string())
    }

    pub fn tag(value: &str) -> Self {
        Locator::Tag(value.to_string())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Name(name) => write!(f, "element name={}", name),
            Locator::Tag(tag) => write!(f, "<{}> elements", tag),
        }
    }
}
