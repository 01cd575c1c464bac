use crate::utils::error::{DashError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub analytics: AnalyticsSettings,
    pub campaign: CampaignSettings,
    pub output: OutputSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    pub property_id: String,
    pub key_file: String,
    /// Skips the service-account exchange when set.
    pub access_token: Option<String>,
    pub api_base_url: String,
    pub window_days: u32,
    pub request_timeout_seconds: u64,
    pub output_file: String,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            property_id: "401993563".to_string(),
            key_file: "client_secret.json".to_string(),
            access_token: None,
            api_base_url: "https://analyticsdata.googleapis.com".to_string(),
            window_days: 30,
            request_timeout_seconds: 30,
            output_file: "analytics.html".to_string(),
        }
    }
}

impl AnalyticsSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignSettings {
    pub login_url: String,
    pub webdriver_url: String,
    pub headless: bool,
    pub login_wait_seconds: u64,
    pub settle_seconds: u64,
    pub table_wait_seconds: u64,
    pub output_file: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub tables: TableIndices,
}

impl Default for CampaignSettings {
    fn default() -> Self {
        Self {
            login_url: "https://admanager.hulu.com/login".to_string(),
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
            login_wait_seconds: 10,
            settle_seconds: 5,
            table_wait_seconds: 10,
            output_file: "output.html".to_string(),
            email: None,
            password: None,
            tables: TableIndices::default(),
        }
    }
}

impl CampaignSettings {
    pub fn login_wait(&self) -> Duration {
        Duration::from_secs(self.login_wait_seconds)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_seconds)
    }

    pub fn table_wait(&self) -> Duration {
        Duration::from_secs(self.table_wait_seconds)
    }
}

/// Position of each report table on the campaign page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableIndices {
    pub total_impressions: usize,
    pub audiences: usize,
    pub platforms: usize,
    pub content_genres: usize,
}

impl Default for TableIndices {
    fn default() -> Self {
        Self {
            total_impressions: 0,
            audiences: 3,
            platforms: 4,
            content_genres: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub directory: String,
    pub export_csv: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            export_csv: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
        }
    }
}

impl DashboardConfig {
    /// Reads and parses a TOML settings file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when it exists, defaults otherwise.
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "No config file at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown names are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn output_dir(&self) -> &str {
        &self.output.directory
    }
}

impl Validate for AnalyticsSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("analytics.property_id", &self.property_id)?;
        validate_url("analytics.api_base_url", &self.api_base_url)?;
        validate_range("analytics.window_days", self.window_days, 1, 365)?;
        validate_positive_number(
            "analytics.request_timeout_seconds",
            self.request_timeout_seconds,
            1,
        )?;
        validate_path("analytics.output_file", &self.output_file)?;
        if self.access_token.is_none() {
            validate_path("analytics.key_file", &self.key_file)?;
        }
        Ok(())
    }
}

impl Validate for CampaignSettings {
    fn validate(&self) -> Result<()> {
        validate_url("campaign.login_url", &self.login_url)?;
        validate_url("campaign.webdriver_url", &self.webdriver_url)?;
        validate_positive_number("campaign.login_wait_seconds", self.login_wait_seconds, 1)?;
        validate_positive_number("campaign.table_wait_seconds", self.table_wait_seconds, 1)?;
        validate_path("campaign.output_file", &self.output_file)?;
        Ok(())
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        self.analytics.validate()?;
        self.campaign.validate()?;
        validate_path("output.directory", &self.output.directory)?;
        validate_non_empty_string("server.host", &self.server.host)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();

        assert_eq!(config.analytics.window_days, 30);
        assert_eq!(config.campaign.output_file, "output.html");
        assert_eq!(config.campaign.tables.audiences, 3);
        assert_eq!(config.campaign.login_wait(), Duration::from_secs(10));
        assert_eq!(config.server.port, 8050);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_config() {
        let toml_content = r#"
[analytics]
property_id = "123456"
window_days = 7

[campaign]
settle_seconds = 1

[campaign.tables]
content_genres = 6

[output]
directory = "./charts"
export_csv = true
"#;

        let config = DashboardConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.analytics.property_id, "123456");
        assert_eq!(config.analytics.window_days, 7);
        assert_eq!(config.campaign.settle(), Duration::from_secs(1));
        assert_eq!(config.campaign.tables.content_genres, 6);
        assert_eq!(config.campaign.tables.platforms, 4);
        assert_eq!(config.output_dir(), "./charts");
        assert!(config.output.export_csv);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CAMPAIGN_DASH_TEST_EMAIL", "ops@example.com");

        let toml_content = r#"
[campaign]
email = "${CAMPAIGN_DASH_TEST_EMAIL}"
password = "${CAMPAIGN_DASH_TEST_UNSET_PASSWORD}"
"#;

        let config = DashboardConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.campaign.email.as_deref(), Some("ops@example.com"));
        assert_eq!(
            config.campaign.password.as_deref(),
            Some("${CAMPAIGN_DASH_TEST_UNSET_PASSWORD}")
        );

        std::env::remove_var("CAMPAIGN_DASH_TEST_EMAIL");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[campaign]
login_url = "invalid-url"
"#;

        let config = DashboardConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let config = DashboardConfig::from_toml_str("[analytics]\nwindow_days = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let err = DashboardConfig::from_toml_str("[analytics\nproperty_id = 1").unwrap_err();
        assert!(matches!(err, DashError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nhost = \"0.0.0.0\"\nport = 9000\n")
            .unwrap();

        let config = DashboardConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::from_file_or_default(dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.analytics.property_id, "401993563");
    }
}
