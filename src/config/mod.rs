pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use toml_config::{DashboardConfig, DEFAULT_CONFIG_FILE};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "campaign-dash")]
#[command(about = "Charts GA4 traffic and scraped ad-campaign impressions")]
pub struct CliConfig {
    /// TOML settings file (defaults apply when it does not exist)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Directory the chart is written into
    #[arg(long, global = true)]
    pub output_dir: Option<String>,

    /// Also write the reshaped rows as CSV next to the chart
    #[arg(long, global = true)]
    pub export_csv: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log as JSON lines")]
    pub log_json: bool,

    #[arg(long, global = true, help = "Log CPU and memory after each phase")]
    pub monitor: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fetch the last N days from GA4 and chart them
    Analytics {
        #[arg(long)]
        property_id: Option<String>,

        /// Service-account key file
        #[arg(long)]
        key_file: Option<String>,

        /// Pre-issued OAuth access token, used instead of the key file
        #[arg(long, env = "GA_ACCESS_TOKEN", hide_env_values = true)]
        access_token: Option<String>,

        #[arg(long)]
        window_days: Option<u32>,

        #[arg(long)]
        output_file: Option<String>,
    },

    /// Log in to the ad manager, scrape a campaign report and chart it
    Campaign {
        /// Campaign report URL
        #[arg(long)]
        url: String,

        #[arg(long, env = "USERNAME")]
        email: Option<String>,

        #[arg(long, env = "PASSWORD", hide_env_values = true)]
        password: Option<String>,

        #[arg(long)]
        webdriver_url: Option<String>,

        /// Show the browser window
        #[arg(long)]
        no_headless: bool,

        #[arg(long)]
        output_file: Option<String>,
    },

    /// Serve the form pages
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Settings file values with command-line overrides applied.
    pub fn resolve(&self) -> Result<DashboardConfig> {
        let mut config = DashboardConfig::from_file_or_default(&self.config)?;

        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if self.export_csv {
            config.output.export_csv = true;
        }

        match &self.command {
            Command::Analytics {
                property_id,
                key_file,
                access_token,
                window_days,
                output_file,
            } => {
                let analytics = &mut config.analytics;
                override_with(&mut analytics.property_id, property_id);
                override_with(&mut analytics.key_file, key_file);
                override_with(&mut analytics.output_file, output_file);
                if access_token.is_some() {
                    analytics.access_token = access_token.clone();
                }
                if let Some(days) = window_days {
                    analytics.window_days = *days;
                }
            }
            Command::Campaign {
                email,
                password,
                webdriver_url,
                no_headless,
                output_file,
                ..
            } => {
                let campaign = &mut config.campaign;
                override_with(&mut campaign.webdriver_url, webdriver_url);
                override_with(&mut campaign.output_file, output_file);
                if email.is_some() {
                    campaign.email = email.clone();
                }
                if password.is_some() {
                    campaign.password = password.clone();
                }
                if *no_headless {
                    campaign.headless = false;
                }
            }
            Command::Serve { host, port } => {
                override_with(&mut config.server.host, host);
                if let Some(port) = port {
                    config.server.port = *port;
                }
            }
        }

        Ok(config)
    }
}

#[cfg(feature = "cli")]
fn override_with(target: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}
