use crate::config::toml_config::CampaignSettings;
use crate::domain::model::Locator;
use crate::domain::ports::{BrowserConnector, BrowserSession};
use crate::utils::error::{DashError, Result};
use async_trait::async_trait;
use std::time::Duration;
use thirtyfour::prelude::*;
use thirtyfour::{ChromiumLikeCapabilities, Key};

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const SUBMIT_KEY: Key = Key::Return;

fn to_by(locator: &Locator) -> By {
    match locator {
        Locator::Name(name) => By::Name(name.as_str()),
        Locator::Tag(tag) => By::Tag(tag.as_str()),
    }
}

/// Opens Chrome sessions through a running WebDriver server (chromedriver).
#[derive(Debug, Clone)]
pub struct WebDriverConnector {
    server_url: String,
    headless: bool,
}

impl WebDriverConnector {
    pub fn new(server_url: impl Into<String>, headless: bool) -> Self {
        Self {
            server_url: server_url.into(),
            headless,
        }
    }

    pub fn from_settings(settings: &CampaignSettings) -> Self {
        Self::new(settings.webdriver_url.clone(), settings.headless)
    }
}

#[async_trait]
impl BrowserConnector for WebDriverConnector {
    type Session = WebDriverSession;

    async fn connect(&self) -> Result<WebDriverSession> {
        let mut caps = DesiredCapabilities::chrome();
        if self.headless {
            caps.set_headless().map_err(DashError::browser)?;
        }

        tracing::debug!("Starting browser session via {}", self.server_url);
        let driver = WebDriver::new(self.server_url.as_str(), caps)
            .await
            .map_err(|e| {
                DashError::browser(format!(
                    "cannot start a session at {}: {}",
                    self.server_url, e
                ))
            })?;

        Ok(WebDriverSession {
            driver: Some(driver),
        })
    }
}

pub struct WebDriverSession {
    driver: Option<WebDriver>,
}

impl WebDriverSession {
    fn driver(&self) -> Result<&WebDriver> {
        self.driver
            .as_ref()
            .ok_or_else(|| DashError::browser("the browser session has already been closed"))
    }

    async fn find_one(&self, locator: &Locator) -> Result<WebElement> {
        let found = self
            .driver()?
            .find_all(to_by(locator))
            .await
            .map_err(DashError::browser)?;

        found
            .into_iter()
            .next()
            .ok_or_else(|| DashError::ElementNotFound {
                locator: locator.to_string(),
            })
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn goto(&self, url: &str) -> Result<()> {
        self.driver()?.goto(url).await.map_err(DashError::browser)
    }

    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<usize> {
        let driver = self.driver()?;

        let poll = async {
            loop {
                match driver.find_all(to_by(locator)).await {
                    Ok(found) if !found.is_empty() => return found.len(),
                    Ok(_) => {}
                    Err(e) => tracing::trace!("Lookup of {} failed: {}", locator, e),
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        };

        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| DashError::Timeout {
                what: locator.to_string(),
                seconds: timeout.as_secs(),
            })
    }

    async fn type_into(&self, locator: &Locator, text: &str) -> Result<()> {
        self.find_one(locator)
            .await?
            .send_keys(text)
            .await
            .map_err(DashError::browser)
    }

    async fn press_enter(&self, locator: &Locator) -> Result<()> {
        self.find_one(locator)
            .await?
            .send_keys(SUBMIT_KEY)
            .await
            .map_err(DashError::browser)
    }

    async fn tables_html(&self) -> Result<Vec<String>> {
        let tables = self
            .driver()?
            .find_all(By::Tag("table"))
            .await
            .map_err(DashError::browser)?;

        let mut html = Vec::with_capacity(tables.len());
        for table in tables {
            html.push(table.outer_html().await.map_err(DashError::browser)?);
        }
        Ok(html)
    }

    async fn quit(&mut self) -> Result<()> {
        match self.driver.take() {
            Some(driver) => driver.quit().await.map_err(DashError::browser),
            None => Ok(()),
        }
    }
}
