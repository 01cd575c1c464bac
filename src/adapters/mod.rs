// Concrete implementations for the outside world: the GA4 REST API and WebDriver.

pub mod analytics_client;
pub mod webdriver;

pub use analytics_client::{AnalyticsAuth, AnalyticsClient, ServiceAccountKey};
pub use webdriver::{WebDriverConnector, WebDriverSession};
