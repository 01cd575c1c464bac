use crate::domain::model::{Locator, RenderedChart};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Where `path` ends up, for reporting back to the user.
    fn location(&self, path: &str) -> String;
}

/// Fetch, reshape, chart.
#[async_trait]
pub trait Pipeline: Send + Sync {
    type Raw: Send;
    type Report: Send;

    async fn extract(&self) -> Result<Self::Raw>;
    async fn transform(&self, raw: Self::Raw) -> Result<Self::Report>;
    async fn load(&self, report: Self::Report) -> Result<RenderedChart>;
}

/// A live browser the campaign walk can drive.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn goto(&self, url: &str) -> Result<()>;

    /// Blocks until at least one element matches, returning how many did.
    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<usize>;

    async fn type_into(&self, locator: &Locator, text: &str) -> Result<()>;
    async fn press_enter(&self, locator: &Locator) -> Result<()>;

    /// Outer HTML of every `<table>` on the current page, in page order.
    async fn tables_html(&self) -> Result<Vec<String>>;

    async fn quit(&mut self) -> Result<()>;
}

#[async_trait]
pub trait BrowserConnector: Send + Sync {
    type Session: BrowserSession;

    async fn connect(&self) -> Result<Self::Session>;
}
