pub mod chart;
pub mod etl;
pub mod export;
pub mod normalize;
pub mod table;

pub use crate::domain::model::{RenderedChart, Table};
pub use crate::domain::ports::{BrowserConnector, BrowserSession, Pipeline, Storage};
pub use crate::utils::error::Result;
