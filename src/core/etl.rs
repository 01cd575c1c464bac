use crate::core::{Pipeline, RenderedChart};
use crate::utils::error::Result;
use crate::utils::monitor::ResourceMonitor;

pub struct DashboardEngine<P: Pipeline> {
    pipeline: P,
    monitor: ResourceMonitor,
}

impl<P: Pipeline> DashboardEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: ResourceMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<RenderedChart> {
        tracing::info!("Fetching data...");
        let raw = self.pipeline.extract().await?;
        self.monitor.log_phase("Fetch");

        tracing::info!("Reshaping data...");
        let report = self.pipeline.transform(raw).await?;
        self.monitor.log_phase("Reshape");

        tracing::info!("Rendering chart...");
        let chart = self.pipeline.load(report).await?;
        self.monitor.log_phase("Render");

        tracing::info!("Chart saved to: {}", chart.output_path);
        Ok(chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::DashError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingPipeline {
        fail_transform: bool,
        loads: AtomicUsize,
    }

    #[async_trait]
    impl Pipeline for CountingPipeline {
        type Raw = Vec<i64>;
        type Report = i64;

        async fn extract(&self) -> Result<Vec<i64>> {
            Ok(vec![1, 2, 3])
        }

        async fn transform(&self, raw: Vec<i64>) -> Result<i64> {
            if self.fail_transform {
                return Err(DashError::processing("bad rows"));
            }
            Ok(raw.iter().sum())
        }

        async fn load(&self, report: i64) -> Result<RenderedChart> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(RenderedChart {
                output_path: format!("out/{}.html", report),
                inline_html: String::new(),
            })
        }
    }

    #[tokio::test]
    async fn test_run_passes_each_phase_output_on() {
        let engine = DashboardEngine::new(CountingPipeline {
            fail_transform: false,
            loads: AtomicUsize::new(0),
        });

        let chart = engine.run().await.unwrap();

        assert_eq!(chart.output_path, "out/6.html");
        assert_eq!(engine.pipeline().loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_stops_at_first_failure() {
        let engine = DashboardEngine::new(CountingPipeline {
            fail_transform: true,
            loads: AtomicUsize::new(0),
        });

        let err = engine.run().await.unwrap_err();

        assert!(matches!(err, DashError::ProcessingError { .. }));
        assert_eq!(engine.pipeline().loads.load(Ordering::SeqCst), 0);
    }
}
