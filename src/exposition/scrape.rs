use crate::collectors::Collector;
use crate::metrics::*;

use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use std::sync::Arc;
use std::time::{Duration, Instant};

/// Runs every collector for one scrape and gathers what they emit.
pub struct Scraper {
    collectors: Vec<Box<dyn Collector>>,
    timeout: Duration,
    channel_capacity: usize,
    duration: Arc<Descriptor>,
    success: Arc<Descriptor>,
}

impl Scraper {
    pub fn new(
        collectors: Vec<Box<dyn Collector>>,
        namespace: &str,
        timeout: Duration,
        channel_capacity: usize,
    ) -> Self {
        let duration = Descriptor::new(
            fq_name(namespace, "scrape", "collector_duration_seconds"),
            "Duration of a collector scrape.",
            &["collector"],
            MetricKind::Gauge,
        );

        let success = Descriptor::new(
            fq_name(namespace, "scrape", "collector_success"),
            "Whether a collector succeeded.",
            &["collector"],
            MetricKind::Gauge,
        );

        Self {
            collectors,
            timeout,
            channel_capacity,
            duration: duration.into(),
            success: success.into(),
        }
    }

    /// Updates all collectors concurrently. Samples flow through one bounded
    /// channel that is drained while the collectors run. Each collector is
    /// followed by a duration and a success sample describing its update.
    pub async fn scrape(&self) -> Vec<Sample> {
        let (tx, mut rx) = mpsc::channel(self.channel_capacity);

        let updates: Vec<_> = self
            .collectors
            .iter()
            .map(|collector| self.update(collector.as_ref(), tx.clone()))
            .collect();

        drop(tx);

        let drain = async {
            let mut samples = Vec::new();
            while let Some(sample) = rx.recv().await {
                samples.push(sample);
            }
            samples
        };

        let start = Instant::now();
        let (outcomes, mut samples) = tokio::join!(futures::future::join_all(updates), drain);
        debug!("scrape latency: {} us", start.elapsed().as_micros());

        for (name, elapsed, ok) in outcomes {
            let label = vec![name.to_string()];
            samples.push(Sample::new(
                self.duration.clone(),
                elapsed.as_secs_f64(),
                label.clone(),
            ));
            samples.push(Sample::new(
                self.success.clone(),
                if ok { 1.0 } else { 0.0 },
                label,
            ));
        }

        samples
    }

    async fn update(
        &self,
        collector: &dyn Collector,
        sink: SampleSender,
    ) -> (&'static str, Duration, bool) {
        let name = collector.name();
        let start = Instant::now();

        let ok = match tokio::time::timeout(self.timeout, collector.update(&sink)).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                error!("{e}");
                false
            }
            Err(_) => {
                warn!(
                    "{name} collector timed out after {}",
                    humantime::format_duration(self.timeout)
                );
                false
            }
        };

        (name, start.elapsed(), ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::CollectorError;

    use async_trait::async_trait;

    struct Constant {
        name: &'static str,
        descriptor: Arc<Descriptor>,
        count: usize,
    }

    impl Constant {
        fn new(name: &'static str, count: usize) -> Box<dyn Collector> {
            let descriptor = Descriptor::new(
                format!("test_{name}"),
                "A constant.",
                &["index"],
                MetricKind::Gauge,
            );

            Box::new(Self {
                name,
                descriptor: descriptor.into(),
                count,
            })
        }
    }

    #[async_trait]
    impl Collector for Constant {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn update(&self, sink: &SampleSender) -> Result<(), CollectorError> {
            for i in 0..self.count {
                let sample = Sample::new(self.descriptor.clone(), i as f64, vec![i.to_string()]);
                if sink.send(sample).await.is_err() {
                    break;
                }
            }
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl Collector for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn update(&self, _sink: &SampleSender) -> Result<(), CollectorError> {
            Err(CollectorError::Read {
                collector: "failing",
                source: std::io::Error::other("boom"),
            })
        }
    }

    struct Stuck;

    #[async_trait]
    impl Collector for Stuck {
        fn name(&self) -> &'static str {
            "stuck"
        }

        async fn update(&self, _sink: &SampleSender) -> Result<(), CollectorError> {
            std::future::pending().await
        }
    }

    fn meta(samples: &[Sample], metric: &str, collector: &str) -> f64 {
        samples
            .iter()
            .find(|s| s.descriptor.name() == metric && s.label_values[0] == collector)
            .map(|s| s.value)
            .unwrap()
    }

    #[tokio::test]
    async fn test_scrape_gathers_all_collectors() {
        let scraper = Scraper::new(
            vec![Constant::new("a", 100), Constant::new("b", 3)],
            "node",
            Duration::from_secs(5),
            4,
        );

        let samples = scraper.scrape().await;

        let count = |name: &str| {
            samples
                .iter()
                .filter(|s| s.descriptor.name() == name)
                .count()
        };

        assert_eq!(count("test_a"), 100);
        assert_eq!(count("test_b"), 3);
        assert_eq!(count("node_scrape_collector_success"), 2);
        assert_eq!(count("node_scrape_collector_duration_seconds"), 2);
        assert_eq!(meta(&samples, "node_scrape_collector_success", "a"), 1.0);
        assert_eq!(meta(&samples, "node_scrape_collector_success", "b"), 1.0);
    }

    #[tokio::test]
    async fn test_failure_is_reported() {
        let scraper = Scraper::new(
            vec![Box::new(Failing) as Box<dyn Collector>, Constant::new("ok", 1)],
            "node",
            Duration::from_secs(5),
            16,
        );

        let samples = scraper.scrape().await;

        assert_eq!(meta(&samples, "node_scrape_collector_success", "failing"), 0.0);
        assert_eq!(meta(&samples, "node_scrape_collector_success", "ok"), 1.0);
        assert_eq!(samples.len(), 1 + 2 * 2);
    }

    #[tokio::test]
    async fn test_timeout() {
        let scraper = Scraper::new(
            vec![Box::new(Stuck) as Box<dyn Collector>],
            "node",
            Duration::from_millis(20),
            16,
        );

        let samples = scraper.scrape().await;

        assert_eq!(meta(&samples, "node_scrape_collector_success", "stuck"), 0.0);
        assert!(meta(&samples, "node_scrape_collector_duration_seconds", "stuck") >= 0.02);
    }

    #[tokio::test]
    async fn test_no_collectors() {
        let scraper = Scraper::new(Vec::new(), "node", Duration::from_secs(1), 1);
        assert!(scraper.scrape().await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_overlapping_scrapes() {
        let scraper = Arc::new(Scraper::new(
            vec![Constant::new("a", 50)],
            "node",
            Duration::from_secs(5),
            2,
        ));

        let scrapes: Vec<_> = (0..4)
            .map(|_| {
                let scraper = scraper.clone();
                tokio::spawn(async move { scraper.scrape().await })
            })
            .collect();

        for scrape in scrapes {
            assert_eq!(scrape.await.unwrap().len(), 50 + 2);
        }
    }
}
