//! Exposes every field of a flat record type as its own gauge family.
//!
//! A [`RecordCollector`] reads a per-node [`Snapshot`] of records and emits
//! one sample per node and field, labeled with the node id. Metric names are
//! derived from the record's field identifiers the first time the collector
//! runs and the resulting descriptors are cached for its whole lifetime.

use super::{Collector, CollectorError};
use crate::metrics::*;

use async_trait::async_trait;
use tracing::{debug, Instrument, Span};

use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

/// Source of per-node record snapshots.
#[async_trait]
pub trait StatsReader<R: Record>: Send + Sync {
    async fn read(&self) -> Result<Snapshot<R>, std::io::Error>;
}

pub struct RecordCollector<R, S> {
    name: &'static str,
    namespace: String,
    subsystem: &'static str,
    help: &'static str,
    names: OnceLock<Vec<String>>,
    descriptors: DescriptorCache,
    reader: S,
    logger: Span,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record, S: StatsReader<R>> RecordCollector<R, S> {
    /// Creates a collector whose metrics are named
    /// `<namespace>_<subsystem>_<field>` and described as `<help> <field>.`
    pub fn new(
        name: &'static str,
        namespace: impl Into<String>,
        subsystem: &'static str,
        help: &'static str,
        reader: S,
        logger: Span,
    ) -> Self {
        Self {
            name,
            namespace: namespace.into(),
            subsystem,
            help,
            names: OnceLock::new(),
            descriptors: DescriptorCache::new(),
            reader,
            logger,
            _record: PhantomData,
        }
    }

    #[allow(dead_code)]
    pub fn descriptors(&self) -> &DescriptorCache {
        &self.descriptors
    }

    /// Derived field names, in the record's declared field order.
    fn field_names(&self) -> &[String] {
        self.names.get_or_init(|| {
            R::FIELDS
                .iter()
                .map(|field| to_snake_case(field.identifier))
                .collect()
        })
    }

    fn descriptor(&self, field: &str) -> Arc<Descriptor> {
        self.descriptors.get_or_insert_with(field, || {
            debug!(parent: &self.logger, "registering descriptor for {field}");

            Descriptor::new(
                fq_name(&self.namespace, self.subsystem, field),
                format!("{} {field}.", self.help),
                &["node"],
                MetricKind::Gauge,
            )
        })
    }
}

#[async_trait]
impl<R: Record, S: StatsReader<R>> Collector for RecordCollector<R, S> {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn update(&self, sink: &SampleSender) -> Result<(), CollectorError> {
        let snapshot = self
            .reader
            .read()
            .instrument(self.logger.clone())
            .await
            .map_err(|source| CollectorError::Read {
                collector: self.name,
                source,
            })?;

        let names = self.field_names();

        for (node, record) in snapshot.iter() {
            let node = node.to_string();

            for (field, name) in R::FIELDS.iter().zip(names) {
                let descriptor = self.descriptor(name);
                let value = (field.value)(record) as f64;

                let sample = Sample::new(descriptor, value, vec![node.clone()]);

                if sink.send(sample).await.is_err() {
                    // the scrape that asked for these samples has gone away
                    debug!(parent: &self.logger, "sample channel closed, abandoning update");
                    return Ok(());
                }
            }
        }

        debug!(
            parent: &self.logger,
            nodes = snapshot.len(),
            descriptors = self.descriptors.len(),
            "update complete"
        );

        Ok(())
    }
}
