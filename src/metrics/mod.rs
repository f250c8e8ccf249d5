mod descriptor;
mod name;
mod record;

pub use descriptor::{Descriptor, DescriptorCache};
pub use name::{fq_name, is_valid_name, to_snake_case};
pub use record::{Field, Record, Snapshot};

use serde::Serialize;

use std::sync::Arc;

/// The exposition type of a metric family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Gauge,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gauge => "gauge",
        }
    }
}

/// A single observation of one series, emitted by a collector.
#[derive(Debug, Clone)]
pub struct Sample {
    pub descriptor: Arc<Descriptor>,
    pub value: f64,
    pub label_values: Vec<String>,
}

impl Sample {
    pub fn new(descriptor: Arc<Descriptor>, value: f64, label_values: Vec<String>) -> Self {
        debug_assert_eq!(descriptor.labels().len(), label_values.len());

        Self {
            descriptor,
            value,
            label_values,
        }
    }

    /// Label names zipped with this sample's values.
    pub fn labels(&self) -> impl Iterator<Item = (&str, &str)> {
        self.descriptor
            .labels()
            .iter()
            .map(String::as_str)
            .zip(self.label_values.iter().map(String::as_str))
    }
}

/// Bounded channel collectors emit samples into. A full channel stalls the
/// sender until the exposition side drains it.
pub type SampleSender = tokio::sync::mpsc::Sender<Sample>;
