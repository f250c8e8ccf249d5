//! Prometheus text exposition format, version 0.0.4.

use crate::metrics::{Descriptor, Sample};

use std::collections::BTreeMap;
use std::fmt::Write;

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Renders samples grouped into families, sorted by metric name. Within a
/// family, series are sorted by label values.
pub fn encode(samples: &[Sample]) -> String {
    let mut families: BTreeMap<&str, (&Descriptor, Vec<&Sample>)> = BTreeMap::new();

    for sample in samples {
        families
            .entry(sample.descriptor.name())
            .or_insert_with(|| (sample.descriptor.as_ref(), Vec::new()))
            .1
            .push(sample);
    }

    let mut out = String::with_capacity(samples.len() * 64);

    for (name, (descriptor, mut series)) in families {
        series.sort_by(|a, b| a.label_values.cmp(&b.label_values));

        let _ = writeln!(out, "# HELP {name} {}", escape_help(descriptor.help()));
        let _ = writeln!(out, "# TYPE {name} {}", descriptor.kind().as_str());

        for sample in series {
            out.push_str(name);

            if !sample.label_values.is_empty() {
                out.push('{');
                for (i, (label, value)) in sample.labels().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    let _ = write!(out, "{label}=\"{}\"", escape_label_value(value));
                }
                out.push('}');
            }

            let _ = writeln!(out, " {}", format_value(sample.value));
        }
    }

    out
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}
