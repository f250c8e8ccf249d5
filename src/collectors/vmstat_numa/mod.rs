//! Exposes the per-node counters the kernel publishes in
//! `/sys/devices/system/node/node<N>/vmstat`.
//!
//! Every counter becomes a gauge named `<namespace>_vmstat_numa_<counter>`
//! with a `node` label, for example `node_vmstat_numa_numa_hit{node="0"}`.

const NAME: &str = "vmstat_numa";
const SUBSYSTEM: &str = "vmstat_numa";
const HELP: &str = "Virtual memory information field";

use super::*;
use crate::common::SysFs;
use crate::metrics::Snapshot;

use tracing::debug;

use std::io::Error;

mod stats;

use stats::NodeVmStat;

#[distributed_slice(COLLECTORS)]
static VMSTAT_NUMA: Registration = Registration {
    name: NAME,
    default_enabled: false,
    init,
};

fn init(config: Arc<Config>, logger: Span) -> CollectorResult {
    let sysfs = SysFs::new(config.general().sysfs()).map_err(|source| {
        CollectorError::Construction {
            collector: NAME,
            source,
        }
    })?;

    logger.in_scope(|| debug!("reading node statistics under {}", sysfs.root().display()));

    Ok(Box::new(RecordCollector::new(
        NAME,
        config.general().namespace(),
        SUBSYSTEM,
        HELP,
        NodeVmStatReader { sysfs },
        logger,
    )))
}

struct NodeVmStatReader {
    sysfs: SysFs,
}

#[async_trait]
impl StatsReader<NodeVmStat> for NodeVmStatReader {
    async fn read(&self) -> Result<Snapshot<NodeVmStat>, Error> {
        let sysfs = self.sysfs.clone();

        tokio::task::spawn_blocking(move || sysfs.node_records("vmstat"))
            .await
            .map_err(Error::other)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{to_snake_case, Record};

    use tokio::sync::mpsc;

    use std::collections::{HashMap, HashSet};

    const NODE0: &str = "\
nr_free_pages 1000
nr_zone_inactive_anon 1
nr_zone_active_anon 2
numa_hit 12345
numa_miss 6
numa_foreign 7
numa_interleave 8
numa_local 12000
numa_other 345
nr_kernel_misc_reclaimable 9
nr_foll_pin_acquired 11
";

    fn sysfs(nodes: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();

        for (name, content) in nodes {
            let node = dir.path().join("devices/system/node").join(name);
            std::fs::create_dir_all(&node).unwrap();
            std::fs::write(node.join("vmstat"), content).unwrap();
        }

        dir
    }

    fn config(sysfs: &std::path::Path) -> Arc<Config> {
        let content = format!(
            "[general]\nsysfs = \"{}\"\n\n[collectors.vmstat_numa]\nenabled = true\n",
            sysfs.display()
        );
        Arc::new(toml::from_str(&content).unwrap())
    }

    async fn collect(collector: &dyn Collector) -> Vec<crate::metrics::Sample> {
        let (tx, mut rx) = mpsc::channel(16);

        let task = async {
            let mut samples = Vec::new();
            while let Some(sample) = rx.recv().await {
                samples.push(sample);
            }
            samples
        };

        let update = async {
            collector.update(&tx).await.unwrap();
            drop(tx);
        };

        let (_, samples) = tokio::join!(update, task);
        samples
    }

    #[test]
    fn test_field_names_match_kernel_keys() {
        for field in NodeVmStat::FIELDS {
            let mut record = NodeVmStat::default();
            let key = to_snake_case(field.identifier);

            assert!(record.set(&key, 42), "no field for key {key}");
            assert_eq!((field.value)(&record), 42);
        }
    }

    #[test]
    fn test_field_names_unique() {
        let names: HashSet<_> = NodeVmStat::FIELDS
            .iter()
            .map(|f| to_snake_case(f.identifier))
            .collect();

        assert_eq!(names.len(), NodeVmStat::FIELDS.len());
    }

    #[test]
    fn test_missing_sysfs() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir.path().join("missing"));

        let err = init(config, Span::none()).err().unwrap();
        assert!(matches!(
            err,
            CollectorError::Construction {
                collector: NAME,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_collect() {
        let dir = sysfs(&[("node0", NODE0), ("node1", "numa_hit 5\n")]);
        let collector = init(config(dir.path()), Span::none()).unwrap();

        let samples = collect(collector.as_ref()).await;
        assert_eq!(samples.len(), 2 * NodeVmStat::FIELDS.len());

        let values: HashMap<(String, String), f64> = samples
            .iter()
            .map(|s| {
                (
                    (s.descriptor.name().to_string(), s.label_values[0].clone()),
                    s.value,
                )
            })
            .collect();

        let value = |name: &str, node: &str| values[&(name.to_string(), node.to_string())];

        assert_eq!(value("node_vmstat_numa_numa_hit", "0"), 12345.0);
        assert_eq!(value("node_vmstat_numa_numa_local", "0"), 12000.0);
        assert_eq!(value("node_vmstat_numa_nr_free_pages", "0"), 1000.0);
        assert_eq!(value("node_vmstat_numa_nr_kernel_misc_reclaimable", "0"), 9.0);
        assert_eq!(value("node_vmstat_numa_numa_hit", "1"), 5.0);
        assert_eq!(value("node_vmstat_numa_numa_miss", "1"), 0.0);

        let sample = samples
            .iter()
            .find(|s| s.descriptor.name() == "node_vmstat_numa_numa_foreign")
            .unwrap();
        assert_eq!(
            sample.descriptor.help(),
            "Virtual memory information field numa_foreign."
        );
        assert_eq!(sample.labels().collect::<Vec<_>>()[0].0, "node");
    }

    #[tokio::test]
    async fn test_read_error() {
        let dir = sysfs(&[("node0", "numa_hit lots\n")]);
        let collector = init(config(dir.path()), Span::none()).unwrap();

        let (tx, _rx) = mpsc::channel(16);
        let err = collector.update(&tx).await.unwrap_err();

        assert!(matches!(err, CollectorError::Read { collector: NAME, .. }));
        assert!(err.to_string().starts_with("vmstat_numa collector"));
    }
}
