use std::collections::{btree_map, BTreeMap};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::mapping::{description, labels, metric_name};
use crate::model::{
    floor_epoch_secs, now, DsKind, MetricFamily, MetricKind, MetricName, Sample, Timestamp,
    TimestampTrait,
};
use crate::store::SampleStore;

/// A sample is exposed for this many of its intervals past its timestamp.
pub const STALENESS_MULTIPLIER: u32 = 2;

/// Computed in seconds and floored once, so comparing against a
/// millisecond `now` agrees with comparing the exact instants.
pub fn valid_until(sample: &Sample) -> Timestamp {
    floor_epoch_secs(
        sample.epoch_secs() + sample.interval().as_secs_f64() * f64::from(STALENESS_MULTIPLIER),
    )
}

/// A sample right at the end of its window is still fresh.
pub fn is_stale(sample: &Sample, now: Timestamp) -> bool {
    valid_until(sample) < now
}

/// Turns the store contents into metric families on demand. Holds no state
/// between collection cycles.
pub struct Collector {
    store: Arc<SampleStore>,
}

impl Collector {
    pub fn new(store: Arc<SampleStore>) -> Self {
        Self { store }
    }

    pub fn collect(&self) -> MetricFamilies {
        self.collect_at(now())
    }

    pub fn collect_at(&self, now: Timestamp) -> MetricFamilies {
        let snapshot = self.store.snapshot();

        // Identifier order decides which sample's description a family gets.
        let mut samples: Vec<_> = snapshot.iter().collect();
        samples.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let mut families = BTreeMap::new();
        let mut stale = 0;

        for (id, sample) in samples {
            if is_stale(sample, now) {
                trace!(%id, valid_until = %valid_until(sample).to_rfc3339(), "skipping stale sample");
                stale += 1;
                continue;
            }

            let labels = labels(sample);
            for ds in sample.data_sources() {
                let name = metric_name(sample, ds);
                families
                    .entry(name.clone())
                    .or_insert_with(|| {
                        MetricFamily::new(name, description(sample, ds), metric_kind(ds.kind()))
                    })
                    .add_series(labels.clone(), ds.value());
            }
        }

        debug!(
            samples = snapshot.len(),
            stale,
            families = families.len(),
            now = %now.to_rfc3339(),
            "collection cycle finished"
        );

        MetricFamilies {
            inner: families.into_iter(),
        }
    }
}

fn metric_kind(kind: DsKind) -> MetricKind {
    match kind {
        DsKind::Gauge => MetricKind::Gauge,
        DsKind::Counter | DsKind::Derive | DsKind::Absolute => MetricKind::Counter,
    }
}

/// One-shot, name-ordered sequence of the families built by one cycle.
pub struct MetricFamilies {
    inner: btree_map::IntoIter<MetricName, MetricFamily>,
}

impl std::iter::Iterator for MetricFamilies {
    type Item = MetricFamily;

    fn next(&mut self) -> Option<Self::Item> {
        let (_, mut family) = self.inner.next()?;
        // Snapshot iteration order is arbitrary.
        family.sort_series();
        Some(family)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl std::iter::ExactSizeIterator for MetricFamilies {}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use super::*;
    use crate::model::{Labels, ValueList};

    const T: f64 = 1609459200.0;
    const T_MILLIS: Timestamp = 1609459200000;

    fn value_list() -> ValueList {
        ValueList {
            host: "h1".into(),
            plugin: "cpu".into(),
            plugin_instance: "0".into(),
            typ: "cpu".into(),
            type_instance: "idle".into(),
            time: T,
            interval: 10.0,
            dsnames: vec!["value".into()],
            dstypes: vec!["gauge".into()],
            values: vec![Some(42.0)],
        }
    }

    fn collector(vls: Vec<ValueList>) -> Collector {
        let store = Arc::new(SampleStore::new());
        store.ingest(
            vls.into_iter()
                .map(|vl| Sample::try_from(vl).expect("valid value list"))
                .collect(),
        );
        Collector::new(store)
    }

    fn labels_of(pairs: &[(&str, &str)]) -> Labels {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_fresh_sample() {
        let families: Vec<_> = collector(vec![value_list()])
            .collect_at(T_MILLIS + 1000)
            .collect();

        assert_eq!(families.len(), 1);
        let family = &families[0];
        assert_eq!(family.name(), "collectd_cpu");
        assert_eq!(family.kind(), MetricKind::Gauge);
        assert_eq!(family.series().len(), 1);
        assert_eq!(
            family.series()[0].labels(),
            &labels_of(&[("cpu", "0"), ("type", "idle"), ("instance", "h1")])
        );
        assert_eq!(family.series()[0].value(), 42.0);
    }

    #[test]
    fn test_stale_sample() {
        let c = collector(vec![value_list()]);
        assert_eq!(c.collect_at(T_MILLIS + 21000).count(), 0);
        // Stale samples stay in the store.
        assert_eq!(c.store.len(), 1);
    }

    #[test]
    fn test_staleness_boundary() {
        let c = collector(vec![value_list()]);
        assert_eq!(c.collect_at(T_MILLIS + 20000).count(), 1);
        assert_eq!(c.collect_at(T_MILLIS + 20001).count(), 0);
    }

    #[test]
    fn test_staleness_boundary_sub_millisecond() {
        let mut vl = value_list();
        vl.time = T + 0.0006;
        let c = collector(vec![vl]);

        // Valid until T+20.0006s: still fresh at T+20.000s, stale at T+20.001s.
        assert_eq!(c.collect_at(T_MILLIS + 20000).count(), 1);
        assert_eq!(c.collect_at(T_MILLIS + 20001).count(), 0);
    }

    #[test]
    fn test_instances_share_family() {
        let mut other = value_list();
        other.plugin_instance = "1".into();
        other.values = vec![Some(7.0)];

        let families: Vec<_> = collector(vec![value_list(), other])
            .collect_at(T_MILLIS)
            .collect();

        assert_eq!(families.len(), 1);
        let series = families[0].series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].labels()["cpu"], "0");
        assert_eq!(series[0].value(), 42.0);
        assert_eq!(series[1].labels()["cpu"], "1");
        assert_eq!(series[1].value(), 7.0);
    }

    #[test]
    fn test_multi_value_sample() {
        let vl = ValueList {
            host: "h1".into(),
            plugin: "interface".into(),
            plugin_instance: "eth0".into(),
            typ: "if_octets".into(),
            type_instance: "".into(),
            time: T,
            interval: 10.0,
            dsnames: vec!["rx".into(), "tx".into()],
            dstypes: vec!["derive".into(), "derive".into()],
            values: vec![Some(100.0), Some(200.0)],
        };

        let families: Vec<_> = collector(vec![vl, value_list()])
            .collect_at(T_MILLIS)
            .collect();

        let names: Vec<_> = families.iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            vec![
                "collectd_cpu",
                "collectd_interface_if_octets_rx_total",
                "collectd_interface_if_octets_tx_total",
            ]
        );
        assert_eq!(families[1].kind(), MetricKind::Counter);
        assert_eq!(
            families[1].help(),
            "Collectd_exporter: 'interface'  Type: 'if_octets' Dstype: 'derive' Dsname: 'rx'"
        );
        assert_eq!(families[2].series()[0].value(), 200.0);
    }

    #[test]
    fn test_mixed_staleness() {
        let mut old = value_list();
        old.type_instance = "user".into();
        old.time = T - 60.0;

        let families: Vec<_> = collector(vec![value_list(), old])
            .collect_at(T_MILLIS)
            .collect();

        assert_eq!(families.len(), 1);
        assert_eq!(families[0].series().len(), 1);
        assert_eq!(families[0].series()[0].labels()["type"], "idle");
    }

    #[test]
    fn test_cycles_are_independent() {
        let c = collector(vec![value_list()]);
        let first: Vec<_> = c.collect_at(T_MILLIS).collect();
        let second: Vec<_> = c.collect_at(T_MILLIS).collect();
        assert_eq!(first, second);
        assert_eq!(second[0].series().len(), 1);
    }
}
