use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::mapping::{identifier, Identifier};
use crate::model::Sample;

/// Owned point-in-time copy of the store contents.
pub type Snapshot = HashMap<Identifier, Arc<Sample>>;

/// Latest sample per identifier.
///
/// Entries are never evicted: a source that stops reporting keeps its last
/// sample here forever and is only hidden from collection by the staleness
/// check.
#[derive(Debug, Default)]
pub struct SampleStore {
    samples: Mutex<Snapshot>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts every sample under its identifier. Within one batch, a later
    /// sample overwrites an earlier one with the same identifier.
    pub fn ingest(&self, samples: Vec<Sample>) {
        let count = samples.len();
        let keyed: Vec<_> = samples
            .into_iter()
            .map(|s| (identifier(&s), Arc::new(s)))
            .collect();

        let mut guard = self.lock();
        guard.extend(keyed);
        let size = guard.len();
        drop(guard);

        debug!(samples = count, store_size = size, "ingested samples");
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The map is only ever touched by whole-entry inserts and clones, so a
    // panic in another holder cannot leave it half-updated.
    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.samples
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use super::*;
    use crate::model::ValueList;

    fn sample(type_instance: &str, time: f64, value: f64) -> Sample {
        Sample::try_from(ValueList {
            host: "h1".into(),
            plugin: "cpu".into(),
            plugin_instance: "0".into(),
            typ: "cpu".into(),
            type_instance: type_instance.into(),
            time,
            interval: 10.0,
            dsnames: vec!["value".into()],
            dstypes: vec!["derive".into()],
            values: vec![Some(value)],
        })
        .expect("valid value list")
    }

    #[test]
    fn test_later_ingest_overwrites() {
        let store = SampleStore::new();
        store.ingest(vec![sample("idle", 100.0, 1.0)]);
        store.ingest(vec![sample("idle", 110.0, 2.0)]);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 1);

        let latest = &snapshot["h1/cpu-0/cpu-idle"];
        assert_eq!(latest.time(), 110000);
        assert_eq!(latest.data_sources()[0].value(), 2.0);
    }

    #[test]
    fn test_later_sample_in_batch_wins() {
        let store = SampleStore::new();
        store.ingest(vec![
            sample("idle", 100.0, 1.0),
            sample("user", 100.0, 5.0),
            sample("idle", 100.0, 3.0),
        ]);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["h1/cpu-0/cpu-idle"].data_sources()[0].value(), 3.0);
        assert_eq!(snapshot["h1/cpu-0/cpu-user"].data_sources()[0].value(), 5.0);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let store = SampleStore::new();
        assert!(store.is_empty());

        store.ingest(vec![sample("idle", 100.0, 1.0)]);
        let before = store.snapshot();

        store.ingest(vec![sample("idle", 110.0, 2.0), sample("user", 110.0, 1.0)]);

        assert_eq!(before.len(), 1);
        assert_eq!(before["h1/cpu-0/cpu-idle"].data_sources()[0].value(), 1.0);
        assert_eq!(store.len(), 2);
    }
}
