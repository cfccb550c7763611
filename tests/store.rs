use std::convert::TryFrom;
use std::sync::Arc;
use std::thread;

use collectd_exporter::collector::Collector;
use collectd_exporter::model::{Sample, ValueList};
use collectd_exporter::store::SampleStore;

const WRITERS: usize = 4;
const ROUNDS: usize = 500;
const T: f64 = 1609459200.0;

// Both data sources of a sample always carry the same value, so a torn
// sample would show up as a mismatch.
fn sample(writer: usize, round: usize) -> Sample {
    let value = round as f64;
    Sample::try_from(ValueList {
        host: format!("h{}", writer),
        plugin: "interface".into(),
        plugin_instance: "eth0".into(),
        typ: "if_octets".into(),
        type_instance: "".into(),
        time: T + round as f64,
        interval: 10.0,
        dsnames: vec!["rx".into(), "tx".into()],
        dstypes: vec!["derive".into(), "derive".into()],
        values: vec![Some(value), Some(value)],
    })
    .expect("valid value list")
}

#[test]
fn concurrent_ingest_and_snapshot() {
    let store = Arc::new(SampleStore::new());

    let writers: Vec<_> = (0..WRITERS)
        .map(|w| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for round in 0..ROUNDS {
                    store.ingest(vec![sample(w, round)]);
                }
            })
        })
        .collect();

    let reader = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            let mut last_seen = vec![None; WRITERS];
            for _ in 0..ROUNDS {
                for (id, s) in store.snapshot() {
                    let ds = s.data_sources();
                    assert_eq!(ds[0].value(), ds[1].value(), "torn sample {}", id);

                    // A writer's samples only move forward in time.
                    let w: usize = s.host()[1..].parse().expect("host index");
                    let time = s.time();
                    if let Some(prev) = last_seen[w] {
                        assert!(time >= prev, "{} went back in time", id);
                    }
                    last_seen[w] = Some(time);
                }
            }
        })
    };

    for w in writers {
        w.join().expect("writer panicked");
    }
    reader.join().expect("reader panicked");

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), WRITERS);
    for s in snapshot.values() {
        assert_eq!(s.data_sources()[0].value(), (ROUNDS - 1) as f64);
    }
}

#[test]
fn collect_while_ingesting() {
    let store = Arc::new(SampleStore::new());
    let collector = Collector::new(Arc::clone(&store));

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for round in 0..ROUNDS {
                store.ingest((0..WRITERS).map(|w| sample(w, round)).collect());
            }
        })
    };

    let now = (T as i64 + ROUNDS as i64) * 1000;
    for _ in 0..50 {
        for family in collector.collect_at(now) {
            assert!(family.series().len() <= WRITERS);
            assert!(family.name().ends_with("_total"));
        }
    }

    writer.join().expect("writer panicked");

    let families: Vec<_> = collector.collect_at(now).collect();
    assert_eq!(families.len(), 2);
    assert!(families.iter().all(|f| f.series().len() == WRITERS));
}
