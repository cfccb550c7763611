use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::collector::Collector;
use crate::error::Result;
use crate::input::{Receiver, ReceiverStats};
use crate::model::Timestamp;
use crate::output::Output;
use crate::store::SampleStore;

// receiver thread:  LineReader -> Decoder -> SampleStore::ingest
//                                                  |
// scrape (caller):              SampleStore::snapshot -> Collector -> Encoder -> Writer
//
// Reader    == stdin or file        ->  lines
// Decoder   == line                 ->  Vec<Result<Sample>>
// Store     == Vec<Sample>          ->  identifier -> latest Sample
// Collector == snapshot             ->  Iterator<MetricFamily>
// Encoder   == [MetricFamily]       ->  Result<Vec<u8>>
// Writer    == bytes                ->  stdout

pub struct Runner {
    store: Arc<SampleStore>,
    receiver: Receiver,
    collector: Collector,
    output: Output,
    now: Option<Timestamp>,
    scrape_interval: Option<Duration>,
}

impl Runner {
    /// `now` pins the staleness clock. `scrape_interval` enables scrapes
    /// while the receiver is still running; there's always a final scrape
    /// once the input is drained.
    pub fn new(
        receiver: Receiver,
        output: Output,
        now: Option<Timestamp>,
        scrape_interval: Option<Duration>,
    ) -> Self {
        let store = Arc::new(SampleStore::new());
        Self {
            collector: Collector::new(Arc::clone(&store)),
            store,
            receiver,
            output,
            now,
            scrape_interval,
        }
    }

    pub fn run(self) -> Result<ReceiverStats> {
        let Runner {
            store,
            receiver,
            collector,
            mut output,
            now,
            scrape_interval,
        } = self;

        let handle = receiver.spawn(store)?;

        if let Some(interval) = scrape_interval {
            while !handle.wait_timeout(interval) {
                scrape(&collector, &mut output, now)?;
            }
        }

        let stats = handle.join()?;
        scrape(&collector, &mut output, now)?;
        Ok(stats)
    }
}

fn scrape(collector: &Collector, output: &mut Output, now: Option<Timestamp>) -> Result<()> {
    let families: Vec<_> = match now {
        Some(now) => collector.collect_at(now).collect(),
        None => collector.collect().collect(),
    };

    info!(families = families.len(), "scrape");
    output.write(&families)
}
