use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::decoder::Decoder;
use super::line::LineReader;
use crate::error::{Error, Result};
use crate::store::SampleStore;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverStats {
    pub lines: usize,
    pub samples: usize,
    /// Undecodable lines plus malformed value lists within decodable ones.
    pub rejected: usize,
}

/// Feeds decoded input lines into a store until the reader is drained.
pub struct Receiver {
    reader: Box<dyn LineReader>,
    decoder: Box<dyn Decoder>,
}

impl Receiver {
    pub fn new(reader: Box<dyn LineReader>, decoder: Box<dyn Decoder>) -> Self {
        Self { reader, decoder }
    }

    /// A line that fails to decode is logged and skipped, and so is a
    /// malformed value list without its well-formed neighbours. A failing
    /// reader stops the receiver.
    pub fn run(mut self, store: &SampleStore) -> Result<ReceiverStats> {
        let mut stats = ReceiverStats::default();

        loop {
            let mut buf = Vec::new();
            match self.reader.read(&mut buf) {
                Ok(0) => break, // EOF
                Ok(_) => (),
                Err(e) => return Err(("reader failed", e).into()),
            };

            stats.lines += 1;

            let decoded = match self.decoder.decode(&buf) {
                Ok(decoded) => decoded,
                Err(err) => {
                    warn!(line = stats.lines, error = %err, "dropping undecodable line");
                    stats.rejected += 1;
                    continue;
                }
            };

            let mut samples = Vec::with_capacity(decoded.len());
            for (index, res) in decoded.into_iter().enumerate() {
                match res {
                    Ok(sample) => samples.push(sample),
                    Err(err) => {
                        warn!(line = stats.lines, index, error = %err, "dropping malformed value list");
                        stats.rejected += 1;
                    }
                }
            }

            if samples.is_empty() {
                continue;
            }

            stats.samples += samples.len();
            store.ingest(samples);
        }

        info!(
            lines = stats.lines,
            samples = stats.samples,
            rejected = stats.rejected,
            "receiver drained its input"
        );
        Ok(stats)
    }

    pub fn spawn(self, store: Arc<SampleStore>) -> Result<ReceiverHandle> {
        debug!("starting receiver thread");
        let (done_tx, done_rx) = mpsc::channel::<()>();

        let thread = thread::Builder::new()
            .name("receiver".into())
            .spawn(move || {
                // Dropped on return or unwind, which wakes up waiters.
                let _done = done_tx;
                self.run(&store)
            })
            .map_err(|e| ("couldn't spawn receiver thread", e))?;

        Ok(ReceiverHandle {
            thread,
            done: done_rx,
        })
    }
}

pub struct ReceiverHandle {
    thread: JoinHandle<Result<ReceiverStats>>,
    done: mpsc::Receiver<()>,
}

impl ReceiverHandle {
    /// Waits up to `timeout` for the receiver to finish. Returns true once
    /// it has.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        match self.done.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => false,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
        }
    }

    pub fn join(self) -> Result<ReceiverStats> {
        self.thread
            .join()
            .map_err(|_| Error::new("receiver thread panicked"))?
    }
}
