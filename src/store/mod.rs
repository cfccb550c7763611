mod store;

pub use store::{SampleStore, Snapshot};
