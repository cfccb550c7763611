mod collector;

pub use collector::{is_stale, valid_until, Collector, MetricFamilies, STALENESS_MULTIPLIER};
