//! Exposes collectd value lists as Prometheus metric families.
//!
//! Samples pushed by collectd are kept in a [`store::SampleStore`], one per
//! `host/plugin[-instance]/type[-instance]` identifier. Each scrape asks a
//! [`collector::Collector`] for a fresh set of metric families, built from
//! the samples that haven't outlived twice their reporting interval.

pub mod cliopt;
pub mod collector;
pub mod error;
pub mod input;
pub mod mapping;
pub mod model;
pub mod output;
pub mod runner;
pub mod store;
pub mod utils;
