use std::fmt;

use super::labels::Labels;
use super::{MetricName, SampleValue};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    labels: Labels,
    value: SampleValue,
}

impl Series {
    pub fn new(labels: Labels, value: SampleValue) -> Self {
        Self { labels, value }
    }

    #[inline]
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    #[inline]
    pub fn value(&self) -> SampleValue {
        self.value
    }
}

/// Series sharing one metric name, kind and help text.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricFamily {
    name: MetricName,
    help: String,
    kind: MetricKind,
    series: Vec<Series>,
}

impl MetricFamily {
    pub fn new(name: MetricName, help: String, kind: MetricKind) -> Self {
        Self {
            name,
            help,
            kind,
            series: vec![],
        }
    }

    pub fn add_series(&mut self, labels: Labels, value: SampleValue) {
        self.series.push(Series::new(labels, value));
    }

    pub fn sort_series(&mut self) {
        self.series.sort_by(|a, b| a.labels.cmp(&b.labels));
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn help(&self) -> &str {
        &self.help
    }

    #[inline]
    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    #[inline]
    pub fn series(&self) -> &[Series] {
        &self.series
    }
}
