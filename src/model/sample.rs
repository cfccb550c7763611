use std::convert::TryFrom;
use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use super::timestamp::{from_epoch_secs, Timestamp};
use super::{MetricName, SampleValue};
use crate::error::{Error, Result};

/// collectd data source type. Dictates how a value aggregates over time.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DsKind {
    Gauge,
    Counter,
    Derive,
    Absolute,
}

impl DsKind {
    /// Counter-like kinds accumulate and are exposed as `_total` counters.
    pub fn is_cumulative(&self) -> bool {
        !matches!(self, DsKind::Gauge)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DsKind::Gauge => "gauge",
            DsKind::Counter => "counter",
            DsKind::Derive => "derive",
            DsKind::Absolute => "absolute",
        }
    }
}

impl fmt::Display for DsKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DsKind {
    type Error = Error;

    fn try_from(kind: &str) -> Result<Self> {
        match kind {
            "gauge" => Ok(DsKind::Gauge),
            "counter" => Ok(DsKind::Counter),
            "derive" => Ok(DsKind::Derive),
            "absolute" => Ok(DsKind::Absolute),
            _ => Err(Error::from(format!("unknown data source type '{}'", kind))),
        }
    }
}

/// One sub-measurement of a value list.
#[derive(Clone, Debug, PartialEq)]
pub struct DataSource {
    name: MetricName,
    kind: DsKind,
    value: SampleValue,
}

impl DataSource {
    pub fn new<N: Into<MetricName>>(name: N, kind: DsKind, value: SampleValue) -> Self {
        Self {
            name: name.into(),
            kind,
            value,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> DsKind {
        self.kind
    }

    #[inline]
    pub fn value(&self) -> SampleValue {
        self.value
    }
}

/// A value list as collectd emits it: the data sources are spread over three
/// parallel arrays. See `Sample` for the validated form.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ValueList {
    pub host: String,
    pub plugin: String,
    #[serde(default)]
    pub plugin_instance: String,
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(default)]
    pub type_instance: String,
    pub time: f64,
    pub interval: f64,
    pub dsnames: Vec<String>,
    pub dstypes: Vec<String>,
    // collectd writes NaN gauges as null.
    pub values: Vec<Option<SampleValue>>,
}

/// The latest reading of one collectd source. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    host: String,
    plugin: String,
    plugin_instance: String,
    typ: String,
    type_instance: String,
    time: Timestamp,
    epoch_secs: f64,
    interval: Duration,
    data_sources: Vec<DataSource>,
}

impl Sample {
    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[inline]
    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    #[inline]
    pub fn plugin_instance(&self) -> &str {
        &self.plugin_instance
    }

    #[inline]
    pub fn typ(&self) -> &str {
        &self.typ
    }

    #[inline]
    pub fn type_instance(&self) -> &str {
        &self.type_instance
    }

    #[inline]
    pub fn time(&self) -> Timestamp {
        self.time
    }

    /// The sample time exactly as collectd reported it.
    #[inline]
    pub fn epoch_secs(&self) -> f64 {
        self.epoch_secs
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[inline]
    pub fn data_sources(&self) -> &[DataSource] {
        &self.data_sources
    }
}

impl TryFrom<ValueList> for Sample {
    type Error = Error;

    fn try_from(vl: ValueList) -> Result<Self> {
        if vl.dsnames.len() != vl.values.len() || vl.dstypes.len() != vl.values.len() {
            return Err(Error::from(format!(
                "value list {}/{}/{} has {} values, {} dsnames and {} dstypes",
                vl.host,
                vl.plugin,
                vl.typ,
                vl.values.len(),
                vl.dsnames.len(),
                vl.dstypes.len(),
            )));
        }

        if !vl.interval.is_finite() || vl.interval <= 0.0 || vl.interval >= u32::MAX as f64 {
            return Err(Error::from(format!("invalid sample interval {}", vl.interval)));
        }

        let time = from_epoch_secs(vl.time)?;
        let interval = Duration::from_secs_f64(vl.interval);

        let data_sources = vl
            .dsnames
            .into_iter()
            .zip(vl.dstypes.iter())
            .zip(vl.values.into_iter())
            .map(|((name, kind), value)| {
                Ok(DataSource::new(
                    name,
                    DsKind::try_from(kind.as_str())?,
                    value.unwrap_or(SampleValue::NAN),
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            host: vl.host,
            plugin: vl.plugin,
            plugin_instance: vl.plugin_instance,
            typ: vl.typ,
            type_instance: vl.type_instance,
            time,
            epoch_secs: vl.time,
            interval,
            data_sources,
        })
    }
}
