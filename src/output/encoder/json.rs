use std::collections::BTreeMap;

use serde::Serialize;
use serde_json;

use super::encoder::Encoder;
use crate::error::Result;
use crate::model::{MetricFamily, SampleValue};

// [
//   {
//     "name": "collectd_cpu",
//     "help": "Collectd_exporter: 'cpu'  Type: 'cpu' Dstype: 'gauge' Dsname: 'value'",
//     "type": "gauge",
//     "metrics": [
//       {"labels": {"cpu": "0", "instance": "h1", "type": "idle"}, "value": 42.0}
//     ]
//   }
// ]
#[derive(Serialize)]
struct SeriesRepr<'a> {
    labels: BTreeMap<&'a String, &'a String>,
    // NaN and infinities serialize as null.
    value: SampleValue,
}

#[derive(Serialize)]
struct FamilyRepr<'a> {
    name: &'a str,
    help: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    metrics: Vec<SeriesRepr<'a>>,
}

impl<'a> FamilyRepr<'a> {
    fn new(family: &'a MetricFamily) -> Self {
        Self {
            name: family.name(),
            help: family.help(),
            kind: family.kind().as_str(),
            metrics: family
                .series()
                .iter()
                .map(|s| SeriesRepr {
                    labels: s.labels().iter().collect(),
                    value: s.value(),
                })
                .collect(),
        }
    }
}

pub struct JsonEncoder {}

impl JsonEncoder {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, families: &[MetricFamily]) -> Result<Vec<u8>> {
        let repr: Vec<_> = families.iter().map(FamilyRepr::new).collect();
        serde_json::to_vec(&repr).map_err(|e| ("JSON serialization failed", e).into())
    }
}
