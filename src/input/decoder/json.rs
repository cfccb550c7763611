use std::convert::TryFrom;

use serde_json::{self, Value};

use super::decoder::{Decoded, Decoder};
use crate::error::Result;
use crate::model::{Sample, ValueList};

/// Decodes collectd's JSON value-list format:
///
/// ```json
/// [{"values":[1901474177],"dstypes":["counter"],"dsnames":["value"],
///   "time":1280959128,"interval":10,"host":"leeloo.octo.it",
///   "plugin":"cpu","plugin_instance":"0","type":"cpu","type_instance":"idle"}]
/// ```
///
/// collectd's write_http plugin posts arrays; the exec and unixsock paths
/// tend to produce one object per line.
pub struct JsonDecoder {}

impl JsonDecoder {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for JsonDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for JsonDecoder {
    fn decode(&self, buf: &[u8]) -> Result<Decoded> {
        match buf.iter().find(|b| !b.is_ascii_whitespace()) {
            None => Ok(vec![]),
            Some(&b'[') => {
                let items: Vec<Value> = serde_json::from_slice(buf)
                    .map_err(|e| ("JSON deserialization failed", e))?;
                Ok(items.into_iter().map(decode_value_list).collect())
            }
            Some(_) => {
                let vl: ValueList = serde_json::from_slice(buf)
                    .map_err(|e| ("JSON deserialization failed", e))?;
                Ok(vec![Sample::try_from(vl)])
            }
        }
    }
}

fn decode_value_list(item: Value) -> Result<Sample> {
    let vl: ValueList =
        serde_json::from_value(item).map_err(|e| ("malformed value list", e))?;
    Sample::try_from(vl)
}
