use crate::error::Result;
use crate::model::MetricFamily;

pub trait Encoder {
    fn encode(&self, families: &[MetricFamily]) -> Result<Vec<u8>>;
}
