use super::encoder::Encoder;
use super::writer::Writer;
use crate::error::Result;
use crate::model::MetricFamily;

pub struct Output {
    writer: Box<dyn Writer>,
    encoder: Box<dyn Encoder>,
}

impl Output {
    pub fn new(writer: Box<dyn Writer>, encoder: Box<dyn Encoder>) -> Self {
        Self { writer, encoder }
    }

    pub fn write(&mut self, families: &[MetricFamily]) -> Result<()> {
        let buf = self.encoder.encode(families)?;

        self.writer
            .write(&buf)
            .map_err(|e| ("writer failed", e))?;

        Ok(())
    }
}
