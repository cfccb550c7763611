use std::fmt::Write;

use super::encoder::Encoder;
use crate::error::Result;
use crate::model::{Labels, MetricFamily, SampleValue};

// Prometheus text exposition format, version 0.0.4.
//
// # HELP collectd_cpu_total Collectd_exporter: 'cpu'  Type: 'cpu' Dstype: 'derive' Dsname: 'value'
// # TYPE collectd_cpu_total counter
// collectd_cpu_total{cpu="0",instance="h1",type="idle"} 1901474177
pub struct TextEncoder {}

impl TextEncoder {
    pub fn new() -> Self {
        Self {}
    }

    fn encode_family(&self, out: &mut String, family: &MetricFamily) -> std::fmt::Result {
        writeln!(out, "# HELP {} {}", family.name(), escape_help(family.help()))?;
        writeln!(out, "# TYPE {} {}", family.name(), family.kind())?;

        for series in family.series() {
            out.push_str(family.name());
            encode_labels(out, series.labels())?;
            writeln!(out, " {}", format_value(series.value()))?;
        }
        Ok(())
    }
}

impl Default for TextEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for TextEncoder {
    fn encode(&self, families: &[MetricFamily]) -> Result<Vec<u8>> {
        let mut out = String::new();
        for family in families {
            self.encode_family(&mut out, family)
                .map_err(|e| ("text encoding failed", e))?;
        }
        Ok(out.into_bytes())
    }
}

fn encode_labels(out: &mut String, labels: &Labels) -> std::fmt::Result {
    if labels.is_empty() {
        return Ok(());
    }

    out.push('{');
    for (i, (name, value)) in labels.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write!(out, "{}=\"{}\"", name, escape_label_value(value))?;
    }
    out.push('}');
    Ok(())
}

fn format_value(value: SampleValue) -> String {
    if value.is_nan() {
        "NaN".to_owned()
    } else if value.is_infinite() {
        (if value > 0.0 { "+Inf" } else { "-Inf" }).to_owned()
    } else {
        value.to_string()
    }
}

fn escape_help(help: &str) -> String {
    help.replace('\\', r"\\").replace('\n', r"\n")
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', "\\\"")
        .replace('\n', r"\n")
}
