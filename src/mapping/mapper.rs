use lazy_static::lazy_static;
use regex::Regex;

use crate::model::{DataSource, Labels, MetricName, Sample, LABEL_INSTANCE, LABEL_TYPE};

/// Store key: `<host>/<plugin>[-<plugin_instance>]/<type>[-<type_instance>]`.
pub type Identifier = String;

const METRIC_PREFIX: &str = "collectd";

// collectd's name for the only data source of single-valued types.
const DEFAULT_DS_NAME: &str = "value";

lazy_static! {
    static ref INVALID_NAME_CHARS: Regex = Regex::new(r"[^a-zA-Z0-9_:]").unwrap();
}

pub fn identifier(sample: &Sample) -> Identifier {
    let mut id = format!("{}/{}", sample.host(), sample.plugin());
    if !sample.plugin_instance().is_empty() {
        id.push('-');
        id.push_str(sample.plugin_instance());
    }
    id.push('/');
    id.push_str(sample.typ());
    if !sample.type_instance().is_empty() {
        id.push('-');
        id.push_str(sample.type_instance());
    }
    id
}

/// Series of the same plugin, type, data source name and kind share a name
/// and therefore end up in one family.
pub fn metric_name(sample: &Sample, ds: &DataSource) -> MetricName {
    let mut name = if sample.plugin() == sample.typ() {
        format!("{}_{}", METRIC_PREFIX, sample.typ())
    } else {
        format!("{}_{}_{}", METRIC_PREFIX, sample.plugin(), sample.typ())
    };

    if ds.name() != DEFAULT_DS_NAME {
        name.push('_');
        name.push_str(ds.name());
    }

    if ds.kind().is_cumulative() {
        name.push_str("_total");
    }

    INVALID_NAME_CHARS.replace_all(&name, "_").into_owned()
}

/// With a single instance axis populated, the instance goes under the
/// plugin's name. With both, the type instance goes under `type`.
pub fn labels(sample: &Sample) -> Labels {
    let mut labels = Labels::new();

    if !sample.plugin_instance().is_empty() {
        labels.insert(sample.plugin().into(), sample.plugin_instance().into());
    }

    if !sample.type_instance().is_empty() {
        if sample.plugin_instance().is_empty() {
            labels.insert(sample.plugin().into(), sample.type_instance().into());
        } else {
            labels.insert(LABEL_TYPE.into(), sample.type_instance().into());
        }
    }

    labels.insert(LABEL_INSTANCE.into(), sample.host().into());
    labels
}

pub fn description(sample: &Sample, ds: &DataSource) -> String {
    format!(
        "Collectd_exporter: '{}'  Type: '{}' Dstype: '{}' Dsname: '{}'",
        sample.plugin(),
        sample.typ(),
        ds.kind(),
        ds.name()
    )
}
