use std::collections::BTreeMap;

pub type LabelName = String;

pub type LabelValue = String;

// Ordered so that series render and compare deterministically.
pub type Labels = BTreeMap<LabelName, LabelValue>;

pub const LABEL_INSTANCE: &str = "instance";

pub const LABEL_TYPE: &str = "type";
