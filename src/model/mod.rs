mod family;
mod labels;
mod sample;
mod timestamp;

pub use family::*;
pub use labels::*;
pub use sample::*;
pub use timestamp::*;

pub type MetricName = String;

pub type SampleValue = f64;
