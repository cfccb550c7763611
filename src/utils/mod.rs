mod duration;
mod parse;

pub use duration::parse_duration;
