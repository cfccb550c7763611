use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use structopt::StructOpt;

use crate::error::{Error, Result};
use crate::model::{parse_rfc3339, Timestamp};
use crate::utils::parse_duration;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "collectd-exporter",
    about = "Reads collectd JSON value lists and prints them as Prometheus metrics"
)]
pub struct CliOpt {
    /// Read value lists from a file instead of stdin.
    #[structopt(long = "input", short = "i", parse(from_os_str))]
    pub input: Option<PathBuf>,

    /// Exposition format: text or json.
    #[structopt(long = "format", short = "f", default_value = "text")]
    pub format: Format,

    /// Evaluate staleness at this RFC 3339 instant instead of the wall clock.
    #[structopt(long = "now", short = "n", parse(try_from_str = parse_rfc3339))]
    pub now: Option<Timestamp>,

    /// Also scrape periodically while input is flowing (e.g. 15s, 1m30s).
    #[structopt(long = "scrape-interval", short = "s", parse(try_from_str = parse_duration))]
    pub scrape_interval: Option<Duration>,

    #[structopt(long = "verbose", short = "v")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            _ => Err(Error::from(format!("unknown format '{}'", s))),
        }
    }
}
