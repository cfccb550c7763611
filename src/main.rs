use std::fs::File;
use std::io::{self, BufReader};

use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use collectd_exporter::cliopt::{CliOpt, Format};
use collectd_exporter::input::{DelimReader, JsonDecoder, LineReader, Receiver};
use collectd_exporter::output::{
    encoder::{Encoder, JsonEncoder, TextEncoder},
    LineWriter, Output,
};
use collectd_exporter::runner::Runner;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = CliOpt::from_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(if opt.verbose { "debug" } else { "info" })),
        )
        .with_writer(io::stderr)
        .init();

    let reader: Box<dyn LineReader> = match &opt.input {
        Some(path) => Box::new(DelimReader::new(BufReader::new(File::open(path)?))),
        None => Box::new(DelimReader::new(BufReader::new(io::stdin()))),
    };

    let encoder: Box<dyn Encoder> = match opt.format {
        Format::Text => Box::new(TextEncoder::new()),
        Format::Json => Box::new(JsonEncoder::new()),
    };

    let runner = Runner::new(
        Receiver::new(reader, Box::new(JsonDecoder::new())),
        Output::new(Box::new(LineWriter::new(io::stdout())), encoder),
        opt.now,
        opt.scrape_interval,
    );

    runner.run()?;

    Ok(())
}
