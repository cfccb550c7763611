pub mod encoder;
mod output;
mod writer;

pub use output::Output;
pub use writer::{LineWriter, Writer};
