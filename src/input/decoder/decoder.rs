use crate::error::Result;
use crate::model::Sample;

/// One entry per value list found on a line. A malformed value list only
/// spoils its own entry.
pub type Decoded = Vec<Result<Sample>>;

/// Turns one line of input into the samples it carries. A line that cannot
/// be split into value lists at all fails as a whole.
pub trait Decoder: Send {
    fn decode(&self, buf: &[u8]) -> Result<Decoded>;
}
