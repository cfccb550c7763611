mod decoder;
mod json;

pub use decoder::{Decoded, Decoder};
pub use json::JsonDecoder;
