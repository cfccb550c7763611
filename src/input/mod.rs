mod decoder;
mod line;
mod receiver;

pub use decoder::{Decoded, Decoder, JsonDecoder};
pub use line::{DelimReader, LineReader};
pub use receiver::{Receiver, ReceiverHandle, ReceiverStats};
