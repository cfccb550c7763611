mod encoder;
mod json;
mod text;

pub use encoder::Encoder;
pub use json::JsonEncoder;
pub use text::TextEncoder;
