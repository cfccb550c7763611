mod mapper;

pub use mapper::{description, identifier, labels, metric_name, Identifier};
