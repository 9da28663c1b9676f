pub mod attributes;
mod dataset;
mod record;
mod value;

pub use dataset::Dataset;
pub use record::Record;
pub use value::Value;
