pub mod classifiers;
pub mod config;
pub mod core;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod loaders;
pub mod output;
pub mod preprocessing;
pub mod rules;
pub mod tasks;
pub mod ui;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{Error, Result};
