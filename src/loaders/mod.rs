mod arff;
mod csv;

pub use arff::{load_arff, parse_arff};
pub use csv::{CsvLoader, MISSING_TOKENS, is_missing_token};

use crate::core::Dataset;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for delimited text. ARFF files ignore them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    pub separator: char,
    pub has_header: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            separator: ',',
            has_header: true,
        }
    }
}

/// Loads `path` as ARFF when its extension says so, as delimited text
/// otherwise.
pub fn load_dataset(path: &Path, options: LoadOptions) -> Result<Dataset> {
    let is_arff = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("arff"));
    if is_arff {
        load_arff(path)
    } else {
        CsvLoader::new(options).load(path)
    }
}
