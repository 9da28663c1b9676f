use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::{Display as StrumDisplay, EnumIter, EnumMessage, EnumString, IntoStaticStr};

use crate::distance::DistanceSettings;
use crate::error::Error;
use crate::loaders::LoadOptions;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    StrumDisplay,
    EnumIter,
    IntoStaticStr,
    EnumMessage,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum AlgorithmKind {
    #[default]
    #[strum(
        to_string = "knn",
        serialize = "k-nn",
        message = "k-NN",
        detailed_message = "majority vote of the k nearest records"
    )]
    Knn,
    #[strum(
        to_string = "ria",
        message = "RIA",
        detailed_message = "local rules over the whole training set, CId and NCId"
    )]
    Ria,
    #[strum(
        to_string = "riona",
        message = "RIONA",
        detailed_message = "local rules within the k nearest records, CId and NCId"
    )]
    Riona,
}

/// Neighbourhood size, either fixed or derived from the dataset size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KSpec {
    Fixed(usize),
    Log2N,
}

impl Default for KSpec {
    fn default() -> Self {
        KSpec::Fixed(3)
    }
}

impl KSpec {
    /// Concrete `k` for a dataset of `n` records, never below 1.
    pub fn resolve(self, n: usize) -> usize {
        match self {
            KSpec::Fixed(k) => k.max(1),
            KSpec::Log2N if n <= 1 => 1,
            KSpec::Log2N => ((n as f64).log2().round() as usize).max(1),
        }
    }

    /// The `k` part of output file names.
    pub fn tag(self) -> String {
        match self {
            KSpec::Fixed(k) => k.max(1).to_string(),
            KSpec::Log2N => "log2n".to_string(),
        }
    }
}

impl Display for KSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.tag())
    }
}

impl FromStr for KSpec {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(KSpec::default());
        }
        if trimmed.eq_ignore_ascii_case("log2n") || trimmed.eq_ignore_ascii_case("log2") {
            return Ok(KSpec::Log2N);
        }
        match trimmed.parse::<i64>() {
            Ok(k) if k < 1 => Ok(KSpec::Fixed(1)),
            Ok(k) => Ok(KSpec::Fixed(usize::try_from(k).unwrap_or(usize::MAX))),
            Err(_) => Err(Error::invalid_input(format!(
                "k must be a positive integer or 'log2n', got '{trimmed}'"
            ))),
        }
    }
}

impl Serialize for KSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            KSpec::Fixed(k) => serializer.serialize_u64(*k as u64),
            KSpec::Log2N => serializer.serialize_str("log2n"),
        }
    }
}

impl<'de> Deserialize<'de> for KSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        let parsed = match Raw::deserialize(deserializer)? {
            Raw::Int(k) => KSpec::from_str(&k.to_string()),
            Raw::Text(s) => KSpec::from_str(&s),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

/// One experiment as described by a JSON file, the command line or the
/// wizard. Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExperimentConfig {
    pub data: PathBuf,
    pub algorithm: AlgorithmKind,
    pub k: KSpec,
    pub distance: DistanceSettings,
    pub impute: bool,
    pub has_header: bool,
    pub separator: char,
    pub out_dir: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub stat: Option<PathBuf>,
    pub knn_out: Option<PathBuf>,
    /// kNN for k = 1, 3 and log2n plus RIONA in one go.
    pub all: bool,
    /// With `all`, run RIA as well.
    pub all_ria: bool,
    /// Worker threads; 0 leaves the choice to rayon.
    pub threads: usize,
    pub sample_frequency: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::new(),
            algorithm: AlgorithmKind::default(),
            k: KSpec::default(),
            distance: DistanceSettings::default(),
            impute: true,
            has_header: true,
            separator: ',',
            out_dir: None,
            out: None,
            stat: None,
            knn_out: None,
            all: false,
            all_ria: false,
            threads: 0,
            sample_frequency: 100,
        }
    }
}

impl ExperimentConfig {
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            separator: self.separator,
            has_header: self.has_header,
        }
    }
}
