use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumMessage, EnumString, IntoStaticStr};

/// Which records feed the fold statistics.
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
    Display,
    EnumIter,
    IntoStaticStr,
    EnumMessage,
)]
#[strum(ascii_case_insensitive)]
pub enum DistanceMode {
    /// One context over all records, shared by every fold.
    #[default]
    #[serde(rename = "global", alias = "g")]
    #[strum(
        to_string = "global",
        serialize = "g",
        message = "Global",
        detailed_message = "statistics over the whole dataset, built once"
    )]
    Global,
    /// Rebuilt per fold without the held-out record.
    #[serde(rename = "local", alias = "l")]
    #[strum(
        to_string = "local",
        serialize = "l",
        message = "Local",
        detailed_message = "statistics rebuilt per query without the held-out record"
    )]
    Local,
}

impl DistanceMode {
    pub fn tag(self) -> &'static str {
        match self {
            DistanceMode::Global => "g",
            DistanceMode::Local => "l",
        }
    }
}

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
    Display,
    EnumIter,
    IntoStaticStr,
    EnumMessage,
)]
#[strum(ascii_case_insensitive)]
pub enum NominalMetric {
    #[default]
    #[serde(rename = "svdm")]
    #[strum(
        to_string = "svdm",
        message = "SVDM",
        detailed_message = "sum of class-conditional probability differences, in [0, 2]"
    )]
    Svdm,
    #[serde(rename = "svdm-prime", alias = "svdmprime")]
    #[strum(
        to_string = "svdm-prime",
        serialize = "svdmprime",
        serialize = "svdm'",
        message = "SVDM'",
        detailed_message = "SVDM halved, in [0, 1]"
    )]
    SvdmPrime,
}

impl NominalMetric {
    pub fn tag(self) -> &'static str {
        match self {
            NominalMetric::Svdm => "svdm",
            NominalMetric::SvdmPrime => "svdmprime",
        }
    }

    /// Distance charged for a missing or unobserved nominal value.
    #[inline]
    pub fn penalty(self) -> f64 {
        match self {
            NominalMetric::Svdm => 2.0,
            NominalMetric::SvdmPrime => 1.0,
        }
    }

    #[inline]
    pub(crate) fn scale(self, sum: f64) -> f64 {
        match self {
            NominalMetric::Svdm => sum,
            NominalMetric::SvdmPrime => sum / 2.0,
        }
    }
}

/// Missing-value policy for nominal distances. Both variants currently charge
/// the metric's full penalty.
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
    Display,
    EnumIter,
    IntoStaticStr,
    EnumMessage,
)]
#[strum(ascii_case_insensitive)]
pub enum MissingDistanceMode {
    #[default]
    #[serde(rename = "v1", alias = "variant1")]
    #[strum(to_string = "v1", serialize = "variant1", message = "Variant 1")]
    Variant1,
    #[serde(rename = "v2", alias = "variant2")]
    #[strum(to_string = "v2", serialize = "variant2", message = "Variant 2")]
    Variant2,
}

impl MissingDistanceMode {
    pub fn tag(self) -> &'static str {
        match self {
            MissingDistanceMode::Variant1 => "v1",
            MissingDistanceMode::Variant2 => "v2",
        }
    }

    #[inline]
    pub(crate) fn missing_penalty(self, metric: NominalMetric) -> f64 {
        match self {
            MissingDistanceMode::Variant1 | MissingDistanceMode::Variant2 => metric.penalty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceSettings {
    pub mode: DistanceMode,
    pub nominal_metric: NominalMetric,
    pub missing_mode: MissingDistanceMode,
}

impl DistanceSettings {
    pub fn new(
        mode: DistanceMode,
        nominal_metric: NominalMetric,
        missing_mode: MissingDistanceMode,
    ) -> Self {
        Self {
            mode,
            nominal_metric,
            missing_mode,
        }
    }
}
