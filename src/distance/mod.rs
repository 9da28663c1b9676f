mod context;
mod mixed;
mod settings;
mod svdm;

pub use context::{AttributeMetric, DistanceContext};
pub use mixed::MixedDistance;
pub use settings::{DistanceMode, DistanceSettings, MissingDistanceMode, NominalMetric};
pub use svdm::SvdmTable;
