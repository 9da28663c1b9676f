mod attribute;
mod nominal_attribute;
mod numeric_attribute;

pub use attribute::{Attribute, AttributeKind};
pub use nominal_attribute::NominalAttribute;
pub use numeric_attribute::{MIN_RANGE, NumericAttribute, NumericStats};
