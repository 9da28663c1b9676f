use super::{NominalAttribute, NumericAttribute};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum AttributeKind {
    Numeric,
    Nominal,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Attribute {
    Numeric(NumericAttribute),
    Nominal(NominalAttribute),
}

impl Attribute {
    pub fn numeric(name: impl Into<String>) -> Attribute {
        Attribute::Numeric(NumericAttribute::new(name.into()))
    }

    pub fn nominal<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Attribute {
        Attribute::Nominal(NominalAttribute::with_values(
            name.into(),
            values.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn name(&self) -> &str {
        match self {
            Attribute::Numeric(a) => &a.name,
            Attribute::Nominal(a) => &a.name,
        }
    }

    pub fn kind(&self) -> AttributeKind {
        match self {
            Attribute::Numeric(_) => AttributeKind::Numeric,
            Attribute::Nominal(_) => AttributeKind::Nominal,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Attribute::Numeric(_))
    }

    pub fn as_nominal(&self) -> Option<&NominalAttribute> {
        match self {
            Attribute::Nominal(a) => Some(a),
            Attribute::Numeric(_) => None,
        }
    }
}
