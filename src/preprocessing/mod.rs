mod imputer;

pub use imputer::ClassConditionalImputer;
