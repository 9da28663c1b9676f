mod local_rule;

pub use local_rule::{Condition, LocalRule};
