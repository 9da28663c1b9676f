use std::collections::HashMap;

/// A categorical attribute and its domain, in first-seen order.
#[derive(Clone, Debug, PartialEq)]
pub struct NominalAttribute {
    pub name: String,
    pub values: Vec<String>,
    pub label_to_index: HashMap<String, usize>,
}

impl NominalAttribute {
    pub fn new(name: String) -> NominalAttribute {
        NominalAttribute {
            name,
            values: Vec::new(),
            label_to_index: HashMap::new(),
        }
    }

    pub fn with_values(name: String, values: Vec<String>) -> NominalAttribute {
        let mut attribute = NominalAttribute::new(name);
        for v in values {
            attribute.observe_value(&v);
        }
        attribute
    }

    /// Adds `v` to the domain if it is not there yet and returns its index.
    pub fn observe_value(&mut self, v: &str) -> usize {
        if let Some(&idx) = self.label_to_index.get(v) {
            return idx;
        }
        let idx = self.values.len();
        self.values.push(v.to_string());
        self.label_to_index.insert(v.to_string(), idx);
        idx
    }

    pub fn index_of_value(&self, v: &str) -> Option<usize> {
        self.label_to_index.get(v).copied()
    }

    pub fn contains(&self, v: &str) -> bool {
        self.label_to_index.contains_key(v)
    }

    pub fn domain_size(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_value_keeps_first_seen_order_and_dedups() {
        let mut a = NominalAttribute::new("colour".into());
        assert_eq!(a.observe_value("red"), 0);
        assert_eq!(a.observe_value("blue"), 1);
        assert_eq!(a.observe_value("red"), 0);
        assert_eq!(a.values, vec!["red", "blue"]);
        assert_eq!(a.domain_size(), 2);
        assert_eq!(a.index_of_value("blue"), Some(1));
        assert!(!a.contains("green"));
    }

    #[test]
    fn with_values_builds_index() {
        let a = NominalAttribute::with_values("o".into(), vec!["x".into(), "y".into(), "x".into()]);
        assert_eq!(a.domain_size(), 2);
        assert_eq!(a.values, vec!["x", "y"]);
    }
}
