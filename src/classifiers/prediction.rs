use crate::core::Record;
use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of classifying one held-out record with a rule classifier.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Prediction {
    pub record_id: u64,
    pub true_label: String,
    /// Label with the most consistent rules.
    pub c_id: String,
    /// Label with the most consistent rules relative to its class size.
    pub nc_id: String,
    pub support: BTreeMap<String, usize>,
    pub normalized_support: BTreeMap<String, f64>,
}

impl Prediction {
    /// Derives both decisions from the consistent-rule tallies. Only labels
    /// with at least one member in `class_sizes` compete; ties go to the
    /// smallest label.
    pub fn from_support(
        record: &Record,
        support: &BTreeMap<&str, usize>,
        class_sizes: &BTreeMap<&str, usize>,
    ) -> Result<Prediction> {
        let mut counts = BTreeMap::new();
        let mut normalized = BTreeMap::new();
        for (&label, &size) in class_sizes.iter().filter(|&(_, &size)| size > 0) {
            let s = support.get(label).copied().unwrap_or(0);
            counts.insert(label.to_string(), s);
            normalized.insert(label.to_string(), s as f64 / size as f64);
        }

        let c_id = argmax(counts.iter().map(|(l, &s)| (l, s as f64)));
        let nc_id = argmax(normalized.iter().map(|(l, &s)| (l, s)));
        let (Some(c_id), Some(nc_id)) = (c_id, nc_id) else {
            return Err(Error::invalid_state(format!(
                "no class has members in the training set of record id {}",
                record.id
            )));
        };

        Ok(Prediction {
            record_id: record.id,
            true_label: record.label.clone(),
            c_id,
            nc_id,
            support: counts,
            normalized_support: normalized,
        })
    }

    pub fn c_id_correct(&self) -> bool {
        self.c_id == self.true_label
    }

    pub fn nc_id_correct(&self) -> bool {
        self.nc_id == self.true_label
    }
}

/// First maximum of an ascending label sequence.
fn argmax<'a>(scores: impl Iterator<Item = (&'a String, f64)>) -> Option<String> {
    let mut best: Option<(&String, f64)> = None;
    for (label, score) in scores {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((label, score)),
        }
    }
    best.map(|(label, _)| label.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        Record::new(4, vec![], "B")
    }

    #[test]
    fn raw_and_normalized_decisions_can_differ() {
        let support = BTreeMap::from([("A", 3), ("B", 2)]);
        let sizes = BTreeMap::from([("A", 6), ("B", 2)]);
        let p = Prediction::from_support(&record(), &support, &sizes).unwrap();
        assert_eq!(p.c_id, "A");
        assert_eq!(p.nc_id, "B");
        assert_eq!(p.normalized_support["A"], 0.5);
        assert_eq!(p.normalized_support["B"], 1.0);
        assert!(!p.c_id_correct());
        assert!(p.nc_id_correct());
    }

    #[test]
    fn ties_go_to_the_smallest_label() {
        let support = BTreeMap::from([("b", 1), ("a", 1), ("c", 0)]);
        let sizes = BTreeMap::from([("a", 1), ("b", 1), ("c", 1)]);
        let p = Prediction::from_support(&record(), &support, &sizes).unwrap();
        assert_eq!(p.c_id, "a");
        assert_eq!(p.nc_id, "a");
    }

    #[test]
    fn zero_support_still_yields_a_member_class() {
        let support = BTreeMap::new();
        let sizes = BTreeMap::from([("Z", 0), ("M", 2), ("N", 1)]);
        let p = Prediction::from_support(&record(), &support, &sizes).unwrap();
        assert_eq!(p.c_id, "M");
        assert_eq!(p.nc_id, "M");
        assert!(!p.support.contains_key("Z"));
    }

    #[test]
    fn no_member_classes_is_an_error() {
        let sizes = BTreeMap::new();
        let err = Prediction::from_support(&record(), &BTreeMap::new(), &sizes).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }
}
