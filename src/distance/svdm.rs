use crate::core::Value;
use crate::core::attributes::NominalAttribute;
use crate::distance::{MissingDistanceMode, NominalMetric};
use std::collections::HashMap;

/// Value → class frequency table of one nominal attribute, learned from the
/// statistics subset of a fold, and the SVDM distance derived from it.
#[derive(Clone, Debug)]
pub struct SvdmTable {
    value_index: HashMap<String, usize>,
    value_class_counts: Vec<Vec<u32>>,
    value_totals: Vec<u32>,
    metric: NominalMetric,
    missing_mode: MissingDistanceMode,
}

impl SvdmTable {
    pub fn new(
        domain: &NominalAttribute,
        number_of_classes: usize,
        metric: NominalMetric,
        missing_mode: MissingDistanceMode,
    ) -> SvdmTable {
        let n_values = domain.domain_size();
        SvdmTable {
            value_index: domain.label_to_index.clone(),
            value_class_counts: vec![vec![0; number_of_classes]; n_values],
            value_totals: vec![0; n_values],
            metric,
            missing_mode,
        }
    }

    /// Counts one statistics row. Values outside the domain are ignored, like
    /// missing ones, since they can never be looked up.
    pub fn observe(&mut self, value: &Value, class_index: usize) {
        let Some(v) = value.as_category() else {
            return;
        };
        let Some(&vi) = self.value_index.get(v) else {
            return;
        };
        self.value_class_counts[vi][class_index] += 1;
        self.value_totals[vi] += 1;
    }

    pub fn number_of_classes(&self) -> usize {
        self.value_class_counts.first().map_or(0, Vec::len)
    }

    /// Row of `v` if the statistics subset contained it at least once.
    #[inline]
    fn observed_row(&self, v: &str) -> Option<usize> {
        let vi = *self.value_index.get(v)?;
        (self.value_totals[vi] > 0).then_some(vi)
    }

    /// `P(class | value)`, or `None` for a value with no observations.
    pub fn class_probability(&self, v: &str, class_index: usize) -> Option<f64> {
        let vi = self.observed_row(v)?;
        let count = *self.value_class_counts[vi].get(class_index)?;
        Some(count as f64 / self.value_totals[vi] as f64)
    }

    /// Learned distance between two nominal cells. Missing or unobserved
    /// operands cost the metric's penalty; equal values cost nothing.
    pub fn value_distance(&self, a: &Value, b: &Value) -> f64 {
        let (Some(x), Some(y)) = (a.as_category(), b.as_category()) else {
            return self.missing_mode.missing_penalty(self.metric);
        };
        if x == y {
            return 0.0;
        }
        let (Some(xi), Some(yi)) = (self.observed_row(x), self.observed_row(y)) else {
            return self.metric.penalty();
        };

        let tx = self.value_totals[xi] as f64;
        let ty = self.value_totals[yi] as f64;
        let sum: f64 = self.value_class_counts[xi]
            .iter()
            .zip(&self.value_class_counts[yi])
            .map(|(&cx, &cy)| (cx as f64 / tx - cy as f64 / ty).abs())
            .sum();

        // rounding can push the sum past 2.0 by an ulp
        self.metric.scale(sum).min(self.metric.penalty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPS: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= EPS
    }

    fn colour_table(metric: NominalMetric) -> SvdmTable {
        let domain = NominalAttribute::with_values(
            "colour".into(),
            vec!["red".into(), "blue".into(), "green".into()],
        );
        let mut t = SvdmTable::new(&domain, 2, metric, MissingDistanceMode::Variant1);
        // red: 3 x c0, 1 x c1; blue: 1 x c0, 3 x c1; green never seen
        for _ in 0..3 {
            t.observe(&Value::category("red"), 0);
            t.observe(&Value::category("blue"), 1);
        }
        t.observe(&Value::category("red"), 1);
        t.observe(&Value::category("blue"), 0);
        t.observe(&Value::Missing, 0);
        t
    }

    #[test]
    fn conditional_probabilities() {
        let t = colour_table(NominalMetric::Svdm);
        assert!(approx_eq(t.class_probability("red", 0).unwrap(), 0.75));
        assert!(approx_eq(t.class_probability("blue", 0).unwrap(), 0.25));
        assert!(t.class_probability("green", 0).is_none());
        assert!(approx_eq(t.class_probability("red", 1).unwrap(), 0.25));
        assert_eq!(t.number_of_classes(), 2);
    }

    #[test]
    fn svdm_and_prime_distances() {
        let red = Value::category("red");
        let blue = Value::category("blue");

        let t = colour_table(NominalMetric::Svdm);
        assert!(approx_eq(t.value_distance(&red, &blue), 1.0));
        assert!(approx_eq(t.value_distance(&blue, &red), 1.0));
        assert_eq!(t.value_distance(&red, &red), 0.0);

        let p = colour_table(NominalMetric::SvdmPrime);
        assert!(approx_eq(p.value_distance(&red, &blue), 0.5));
    }

    #[test]
    fn missing_and_unseen_cost_the_penalty() {
        let red = Value::category("red");
        let green = Value::category("green");

        let t = colour_table(NominalMetric::Svdm);
        assert_eq!(t.value_distance(&red, &Value::Missing), 2.0);
        assert_eq!(t.value_distance(&Value::Missing, &Value::Missing), 2.0);
        assert_eq!(t.value_distance(&red, &green), 2.0);
        assert_eq!(t.value_distance(&green, &green), 0.0);

        let p = colour_table(NominalMetric::SvdmPrime);
        assert_eq!(p.value_distance(&Value::Missing, &red), 1.0);
        assert_eq!(p.value_distance(&green, &red), 1.0);
    }
}
