use crate::core::attributes::Attribute;
use crate::core::{Dataset, Record, Value};
use crate::error::Result;
use std::collections::{BTreeMap, HashMap};

/// Fills missing cells from records of the same class: the mean for numeric
/// attributes, the most frequent value for nominal ones.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassConditionalImputer;

impl ClassConditionalImputer {
    /// Returns a new dataset; `dataset` is left untouched. A class with no
    /// present value in a column falls back to 0.0 (numeric) or the first
    /// domain value (nominal); an empty domain leaves the cell missing.
    pub fn impute(&self, dataset: &Dataset) -> Result<Dataset> {
        let mut by_class: BTreeMap<&str, Vec<&Record>> = BTreeMap::new();
        for r in dataset.records() {
            by_class.entry(r.label.as_str()).or_default().push(r);
        }

        let fills: HashMap<&str, Vec<Value>> = by_class
            .iter()
            .map(|(&label, members)| {
                let row = dataset
                    .attributes()
                    .iter()
                    .enumerate()
                    .map(|(j, attribute)| class_fill(attribute, j, members))
                    .collect();
                (label, row)
            })
            .collect();

        let records = dataset
            .records()
            .iter()
            .map(|r| {
                if !r.has_missing() {
                    return r.clone();
                }
                let fill = &fills[r.label.as_str()];
                let values = r
                    .values
                    .iter()
                    .zip(fill)
                    .map(|(v, f)| if v.is_missing() { f.clone() } else { v.clone() })
                    .collect();
                Record::new(r.id, values, r.label.as_str())
            })
            .collect();

        dataset.with_records(records)
    }
}

fn class_fill(attribute: &Attribute, j: usize, members: &[&Record]) -> Value {
    match attribute {
        Attribute::Numeric(_) => {
            let (sum, count) = members
                .iter()
                .filter_map(|r| r.values[j].as_number())
                .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
            Value::Number(if count > 0 { sum / count as f64 } else { 0.0 })
        }
        Attribute::Nominal(domain) => {
            let mut counts = vec![0usize; domain.domain_size()];
            let mut first_seen: Vec<usize> = Vec::new();
            for r in members {
                if let Some(vi) = r.values[j].as_category().and_then(|v| domain.index_of_value(v)) {
                    if counts[vi] == 0 {
                        first_seen.push(vi);
                    }
                    counts[vi] += 1;
                }
            }

            let mut mode: Option<usize> = None;
            for &vi in &first_seen {
                if mode.is_none_or(|m| counts[vi] > counts[m]) {
                    mode = Some(vi);
                }
            }
            match mode.or_else(|| (domain.domain_size() > 0).then_some(0)) {
                Some(vi) => Value::category(domain.values[vi].as_str()),
                None => Value::Missing,
            }
        }
    }
}
