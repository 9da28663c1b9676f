use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub class: String,
    /// Number of records truly in this class.
    pub support: usize,
    pub tp: usize,
    pub fp: usize,
    pub fn_: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Confusion-matrix based scores of one prediction column. The balanced
/// scores are unweighted means over the classes.
#[derive(Clone, Debug, Serialize)]
pub struct ClassificationMetrics {
    pub classes: Vec<String>,
    /// `confusion[true][predicted]`, indexed like `classes`.
    pub confusion: Vec<Vec<usize>>,
    pub total: usize,
    pub correct: usize,
    pub per_class: Vec<ClassMetrics>,
    pub balanced_precision: f64,
    pub balanced_recall: f64,
    pub balanced_f1: f64,
}

impl ClassificationMetrics {
    pub fn from_pairs<T: AsRef<str>, P: AsRef<str>>(pairs: &[(T, P)]) -> ClassificationMetrics {
        let classes: Vec<String> = pairs
            .iter()
            .flat_map(|(t, p)| [t.as_ref(), p.as_ref()])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();
        let index: HashMap<&str, usize> = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let n = classes.len();
        let mut confusion = vec![vec![0usize; n]; n];
        let mut correct = 0;
        for (t, p) in pairs {
            let (ti, pi) = (index[t.as_ref()], index[p.as_ref()]);
            confusion[ti][pi] += 1;
            if ti == pi {
                correct += 1;
            }
        }

        let per_class: Vec<ClassMetrics> = classes
            .iter()
            .enumerate()
            .map(|(c, class)| {
                let tp = confusion[c][c];
                let support: usize = confusion[c].iter().sum();
                let predicted: usize = confusion.iter().map(|row| row[c]).sum();
                let fp = predicted - tp;
                let fn_ = support - tp;
                let precision = ratio(tp, tp + fp);
                let recall = ratio(tp, tp + fn_);
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                ClassMetrics {
                    class: class.clone(),
                    support,
                    tp,
                    fp,
                    fn_,
                    precision,
                    recall,
                    f1,
                }
            })
            .collect();

        let mean = |f: fn(&ClassMetrics) -> f64| {
            if per_class.is_empty() {
                0.0
            } else {
                per_class.iter().map(f).sum::<f64>() / per_class.len() as f64
            }
        };

        ClassificationMetrics {
            balanced_precision: mean(|m| m.precision),
            balanced_recall: mean(|m| m.recall),
            balanced_f1: mean(|m| m.f1),
            classes,
            confusion,
            total: pairs.len(),
            correct,
            per_class,
        }
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.correct, self.total)
    }

    /// Tab-separated matrix with true classes as rows.
    pub fn confusion_to_string(&self) -> String {
        let mut out = String::from("Confusion matrix (rows=true, cols=pred):\n");
        out.push_str("true\\pred");
        for c in &self.classes {
            let _ = write!(out, "\t{c}");
        }
        out.push('\n');
        for (class, row) in self.classes.iter().zip(&self.confusion) {
            out.push_str(class);
            for count in row {
                let _ = write!(out, "\t{count}");
            }
            out.push('\n');
        }
        out
    }
}

#[inline]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}
