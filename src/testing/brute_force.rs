use crate::classifiers::Prediction;
use crate::core::attributes::Attribute;
use crate::core::{Dataset, Record, Value};
use crate::distance::{DistanceMode, DistanceSettings, NominalMetric};
use std::collections::{BTreeMap, BTreeSet};

/// RIA/RIONA recomputed from raw counts: its own value-class tables, numeric
/// ranges, distances and rule coverage, and no pruning. Panics on invalid
/// folds.
pub struct BruteForceRules {
    k: Option<usize>,
}

/// Statistics of one fold, kept as plain counts.
struct FoldTables {
    metric: NominalMetric,
    classes: Vec<String>,
    /// Per attribute: `(min, max)` for numeric, value → per-class counts for nominal.
    ranges: Vec<Option<(f64, f64)>>,
    counts: Vec<BTreeMap<String, Vec<u32>>>,
}

impl FoldTables {
    fn learn(dataset: &Dataset, settings: DistanceSettings, query: usize) -> FoldTables {
        let subset: Vec<&Record> = dataset
            .records()
            .iter()
            .enumerate()
            .filter(|&(i, _)| settings.mode == DistanceMode::Global || i != query)
            .map(|(_, r)| r)
            .collect();
        let classes: Vec<String> = subset
            .iter()
            .map(|r| r.label.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut ranges = Vec::new();
        let mut counts = Vec::new();
        for (j, attribute) in dataset.attributes().iter().enumerate() {
            let mut lo = f64::INFINITY;
            let mut hi = f64::NEG_INFINITY;
            let mut table: BTreeMap<String, Vec<u32>> = BTreeMap::new();
            for r in &subset {
                match &r.values[j] {
                    Value::Number(v) => {
                        lo = lo.min(*v);
                        hi = hi.max(*v);
                    }
                    Value::Category(v) => {
                        let c = classes.iter().position(|l| *l == r.label).expect("subset label");
                        table.entry(v.clone()).or_insert_with(|| vec![0; classes.len()])[c] += 1;
                    }
                    Value::Missing => {}
                }
            }
            match attribute {
                Attribute::Numeric(_) if lo.is_finite() => ranges.push(Some((lo, hi))),
                Attribute::Numeric(_) => ranges.push(Some((0.0, 0.0))),
                Attribute::Nominal(_) => ranges.push(None),
            }
            counts.push(table);
        }

        FoldTables {
            metric: settings.nominal_metric,
            classes,
            ranges,
            counts,
        }
    }

    fn penalty(&self) -> f64 {
        match self.metric {
            NominalMetric::Svdm => 2.0,
            NominalMetric::SvdmPrime => 1.0,
        }
    }

    fn term(&self, j: usize, a: &Value, b: &Value) -> f64 {
        if let Some((lo, hi)) = self.ranges[j] {
            return match (a, b) {
                (Value::Number(x), Value::Number(y)) => (x - y).abs() / (hi - lo).max(1e-12),
                _ => 1.0,
            };
        }

        let (Value::Category(x), Value::Category(y)) = (a, b) else {
            return self.penalty();
        };
        if x == y {
            return 0.0;
        }
        let (Some(cx), Some(cy)) = (self.counts[j].get(x), self.counts[j].get(y)) else {
            return self.penalty();
        };
        let tx: u32 = cx.iter().sum();
        let ty: u32 = cy.iter().sum();
        let sum: f64 = (0..self.classes.len())
            .map(|c| (cx[c] as f64 / tx as f64 - cy[c] as f64 / ty as f64).abs())
            .sum();
        let scaled = match self.metric {
            NominalMetric::Svdm => sum,
            NominalMetric::SvdmPrime => sum / 2.0,
        };
        scaled.min(self.penalty())
    }

    fn dist(&self, a: &Record, b: &Record) -> f64 {
        (0..a.values.len())
            .map(|j| self.term(j, &a.values[j], &b.values[j]))
            .sum()
    }

    /// Whether `x` lies in the most specific rule covering `q` and `c`.
    fn covers(&self, q: &Record, c: &Record, x: &Record) -> bool {
        (0..q.values.len()).all(|j| {
            let (qv, cv, xv) = (&q.values[j], &c.values[j], &x.values[j]);
            if qv.is_missing() || cv.is_missing() {
                return true;
            }
            if self.ranges[j].is_some() {
                match (qv, cv, xv) {
                    (Value::Number(a), Value::Number(b), Value::Number(v)) => {
                        a.min(*b) <= *v && *v <= a.max(*b)
                    }
                    _ => false,
                }
            } else {
                !xv.is_missing() && self.term(j, qv, xv) <= self.term(j, qv, cv)
            }
        })
    }
}

impl BruteForceRules {
    pub fn ria() -> Self {
        Self { k: None }
    }

    pub fn riona(k: usize) -> Self {
        Self { k: Some(k) }
    }

    pub fn predict(&self, dataset: &Dataset, query: usize, settings: DistanceSettings) -> Prediction {
        let tables = FoldTables::learn(dataset, settings, query);
        let q = dataset.record(query);

        let mut training: Vec<(f64, u64, usize)> = (0..dataset.len())
            .filter(|&i| i != query)
            .map(|i| {
                let r = dataset.record(i);
                (tables.dist(q, r), r.id, i)
            })
            .collect();
        training.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .expect("finite distances")
                .then(a.1.cmp(&b.1))
                .then(a.2.cmp(&b.2))
        });

        let k = self.k.map_or(training.len(), |k| k.max(1).min(training.len()));
        let neighbourhood: Vec<usize> = training[..k].iter().map(|&(_, _, i)| i).collect();

        let mut support: BTreeMap<&str, usize> = BTreeMap::new();
        let mut sizes: BTreeMap<&str, usize> = BTreeMap::new();
        for &c in &neighbourhood {
            let candidate = dataset.record(c);
            *sizes.entry(candidate.label.as_str()).or_default() += 1;

            let consistent = neighbourhood.iter().all(|&v| {
                let other = dataset.record(v);
                other.label == candidate.label || !tables.covers(q, candidate, other)
            });
            if consistent {
                *support.entry(candidate.label.as_str()).or_default() += 1;
            }
        }

        Prediction::from_support(q, &support, &sizes).expect("non-empty neighbourhood")
    }

    /// Distance between two records of `dataset` under the fold that holds
    /// out `query`.
    pub fn distance(dataset: &Dataset, query: usize, settings: DistanceSettings, a: usize, b: usize) -> f64 {
        FoldTables::learn(dataset, settings, query).dist(dataset.record(a), dataset.record(b))
    }
}
