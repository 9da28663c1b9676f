use crate::core::{Record, Value};
use crate::distance::{AttributeMetric, DistanceContext};

/// Per-attribute condition of a [`LocalRule`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Condition {
    /// Either the query or the candidate was missing: always satisfied.
    Star,
    /// Closed numeric interval spanned by the query and candidate values.
    Interval { lo: f64, hi: f64 },
    /// Nominal values within `radius` of the query value.
    Radius(f64),
}

/// The most specific rule covering both the query and one training record;
/// its decision is the training record's label.
#[derive(Debug)]
pub struct LocalRule<'a> {
    query: &'a Record,
    ctx: &'a DistanceContext,
    conditions: Vec<Condition>,
    decision: &'a str,
    slack: f64,
}

impl<'a> LocalRule<'a> {
    pub fn new(query: &'a Record, candidate: &'a Record, ctx: &'a DistanceContext) -> Self {
        let mut slack = 0.0;
        let conditions = ctx
            .metrics()
            .iter()
            .zip(query.values.iter().zip(&candidate.values))
            .map(|(metric, (q, c))| match metric {
                AttributeMetric::Numeric(stats) => match (q.as_number(), c.as_number()) {
                    (Some(a), Some(b)) => Condition::Interval {
                        lo: a.min(b),
                        hi: a.max(b),
                    },
                    (Some(a), None) => {
                        // the candidate pays 1.0 here, a covered record at most
                        // the distance to the far end of the learned range
                        let far = (a - stats.min).abs().max((a - stats.max).abs()) / stats.range;
                        slack += (far - 1.0).max(0.0);
                        Condition::Star
                    }
                    _ => Condition::Star,
                },
                AttributeMetric::Nominal(table) => {
                    if q.is_missing() || c.is_missing() {
                        Condition::Star
                    } else {
                        Condition::Radius(table.value_distance(q, c))
                    }
                }
            })
            .collect();

        Self {
            query,
            ctx,
            conditions,
            decision: &candidate.label,
            slack,
        }
    }

    /// Distance beyond which no record of the statistics subset can satisfy
    /// this rule, given the query-to-candidate distance. Every covered record
    /// is at most as far from the query as the candidate, except where the
    /// query has a numeric value outside the learned range and the candidate
    /// has none: there a covered record may pay up to the distance to the far
    /// end of the range instead of 1.0.
    pub fn pruning_bound(&self, candidate_distance: f64) -> f64 {
        if self.slack > 0.0 {
            // the covered record's sum is rounded in a different order
            (candidate_distance + self.slack) * (1.0 + 1e-12) + 1e-12
        } else {
            candidate_distance
        }
    }

    pub fn decision(&self) -> &'a str {
        self.decision
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// `true` when every attribute condition holds for `x`. A missing value
    /// in `x` fails every condition except a star.
    pub fn satisfies(&self, x: &Record) -> bool {
        self.conditions
            .iter()
            .enumerate()
            .all(|(j, condition)| match *condition {
                Condition::Star => true,
                Condition::Interval { lo, hi } => match x.values[j] {
                    Value::Number(v) => lo <= v && v <= hi,
                    _ => false,
                },
                Condition::Radius(radius) => {
                    let v = &x.values[j];
                    !v.is_missing()
                        && self.ctx.attribute_distance(j, &self.query.values[j], v) <= radius
                }
            })
    }
}
