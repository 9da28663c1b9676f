use crate::classifiers::consistency::{class_sizes, rule_support};
use crate::classifiers::{
    Classifier, Prediction, check_fold_context, clamp_k, rank_training_records,
};
use crate::core::Dataset;
use crate::distance::DistanceContext;
use crate::error::Result;

/// RIA restricted to the `k` nearest training records: they are both the
/// candidates and the verification set, and class sizes are counted among
/// them.
#[derive(Clone, Copy, Debug)]
pub struct RionaClassifier {
    k: usize,
}

impl RionaClassifier {
    /// `k` is clamped per query to `[1, training size]`.
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

impl Classifier for RionaClassifier {
    type Output = Prediction;

    fn name(&self) -> String {
        format!("RIONA(k={})", self.k)
    }

    fn predict_with_context(
        &self,
        dataset: &Dataset,
        excluded: usize,
        ctx: &DistanceContext,
    ) -> Result<Prediction> {
        check_fold_context(dataset, excluded, ctx)?;

        let mut ranked = rank_training_records(dataset, excluded, ctx);
        ranked.truncate(clamp_k(self.k, ranked.len()));

        let support = rule_support(dataset, excluded, &ranked, &ranked, ctx);
        let sizes = class_sizes(dataset, &ranked);

        Prediction::from_support(dataset.record(excluded), &support, &sizes)
    }
}
