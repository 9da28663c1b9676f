use crate::classifiers::consistency::{class_sizes, rule_support};
use crate::classifiers::{Classifier, Prediction, check_fold_context, rank_training_records};
use crate::core::Dataset;
use crate::distance::DistanceContext;
use crate::error::Result;

/// Rule induction from all training records: every training record is a
/// candidate and the whole training set verifies its rule.
#[derive(Clone, Copy, Debug, Default)]
pub struct RiaClassifier;

impl Classifier for RiaClassifier {
    type Output = Prediction;

    fn name(&self) -> String {
        "RIA".into()
    }

    fn predict_with_context(
        &self,
        dataset: &Dataset,
        excluded: usize,
        ctx: &DistanceContext,
    ) -> Result<Prediction> {
        check_fold_context(dataset, excluded, ctx)?;

        let ranked = rank_training_records(dataset, excluded, ctx);
        let support = rule_support(dataset, excluded, &ranked, &ranked, ctx);
        let sizes = class_sizes(dataset, &ranked);

        Prediction::from_support(dataset.record(excluded), &support, &sizes)
    }
}
