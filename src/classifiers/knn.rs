use crate::classifiers::consistency::class_sizes;
use crate::classifiers::{Classifier, Neighbour, check_fold_context, clamp_k, rank_training_records};
use crate::core::Dataset;
use crate::distance::DistanceContext;
use crate::error::{Error, Result};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KnnPrediction {
    pub record_id: u64,
    pub true_label: String,
    pub predicted: String,
    /// The k nearest training records, closest first.
    pub neighbours: Vec<Neighbour>,
}

impl KnnPrediction {
    pub fn is_correct(&self) -> bool {
        self.predicted == self.true_label
    }
}

/// Majority vote among the `k` nearest training records.
#[derive(Clone, Copy, Debug)]
pub struct KnnClassifier {
    k: usize,
}

impl KnnClassifier {
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

impl Classifier for KnnClassifier {
    type Output = KnnPrediction;

    fn name(&self) -> String {
        format!("kNN(k={})", self.k)
    }

    fn predict_with_context(
        &self,
        dataset: &Dataset,
        excluded: usize,
        ctx: &DistanceContext,
    ) -> Result<KnnPrediction> {
        check_fold_context(dataset, excluded, ctx)?;

        let mut neighbours = rank_training_records(dataset, excluded, ctx);
        neighbours.truncate(clamp_k(self.k, neighbours.len()));

        // ascending label order, so `>` keeps the smallest label on ties
        let mut predicted: Option<(&str, usize)> = None;
        for (label, votes) in class_sizes(dataset, &neighbours) {
            if predicted.is_none_or(|(_, best)| votes > best) {
                predicted = Some((label, votes));
            }
        }
        let record = dataset.record(excluded);
        let Some((predicted, _)) = predicted else {
            return Err(Error::invalid_state(format!(
                "empty neighbourhood for record id {}",
                record.id
            )));
        };

        Ok(KnnPrediction {
            record_id: record.id,
            true_label: record.label.clone(),
            predicted: predicted.to_string(),
            neighbours,
        })
    }
}
