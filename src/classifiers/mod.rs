mod classifier;
mod consistency;
mod knn;
mod neighbourhood;
mod prediction;
mod ria;
mod riona;

pub use classifier::{Classifier, check_fold, check_fold_context};
pub use consistency::{class_sizes, is_consistent, is_consistent_exhaustive, rule_support};
pub use knn::{KnnClassifier, KnnPrediction};
pub use neighbourhood::{Neighbour, clamp_k, rank_training_records};
pub use prediction::Prediction;
pub use ria::RiaClassifier;
pub use riona::RionaClassifier;
