use crate::core::Dataset;
use crate::distance::{DistanceContext, DistanceMode, DistanceSettings};
use crate::error::{Error, Result};

/// A single-query predictor evaluated by leave-one-out: the record at
/// `excluded` is the query and every other record is training data.
pub trait Classifier: Sync {
    type Output: Send;

    fn name(&self) -> String;

    /// Classifies the held-out record with an already built context. The
    /// context must come from `dataset` and, in local mode, leave out the
    /// same record.
    fn predict_with_context(
        &self,
        dataset: &Dataset,
        excluded: usize,
        ctx: &DistanceContext,
    ) -> Result<Self::Output>;

    /// Builds the fold's context and classifies the held-out record.
    fn predict_loo(
        &self,
        dataset: &Dataset,
        excluded: usize,
        settings: DistanceSettings,
    ) -> Result<Self::Output> {
        check_fold(dataset, excluded)?;
        let ctx = DistanceContext::build(dataset, settings, Some(excluded))?;
        self.predict_with_context(dataset, excluded, &ctx)
    }
}

/// Validates a leave-one-out fold before any distance is computed.
pub fn check_fold(dataset: &Dataset, excluded: usize) -> Result<()> {
    if dataset.len() < 2 {
        return Err(Error::invalid_input(format!(
            "leave-one-out needs at least two records, dataset '{}' has {}",
            dataset.name(),
            dataset.len()
        )));
    }
    if excluded >= dataset.len() {
        return Err(Error::invalid_input(format!(
            "held-out index {excluded} is outside a dataset of {} records",
            dataset.len()
        )));
    }
    Ok(())
}

/// [`check_fold`] plus the context/fold agreement checks.
pub fn check_fold_context(
    dataset: &Dataset,
    excluded: usize,
    ctx: &DistanceContext,
) -> Result<()> {
    check_fold(dataset, excluded)?;
    ctx.ensure_compatible(dataset)?;
    if ctx.settings().mode == DistanceMode::Local && ctx.left_out() != Some(excluded) {
        return Err(Error::invalid_state(format!(
            "local context leaves out {:?} but the query is record #{excluded}",
            ctx.left_out()
        )));
    }
    Ok(())
}
