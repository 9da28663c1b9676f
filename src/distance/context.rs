use crate::core::attributes::{Attribute, NumericStats};
use crate::core::{Dataset, Value};
use crate::distance::{DistanceMode, DistanceSettings, SvdmTable};
use crate::error::{Error, Result};
use std::collections::{BTreeSet, HashMap};

/// Learned per-attribute distance component.
#[derive(Clone, Debug)]
pub enum AttributeMetric {
    Numeric(NumericStats),
    Nominal(SvdmTable),
}

impl AttributeMetric {
    /// Contribution of one attribute to the mixed distance.
    #[inline]
    pub fn distance(&self, a: &Value, b: &Value) -> f64 {
        match self {
            AttributeMetric::Numeric(stats) => match (a.as_number(), b.as_number()) {
                (Some(x), Some(y)) => (x - y).abs() / stats.range,
                _ => 1.0,
            },
            AttributeMetric::Nominal(table) => table.value_distance(a, b),
        }
    }
}

/// Fold-scoped distance statistics. Owns only the learned tables; records
/// stay in the [`Dataset`] they were built from.
#[derive(Clone, Debug)]
pub struct DistanceContext {
    settings: DistanceSettings,
    metrics: Vec<AttributeMetric>,
    leave_out: Option<usize>,
}

impl DistanceContext {
    /// Learns numeric ranges and SVDM tables from `dataset`. In
    /// [`DistanceMode::Local`] the record at `leave_out` is excluded from the
    /// statistics; in [`DistanceMode::Global`] `leave_out` is ignored.
    pub fn build(
        dataset: &Dataset,
        settings: DistanceSettings,
        leave_out: Option<usize>,
    ) -> Result<DistanceContext> {
        if let Some(i) = leave_out
            && i >= dataset.len()
        {
            return Err(Error::invalid_input(format!(
                "leave-out index {i} is outside a dataset of {} records",
                dataset.len()
            )));
        }

        let leave_out = match settings.mode {
            DistanceMode::Local => leave_out,
            DistanceMode::Global => None,
        };
        let subset: Vec<usize> = (0..dataset.len())
            .filter(|&i| Some(i) != leave_out)
            .collect();

        let classes: BTreeSet<&str> = subset
            .iter()
            .map(|&i| dataset.record(i).label.as_str())
            .collect();
        let class_index: HashMap<&str, usize> = classes
            .iter()
            .enumerate()
            .map(|(k, &c)| (c, k))
            .collect();

        let metrics = dataset
            .attributes()
            .iter()
            .enumerate()
            .map(|(j, attribute)| match attribute {
                Attribute::Numeric(_) => {
                    AttributeMetric::Numeric(NumericStats::from_values(subset.iter().filter_map(
                        |&i| dataset.record(i).values[j].as_number(),
                    )))
                }
                Attribute::Nominal(domain) => {
                    let mut table = SvdmTable::new(
                        domain,
                        classes.len(),
                        settings.nominal_metric,
                        settings.missing_mode,
                    );
                    for &i in &subset {
                        let record = dataset.record(i);
                        table.observe(&record.values[j], class_index[record.label.as_str()]);
                    }
                    AttributeMetric::Nominal(table)
                }
            })
            .collect();

        Ok(DistanceContext {
            settings,
            metrics,
            leave_out,
        })
    }

    pub fn settings(&self) -> DistanceSettings {
        self.settings
    }

    /// The record excluded from the statistics, if any.
    pub fn left_out(&self) -> Option<usize> {
        self.leave_out
    }

    pub fn metrics(&self) -> &[AttributeMetric] {
        &self.metrics
    }

    pub fn numeric_stats(&self, j: usize) -> Option<&NumericStats> {
        match self.metrics.get(j)? {
            AttributeMetric::Numeric(stats) => Some(stats),
            AttributeMetric::Nominal(_) => None,
        }
    }

    pub fn svdm_table(&self, j: usize) -> Option<&SvdmTable> {
        match self.metrics.get(j)? {
            AttributeMetric::Nominal(table) => Some(table),
            AttributeMetric::Numeric(_) => None,
        }
    }

    /// Distance contributed by attribute `j` for the cells `a` and `b`.
    #[inline]
    pub fn attribute_distance(&self, j: usize, a: &Value, b: &Value) -> f64 {
        self.metrics[j].distance(a, b)
    }

    /// Fails when `dataset` does not have the attribute layout this context
    /// learned its tables for.
    pub fn ensure_compatible(&self, dataset: &Dataset) -> Result<()> {
        if dataset.number_of_attributes() != self.metrics.len() {
            return Err(Error::invalid_state(format!(
                "distance context holds {} attribute tables but the dataset has {} attributes",
                self.metrics.len(),
                dataset.number_of_attributes()
            )));
        }

        for (j, (attribute, metric)) in dataset.attributes().iter().zip(&self.metrics).enumerate() {
            let matches = matches!(
                (attribute, metric),
                (Attribute::Numeric(_), AttributeMetric::Numeric(_))
                    | (Attribute::Nominal(_), AttributeMetric::Nominal(_))
            );
            if !matches {
                return Err(Error::invalid_state(format!(
                    "no learned {} table for attribute #{j} '{}'",
                    attribute.kind(),
                    attribute.name()
                )));
            }
        }

        Ok(())
    }
}
