use crate::classifiers::{Classifier, KnnPrediction, Prediction, check_fold};
use crate::core::Dataset;
use crate::distance::{DistanceContext, DistanceMode, DistanceSettings};
use crate::error::{Error, Result};
use crate::evaluation::Snapshot;
use cpu_time::ProcessTime;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

/// Per-query output that can be scored against its true label.
pub trait Scored {
    /// Whether the main decision is correct.
    fn primary_correct(&self) -> bool;

    /// Whether the alternative decision is correct, for outputs that have one.
    fn secondary_correct(&self) -> Option<bool> {
        None
    }
}

impl Scored for Prediction {
    fn primary_correct(&self) -> bool {
        self.c_id_correct()
    }

    fn secondary_correct(&self) -> Option<bool> {
        Some(self.nc_id_correct())
    }
}

impl Scored for KnnPrediction {
    fn primary_correct(&self) -> bool {
        self.is_correct()
    }
}

/// Outputs in record order plus the timings of the run.
#[derive(Debug)]
pub struct LeaveOneOutRun<T> {
    pub outputs: Vec<T>,
    /// Building the shared context; zero in local mode, where every fold
    /// builds its own.
    pub context_time: Duration,
    pub classify_time: Duration,
    pub cpu_time: Duration,
}

impl<T: Scored> LeaveOneOutRun<T> {
    pub fn accuracy(&self) -> f64 {
        if self.outputs.is_empty() {
            return 0.0;
        }
        let hits = self.outputs.iter().filter(|o| o.primary_correct()).count();
        hits as f64 / self.outputs.len() as f64
    }
}

/// Runs a classifier once per record, holding that record out, on the rayon
/// pool. Folds are independent; the first failing fold aborts the run.
pub struct LeaveOneOutEvaluator<C> {
    classifier: C,
    settings: DistanceSettings,
    sample_frequency: u64,
    progress_tx: Option<Sender<Snapshot>>,
}

impl<C> LeaveOneOutEvaluator<C>
where
    C: Classifier,
    C::Output: Scored,
{
    pub fn new(classifier: C, settings: DistanceSettings, sample_frequency: u64) -> Result<Self> {
        if sample_frequency == 0 {
            return Err(Error::invalid_input("sample_frequency must be > 0"));
        }
        Ok(Self {
            classifier,
            settings,
            sample_frequency,
            progress_tx: None,
        })
    }

    pub fn with_progress(mut self, tx: Sender<Snapshot>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn settings(&self) -> DistanceSettings {
        self.settings
    }

    pub fn run(&self, dataset: &Dataset) -> Result<LeaveOneOutRun<C::Output>> {
        check_fold(dataset, 0)?;

        let start = Instant::now();
        let start_cpu = ProcessTime::now();

        let shared = match self.settings.mode {
            DistanceMode::Global => Some(DistanceContext::build(dataset, self.settings, None)?),
            DistanceMode::Local => None,
        };
        let context_time = start.elapsed();

        let progress = Progress::new(self.classifier.name(), dataset.len() as u64, start);
        let classify_start = Instant::now();

        let outputs = (0..dataset.len())
            .into_par_iter()
            .map(|i| {
                let output = match &shared {
                    Some(ctx) => self.classifier.predict_with_context(dataset, i, ctx)?,
                    None => self.classifier.predict_loo(dataset, i, self.settings)?,
                };
                let seen = progress.record(&output);
                if seen % self.sample_frequency == 0 {
                    self.push_snapshot(&progress);
                }
                Ok(output)
            })
            .collect::<Result<Vec<_>>>()?;

        let classify_time = classify_start.elapsed();
        self.push_snapshot(&progress);

        Ok(LeaveOneOutRun {
            outputs,
            context_time,
            classify_time,
            cpu_time: start_cpu.elapsed(),
        })
    }

    fn push_snapshot(&self, progress: &Progress) {
        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(progress.snapshot());
        }
    }
}

struct Progress {
    algorithm: String,
    total: u64,
    start: Instant,
    seen: AtomicU64,
    hits: AtomicU64,
    secondary_hits: AtomicU64,
    has_secondary: AtomicBool,
}

impl Progress {
    fn new(algorithm: String, total: u64, start: Instant) -> Self {
        Self {
            algorithm,
            total,
            start,
            seen: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            secondary_hits: AtomicU64::new(0),
            has_secondary: AtomicBool::new(false),
        }
    }

    /// Counts one finished query and returns how many are done.
    fn record<T: Scored>(&self, output: &T) -> u64 {
        if output.primary_correct() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        if let Some(correct) = output.secondary_correct() {
            self.has_secondary.store(true, Ordering::Relaxed);
            if correct {
                self.secondary_hits.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.seen.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn snapshot(&self) -> Snapshot {
        let seen = self.seen.load(Ordering::Relaxed);
        let rate = |hits: &AtomicU64| {
            if seen == 0 {
                f64::NAN
            } else {
                hits.load(Ordering::Relaxed) as f64 / seen as f64
            }
        };

        let mut extras = BTreeMap::new();
        if self.has_secondary.load(Ordering::Relaxed) {
            extras.insert("accuracy_nc".to_string(), rate(&self.secondary_hits));
        }

        Snapshot {
            algorithm: self.algorithm.clone(),
            instances_seen: seen,
            total: self.total,
            accuracy: rate(&self.hits),
            seconds: self.start.elapsed().as_secs_f64(),
            extras,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::{KnnClassifier, RiaClassifier, RionaClassifier};
    use crate::testing::fixtures;
    use std::sync::mpsc;

    #[test]
    fn outputs_follow_record_order() {
        let ds = fixtures::random_mixed_dataset(4, 25, 0.1);
        for mode in [DistanceMode::Global, DistanceMode::Local] {
            let settings = DistanceSettings {
                mode,
                ..DistanceSettings::default()
            };
            let run = LeaveOneOutEvaluator::new(RionaClassifier::new(3), settings, 1)
                .unwrap()
                .run(&ds)
                .unwrap();
            let ids: Vec<u64> = run.outputs.iter().map(|p| p.record_id).collect();
            let expected: Vec<u64> = ds.records().iter().map(|r| r.id).collect();
            assert_eq!(ids, expected);

            for (i, p) in run.outputs.iter().enumerate() {
                let direct = RionaClassifier::new(3).predict_loo(&ds, i, settings).unwrap();
                assert_eq!(*p, direct);
            }
        }
    }

    #[test]
    fn progress_ends_with_a_final_snapshot() {
        let ds = fixtures::random_mixed_dataset(6, 12, 0.0);
        let (tx, rx) = mpsc::channel();
        let run = LeaveOneOutEvaluator::new(RiaClassifier, DistanceSettings::default(), 5)
            .unwrap()
            .with_progress(tx)
            .run(&ds)
            .unwrap();

        let snaps: Vec<Snapshot> = rx.try_iter().collect();
        // two periodic samples (5, 10) plus the closing one
        assert_eq!(snaps.len(), 3);
        let last = snaps.last().unwrap();
        assert!(last.is_final());
        assert_eq!(last.algorithm, "RIA");
        assert!((last.accuracy - run.accuracy()).abs() < 1e-12);
        assert!(last.extras.contains_key("accuracy_nc"));
    }

    #[test]
    fn knn_snapshots_have_no_secondary_accuracy() {
        let ds = fixtures::random_mixed_dataset(2, 8, 0.0);
        let (tx, rx) = mpsc::channel();
        LeaveOneOutEvaluator::new(KnnClassifier::new(3), DistanceSettings::default(), 100)
            .unwrap()
            .with_progress(tx)
            .run(&ds)
            .unwrap();
        let snaps: Vec<Snapshot> = rx.try_iter().collect();
        assert_eq!(snaps.len(), 1);
        assert!(snaps[0].extras.is_empty());
    }

    #[test]
    fn rejects_zero_sample_frequency_and_tiny_datasets() {
        assert!(LeaveOneOutEvaluator::new(RiaClassifier, DistanceSettings::default(), 0).is_err());

        let ds = fixtures::two_nominal_scenario();
        let one = ds.with_records(vec![ds.record(0).clone()]).unwrap();
        let err = LeaveOneOutEvaluator::new(RiaClassifier, DistanceSettings::default(), 1)
            .unwrap()
            .run(&one)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
