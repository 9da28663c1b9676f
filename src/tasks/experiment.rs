use crate::classifiers::{Classifier, KnnClassifier, Prediction, RiaClassifier, RionaClassifier};
use crate::config::{AlgorithmKind, ExperimentConfig, KSpec};
use crate::core::Dataset;
use crate::error::{Error, Result};
use crate::evaluation::{
    ClassificationMetrics, LeaveOneOutEvaluator, LeaveOneOutRun, Scored, Snapshot,
};
use crate::loaders::load_dataset;
use crate::output::naming::{dataset_tag, knn_path, out_path, run_tag, stat_path};
use crate::output::{PhaseTimings, StatReport, write_neighbours_file, write_out_file};
use crate::preprocessing::ClassConditionalImputer;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

/// One classifier pass over the dataset and where its files go.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedRun {
    pub algorithm: AlgorithmKind,
    pub k: KSpec,
    pub out: Option<PathBuf>,
    pub stat: Option<PathBuf>,
    pub knn_out: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct RunReport {
    pub algorithm: AlgorithmKind,
    pub k_tag: String,
    /// The `k` actually used; the training size for RIA.
    pub k: usize,
    /// CId accuracy for the rule classifiers, vote accuracy for kNN.
    pub accuracy: f64,
    pub nc_accuracy: Option<f64>,
    pub timings: PhaseTimings,
    pub cpu_time: Duration,
    pub written: Vec<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct ExperimentReport {
    pub dataset: String,
    pub records: usize,
    pub features: usize,
    pub load_time: Duration,
    pub impute_time: Duration,
    pub runs: Vec<RunReport>,
}

/// Loads the configured dataset once, then runs every planned leave-one-out
/// pass on it and writes the result files.
pub struct Experiment {
    config: ExperimentConfig,
    progress_tx: Option<Sender<Snapshot>>,
}

impl Experiment {
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        if config.data.as_os_str().is_empty() {
            return Err(Error::invalid_input("no dataset path given"));
        }
        if config.all && config.out_dir.is_none() {
            return Err(Error::invalid_input("batch mode needs an output directory"));
        }
        if config.all_ria && !config.all {
            return Err(Error::invalid_input("all_ria only applies together with all"));
        }
        let writes_rules =
            config.out.is_some() || config.stat.is_some() || config.out_dir.is_some();
        if !config.all && config.algorithm != AlgorithmKind::Knn && !writes_rules {
            return Err(Error::invalid_input(format!(
                "{} needs an OUT path, a STAT path or an output directory",
                config.algorithm
            )));
        }
        if config.sample_frequency == 0 {
            return Err(Error::invalid_input("sample_frequency must be > 0"));
        }
        Ok(Self {
            config,
            progress_tx: None,
        })
    }

    pub fn with_progress(mut self, tx: Sender<Snapshot>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Runs in execution order with their resolved output paths.
    pub fn plan(&self) -> Vec<PlannedRun> {
        let cfg = &self.config;
        let data_tag = dataset_tag(&cfg.data);
        let planned = |algorithm: AlgorithmKind, k: KSpec| {
            let dir = cfg.out_dir.as_deref();
            let tag = run_tag(&algorithm.to_string(), &data_tag, &k.tag(), &cfg.distance);
            let by_dir = |f: fn(&Path, &str) -> PathBuf| dir.map(|d| f(d, &tag));
            match algorithm {
                AlgorithmKind::Knn => PlannedRun {
                    algorithm,
                    k,
                    out: None,
                    stat: None,
                    knn_out: cfg.knn_out.clone().filter(|_| !cfg.all).or_else(|| by_dir(knn_path)),
                },
                AlgorithmKind::Ria | AlgorithmKind::Riona => PlannedRun {
                    algorithm,
                    k,
                    out: cfg.out.clone().filter(|_| !cfg.all).or_else(|| by_dir(out_path)),
                    stat: cfg.stat.clone().filter(|_| !cfg.all).or_else(|| by_dir(stat_path)),
                    knn_out: None,
                },
            }
        };

        if !cfg.all {
            return vec![planned(cfg.algorithm, cfg.k)];
        }

        let mut runs = vec![
            planned(AlgorithmKind::Knn, KSpec::Fixed(1)),
            planned(AlgorithmKind::Knn, KSpec::Fixed(3)),
            planned(AlgorithmKind::Knn, KSpec::Log2N),
            planned(AlgorithmKind::Riona, cfg.k),
        ];
        if cfg.all_ria {
            runs.push(planned(AlgorithmKind::Ria, cfg.k));
        }
        runs
    }

    pub fn run(&self) -> Result<ExperimentReport> {
        let cfg = &self.config;

        let start = Instant::now();
        let loaded = load_dataset(&cfg.data, cfg.load_options())?;
        let load_time = start.elapsed();

        let start = Instant::now();
        let dataset = if cfg.impute {
            ClassConditionalImputer.impute(&loaded)?
        } else {
            loaded
        };
        let impute_time = start.elapsed();

        let base = PhaseTimings {
            load: load_time,
            impute: impute_time,
            ..PhaseTimings::default()
        };

        let runs = self
            .plan()
            .iter()
            .map(|planned| self.execute(&dataset, planned, base))
            .collect::<Result<Vec<_>>>()?;

        Ok(ExperimentReport {
            dataset: dataset.name().to_string(),
            records: dataset.len(),
            features: dataset.number_of_attributes(),
            load_time,
            impute_time,
            runs,
        })
    }

    fn execute(&self, dataset: &Dataset, planned: &PlannedRun, base: PhaseTimings) -> Result<RunReport> {
        match planned.algorithm {
            AlgorithmKind::Knn => {
                let k = planned.k.resolve(dataset.len());
                self.execute_knn(dataset, planned, k, base)
            }
            AlgorithmKind::Ria => {
                self.execute_rules(RiaClassifier, dataset, planned, dataset.len().saturating_sub(1), base)
            }
            AlgorithmKind::Riona => {
                let k = planned.k.resolve(dataset.len());
                self.execute_rules(RionaClassifier::new(k), dataset, planned, k, base)
            }
        }
    }

    fn evaluate<C>(&self, classifier: C, dataset: &Dataset) -> Result<LeaveOneOutRun<C::Output>>
    where
        C: Classifier,
        C::Output: Scored,
    {
        let mut evaluator =
            LeaveOneOutEvaluator::new(classifier, self.config.distance, self.config.sample_frequency)?;
        if let Some(tx) = &self.progress_tx {
            evaluator = evaluator.with_progress(tx.clone());
        }
        evaluator.run(dataset)
    }

    fn execute_knn(
        &self,
        dataset: &Dataset,
        planned: &PlannedRun,
        k: usize,
        mut timings: PhaseTimings,
    ) -> Result<RunReport> {
        let run = self.evaluate(KnnClassifier::new(k), dataset)?;
        timings.context = run.context_time;
        timings.classify = run.classify_time;

        let mut written = Vec::new();
        let start = Instant::now();
        if let Some(path) = &planned.knn_out {
            write_neighbours_file(path, &run.outputs)?;
            written.push(path.clone());
        }
        timings.write = start.elapsed();

        Ok(RunReport {
            algorithm: planned.algorithm,
            k_tag: planned.k.tag(),
            k,
            accuracy: run.accuracy(),
            nc_accuracy: None,
            timings,
            cpu_time: run.cpu_time,
            written,
        })
    }

    fn execute_rules<C>(
        &self,
        classifier: C,
        dataset: &Dataset,
        planned: &PlannedRun,
        k: usize,
        mut timings: PhaseTimings,
    ) -> Result<RunReport>
    where
        C: Classifier<Output = Prediction>,
    {
        let run = self.evaluate(classifier, dataset)?;
        timings.context = run.context_time;
        timings.classify = run.classify_time;

        let start = Instant::now();
        let (c_id, nc_id) = rule_metrics(&run.outputs);
        timings.metrics = start.elapsed();

        let mut written = Vec::new();
        let start = Instant::now();
        if let Some(path) = &planned.out {
            write_out_file(path, dataset, &run.outputs)?;
            written.push(path.clone());
        }
        timings.write = start.elapsed();

        if let Some(path) = &planned.stat {
            let name = match planned.algorithm {
                AlgorithmKind::Ria => "RIA",
                _ => "RIONA",
            };
            let report = StatReport {
                title: format!("STAT_{name}"),
                meta: self.stat_meta(name, dataset, planned),
                timings,
                settings: self.config.distance,
                dataset,
                c_id: &c_id,
                nc_id: &nc_id,
            };
            report.write(path)?;
            written.push(path.clone());
        }

        Ok(RunReport {
            algorithm: planned.algorithm,
            k_tag: planned.k.tag(),
            k,
            accuracy: c_id.accuracy(),
            nc_accuracy: Some(nc_id.accuracy()),
            timings,
            cpu_time: run.cpu_time,
            written,
        })
    }

    fn stat_meta(&self, name: &str, dataset: &Dataset, planned: &PlannedRun) -> Vec<(String, String)> {
        let settings = &self.config.distance;
        [
            ("ALG", name.to_string()),
            ("DATA", self.config.data.display().to_string()),
            ("N", dataset.len().to_string()),
            ("FEATURES", dataset.number_of_attributes().to_string()),
            ("MODE", settings.mode.to_string()),
            ("NOMINAL_METRIC", settings.nominal_metric.to_string()),
            ("MISSING_MODE", settings.missing_mode.to_string()),
            ("K", planned.k.tag()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }
}

fn rule_metrics(predictions: &[Prediction]) -> (ClassificationMetrics, ClassificationMetrics) {
    let c_pairs: Vec<(&str, &str)> = predictions
        .iter()
        .map(|p| (p.true_label.as_str(), p.c_id.as_str()))
        .collect();
    let nc_pairs: Vec<(&str, &str)> = predictions
        .iter()
        .map(|p| (p.true_label.as_str(), p.nc_id.as_str()))
        .collect();
    (
        ClassificationMetrics::from_pairs(&c_pairs),
        ClassificationMetrics::from_pairs(&nc_pairs),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMode;
    use std::fs;
    use std::sync::mpsc;
    use tempfile::TempDir;

    const NURSERY_LIKE: &str = "\
a,b,n,class
x,p,1.0,A
x,q,2.0,A
y,p,?,B
y,q,4.0,B
x,p,1.5,A
y,p,3.5,A
x,q,0.5,A
y,q,?,B
";

    fn write_data(dir: &Path) -> PathBuf {
        let path = dir.join("toy.data");
        fs::write(&path, NURSERY_LIKE).unwrap();
        path
    }

    fn config(data: PathBuf) -> ExperimentConfig {
        ExperimentConfig {
            data,
            sample_frequency: 3,
            ..ExperimentConfig::default()
        }
    }

    #[test]
    fn rejects_inconsistent_configs() {
        assert!(Experiment::new(ExperimentConfig::default()).is_err());

        let mut cfg = config("x.data".into());
        cfg.all = true;
        assert!(matches!(Experiment::new(cfg), Err(Error::InvalidInput(_))));

        let mut cfg = config("x.data".into());
        cfg.all_ria = true;
        assert!(Experiment::new(cfg).is_err());
    }

    #[test]
    fn rule_runs_need_somewhere_to_write() {
        for algorithm in [AlgorithmKind::Ria, AlgorithmKind::Riona] {
            let mut cfg = config("x.data".into());
            cfg.algorithm = algorithm;
            assert!(matches!(Experiment::new(cfg.clone()), Err(Error::InvalidInput(_))));

            cfg.stat = Some("stat.txt".into());
            let plan = Experiment::new(cfg).unwrap().plan();
            assert_eq!(plan[0].out, None);
            assert_eq!(plan[0].stat, Some(PathBuf::from("stat.txt")));
        }

        let knn = config("x.data".into());
        assert!(Experiment::new(knn).is_ok());
    }

    #[test]
    fn explicit_paths_win_over_the_directory() {
        let mut cfg = config("data/toy.data".into());
        cfg.algorithm = AlgorithmKind::Riona;
        cfg.out_dir = Some("out".into());
        cfg.out = Some("mine.csv".into());

        let plan = Experiment::new(cfg).unwrap().plan();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].out, Some(PathBuf::from("mine.csv")));
        assert_eq!(
            plan[0].stat,
            Some(Path::new("out").join("STAT_riona_toy_k3_g_svdm_v1.txt"))
        );
        assert_eq!(plan[0].knn_out, None);
    }

    #[test]
    fn batch_plan_covers_knn_riona_and_ria() {
        let mut cfg = config("toy.data".into());
        cfg.all = true;
        cfg.all_ria = true;
        cfg.k = KSpec::Log2N;
        cfg.out_dir = Some("out".into());

        let plan = Experiment::new(cfg).unwrap().plan();
        let kinds: Vec<(AlgorithmKind, String)> =
            plan.iter().map(|p| (p.algorithm, p.k.tag())).collect();
        assert_eq!(
            kinds,
            vec![
                (AlgorithmKind::Knn, "1".to_string()),
                (AlgorithmKind::Knn, "3".to_string()),
                (AlgorithmKind::Knn, "log2n".to_string()),
                (AlgorithmKind::Riona, "log2n".to_string()),
                (AlgorithmKind::Ria, "log2n".to_string()),
            ]
        );
        assert_eq!(
            plan[2].knn_out,
            Some(Path::new("out").join("kNN_knn_toy_klog2n_g_svdm_v1.txt"))
        );
    }

    #[test]
    fn riona_run_writes_out_and_stat() {
        let dir = TempDir::new().unwrap();
        let mut cfg = config(write_data(dir.path()));
        cfg.algorithm = AlgorithmKind::Riona;
        cfg.distance.mode = DistanceMode::Local;
        cfg.out_dir = Some(dir.path().join("out"));

        let (tx, rx) = mpsc::channel();
        let report = Experiment::new(cfg).unwrap().with_progress(tx).run().unwrap();
        assert_eq!(report.records, 8);
        assert_eq!(report.features, 3);

        let run = &report.runs[0];
        assert_eq!(run.k, 3);
        assert!(run.nc_accuracy.is_some());
        assert_eq!(run.written.len(), 2);

        let out = fs::read_to_string(&run.written[0]).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("id,a,b,n,RId,CId,NCId"));
        assert_eq!(lines.count(), 8);
        // imputed before classification
        assert!(!out.contains(",,"));

        let stat = fs::read_to_string(&run.written[1]).unwrap();
        assert!(stat.starts_with("STAT_RIONA\n"));
        assert!(stat.contains("K: 3"));
        assert!(stat.contains("MODE: local"));

        let snaps: Vec<Snapshot> = rx.try_iter().collect();
        assert!(snaps.last().unwrap().is_final());
    }

    #[test]
    fn batch_run_writes_every_file() {
        let dir = TempDir::new().unwrap();
        let out_dir = dir.path().join("out");
        let mut cfg = config(write_data(dir.path()));
        cfg.all = true;
        cfg.all_ria = true;
        cfg.out_dir = Some(out_dir.clone());

        let report = Experiment::new(cfg).unwrap().run().unwrap();
        assert_eq!(report.runs.len(), 5);

        let mut names: Vec<String> = fs::read_dir(&out_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "OUT_ria_toy_k3_g_svdm_v1.csv",
                "OUT_riona_toy_k3_g_svdm_v1.csv",
                "STAT_ria_toy_k3_g_svdm_v1.txt",
                "STAT_riona_toy_k3_g_svdm_v1.txt",
                "kNN_knn_toy_k1_g_svdm_v1.txt",
                "kNN_knn_toy_k3_g_svdm_v1.txt",
                "kNN_knn_toy_klog2n_g_svdm_v1.txt",
            ]
        );

        let knn1 = fs::read_to_string(out_dir.join("kNN_knn_toy_k1_g_svdm_v1.txt")).unwrap();
        assert_eq!(knn1.lines().count(), 8);
        assert!(knn1.lines().all(|l| l.split(';').count() == 2));
    }

    #[test]
    fn knn_without_paths_only_reports() {
        let dir = TempDir::new().unwrap();
        let mut cfg = config(write_data(dir.path()));
        cfg.impute = false;
        cfg.k = KSpec::Fixed(1);

        let report = Experiment::new(cfg.clone()).unwrap().run().unwrap();
        let run = &report.runs[0];
        assert!(run.written.is_empty());
        assert_eq!(run.nc_accuracy, None);

        let ds = load_dataset(&cfg.data, cfg.load_options()).unwrap();
        let direct = LeaveOneOutEvaluator::new(KnnClassifier::new(1), cfg.distance, 1)
            .unwrap()
            .run(&ds)
            .unwrap();
        let hits = direct.outputs.iter().filter(|p| p.is_correct()).count();
        assert!((run.accuracy - hits as f64 / 8.0).abs() < 1e-12);
    }
}
