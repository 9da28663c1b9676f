mod experiment;

pub use experiment::{Experiment, ExperimentReport, PlannedRun, RunReport};
