mod leave_one_out;
mod metrics;
mod preview;

pub use leave_one_out::{LeaveOneOutEvaluator, LeaveOneOutRun, Scored};
pub use metrics::{ClassMetrics, ClassificationMetrics};
pub use preview::snapshot::Snapshot;
