use crate::core::Record;
use crate::distance::DistanceContext;

/// Sum of per-attribute contributions: normalised absolute difference for
/// numeric attributes (1.0 when either side is missing) and the learned SVDM
/// distance for nominal ones.
#[derive(Clone, Copy)]
pub struct MixedDistance<'a> {
    ctx: &'a DistanceContext,
}

impl<'a> MixedDistance<'a> {
    pub fn new(ctx: &'a DistanceContext) -> Self {
        Self { ctx }
    }

    #[inline]
    pub fn dist(&self, a: &Record, b: &Record) -> f64 {
        self.ctx
            .metrics()
            .iter()
            .zip(a.values.iter().zip(&b.values))
            .map(|(metric, (x, y))| metric.distance(x, y))
            .sum()
    }
}
