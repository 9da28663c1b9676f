/// Smallest range a numeric attribute may have; keeps the normalisation
/// division finite for constant columns.
pub const MIN_RANGE: f64 = 1e-12;

#[derive(Clone, Debug, PartialEq)]
pub struct NumericAttribute {
    pub name: String,
}

impl NumericAttribute {
    pub fn new(name: String) -> NumericAttribute {
        NumericAttribute { name }
    }
}

/// Fold-scoped normalisation statistics of one numeric attribute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NumericStats {
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

impl NumericStats {
    /// Statistics over the present values; an empty input yields the neutral
    /// `min = max = 0`.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> NumericStats {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }

        if min.is_infinite() || max.is_infinite() {
            min = 0.0;
            max = 0.0;
        }

        NumericStats {
            min,
            max,
            range: MIN_RANGE.max(max - min),
        }
    }
}

impl Default for NumericStats {
    fn default() -> Self {
        NumericStats::from_values(std::iter::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_over_values() {
        let s = NumericStats::from_values([3.0, -1.0, 7.5]);
        assert_eq!(s.min, -1.0);
        assert_eq!(s.max, 7.5);
        assert_eq!(s.range, 8.5);
    }

    #[test]
    fn constant_column_gets_floored_range() {
        let s = NumericStats::from_values([4.0, 4.0]);
        assert_eq!(s.range, MIN_RANGE);
    }

    #[test]
    fn all_missing_is_neutral() {
        let s = NumericStats::default();
        assert_eq!((s.min, s.max, s.range), (0.0, 0.0, MIN_RANGE));
    }
}
