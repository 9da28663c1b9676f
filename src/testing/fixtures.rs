use crate::core::attributes::Attribute;
use crate::core::{Dataset, Record, Value};
use crate::distance::{DistanceMode, DistanceSettings, MissingDistanceMode, NominalMetric};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Index of the held-out record in [`two_nominal_scenario`].
pub const SCENARIO_QUERY: usize = 5;

/// Five training records over `a ∈ {x, y}` and `b ∈ {p, q}` labelled
/// A, A, B, B, A, followed by the query `(y, p)` labelled A.
///
/// With the query left out: `d(x, y) = 2` since x is always A and y always B,
/// and `d(p, q) = 1/3` from `P(A|p) = 2/3` and `P(A|q) = 1/2`.
pub fn two_nominal_scenario() -> Dataset {
    let row = |id: u64, a: &str, b: &str, label: &str| {
        Record::new(id, vec![Value::category(a), Value::category(b)], label)
    };
    Dataset::new(
        "two-nominal".into(),
        vec![
            Attribute::nominal("a", ["x", "y"]),
            Attribute::nominal("b", ["p", "q"]),
        ],
        vec![
            row(0, "x", "p", "A"),
            row(1, "x", "q", "A"),
            row(2, "y", "p", "B"),
            row(3, "y", "q", "B"),
            row(4, "x", "p", "A"),
            row(5, "y", "p", "A"),
        ],
    )
    .expect("scenario dataset is well formed")
}

pub fn scenario_settings() -> DistanceSettings {
    DistanceSettings::new(
        DistanceMode::Local,
        NominalMetric::Svdm,
        MissingDistanceMode::Variant1,
    )
}

/// Seeded dataset with two numeric and two nominal attributes, three classes
/// and cells missing with probability `missing_rate`. Numeric values are
/// small integers so distance ties are common.
pub fn random_mixed_dataset(seed: u64, n: usize, missing_rate: f64) -> Dataset {
    const COLOURS: [&str; 3] = ["red", "green", "blue"];
    const SHAPES: [&str; 4] = ["round", "square", "star", "flat"];
    const LABELS: [&str; 3] = ["A", "B", "C"];

    let mut rng = StdRng::seed_from_u64(seed);
    let cell = |rng: &mut StdRng, value: Value| {
        if rng.random_bool(missing_rate) {
            Value::Missing
        } else {
            value
        }
    };

    let records = (0..n)
        .map(|i| {
            let x = Value::Number(rng.random_range(0..6) as f64);
            let colour = Value::category(COLOURS[rng.random_range(0..COLOURS.len())]);
            let y = Value::Number(rng.random_range(-10..10) as f64 / 4.0);
            let shape = Value::category(SHAPES[rng.random_range(0..SHAPES.len())]);
            let values = vec![
                cell(&mut rng, x),
                cell(&mut rng, colour),
                cell(&mut rng, y),
                cell(&mut rng, shape),
            ];
            let label = LABELS[rng.random_range(0..LABELS.len())];
            // ids run backwards so id and position tie-breaks disagree
            Record::new(((n - i) * 3) as u64, values, label)
        })
        .collect();

    Dataset::new(
        format!("random-{seed}"),
        vec![
            Attribute::numeric("x"),
            Attribute::nominal("colour", COLOURS),
            Attribute::numeric("y"),
            Attribute::nominal("shape", SHAPES),
        ],
        records,
    )
    .expect("generated dataset is well formed")
}
