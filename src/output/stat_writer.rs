use crate::core::Dataset;
use crate::core::attributes::{Attribute, NumericStats};
use crate::distance::DistanceSettings;
use crate::error::Result;
use crate::evaluation::ClassificationMetrics;
use crate::output::out_writer::create_parent;
use chrono::Local;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Wall-clock time of each experiment phase.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhaseTimings {
    pub load: Duration,
    pub impute: Duration,
    pub context: Duration,
    pub classify: Duration,
    pub metrics: Duration,
    pub write: Duration,
}

impl PhaseTimings {
    pub fn total(&self) -> Duration {
        self.load + self.impute + self.context + self.classify + self.metrics + self.write
    }
}

/// Everything a STAT file reports about one rule-classifier run.
pub struct StatReport<'a> {
    pub title: String,
    pub meta: Vec<(String, String)>,
    pub timings: PhaseTimings,
    pub settings: DistanceSettings,
    /// The dataset as classified, i.e. after imputation.
    pub dataset: &'a Dataset,
    pub c_id: &'a ClassificationMetrics,
    pub nc_id: &'a ClassificationMetrics,
}

fn ms(d: Duration) -> String {
    format!("{:.0}", d.as_secs_f64() * 1000.0)
}

impl StatReport<'_> {
    pub fn render(&self) -> String {
        let mut s = String::new();
        let _ = self.render_into(&mut s);
        s
    }

    fn render_into(&self, s: &mut String) -> std::fmt::Result {
        writeln!(s, "{}", self.title)?;
        writeln!(s, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(s)?;

        writeln!(s, "META:")?;
        for (k, v) in &self.meta {
            writeln!(s, "{k}: {v}")?;
        }
        writeln!(s)?;

        let t = &self.timings;
        writeln!(s, "TIMES_MS:")?;
        writeln!(s, "LOAD:     {}", ms(t.load))?;
        writeln!(s, "IMPUTE:   {}", ms(t.impute))?;
        writeln!(s, "CONTEXT:  {}", ms(t.context))?;
        writeln!(s, "CLASSIFY: {}", ms(t.classify))?;
        writeln!(s, "METRICS:  {}", ms(t.metrics))?;
        writeln!(s, "WRITE:    {}", ms(t.write))?;
        writeln!(s, "TOTAL:    {}", ms(t.total()))?;
        writeln!(s)?;

        writeln!(s, "ATTRIBUTE_STATS:")?;
        writeln!(s, "DistanceMode: {}", self.settings.mode)?;
        writeln!(s, "NominalMetric: {}", self.settings.nominal_metric)?;
        writeln!(s, "MissingMode: {}", self.settings.missing_mode)?;
        writeln!(s)?;

        writeln!(s, "Numeric attributes (min, max, range):")?;
        let mut any = false;
        for (j, attribute) in self.dataset.attributes().iter().enumerate() {
            if !attribute.is_numeric() {
                continue;
            }
            any = true;
            let stats = NumericStats::from_values(
                self.dataset.records().iter().filter_map(|r| r.values[j].as_number()),
            );
            writeln!(
                s,
                "{}\tmin={}\tmax={}\trange={}",
                attribute.name(),
                stats.min,
                stats.max,
                stats.range
            )?;
        }
        if !any {
            writeln!(s, "(none)")?;
        }
        writeln!(s)?;

        writeln!(s, "Nominal attributes (domain size):")?;
        let mut any = false;
        for attribute in self.dataset.attributes() {
            if let Attribute::Nominal(nominal) = attribute {
                any = true;
                writeln!(s, "{}\tdomain={}", nominal.name, nominal.domain_size())?;
            }
        }
        if !any {
            writeln!(s, "(none)")?;
        }
        writeln!(s)?;

        dump_metrics(s, "CId", self.c_id)?;
        dump_metrics(s, "NCId", self.nc_id)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        create_parent(path)?;
        fs::write(path, self.render())?;
        Ok(())
    }
}

fn dump_metrics(s: &mut String, name: &str, m: &ClassificationMetrics) -> std::fmt::Result {
    writeln!(s, "== {name} ==")?;
    writeln!(s, "Accuracy: {:.6}", m.accuracy())?;
    writeln!(s, "BalancedPrecision: {:.6}", m.balanced_precision)?;
    writeln!(s, "BalancedRecall:    {:.6}", m.balanced_recall)?;
    writeln!(s, "BalancedF1:        {:.6}", m.balanced_f1)?;
    writeln!(s)?;

    writeln!(s, "{}", m.confusion_to_string())?;

    writeln!(s, "Per-class metrics:")?;
    writeln!(s, "Class\tSupport\tTP\tFP\tFN\tPrecision\tRecall\tF1")?;
    for c in &m.per_class {
        writeln!(
            s,
            "{}\t{}\t{}\t{}\t{}\t{:.6}\t{:.6}\t{:.6}",
            c.class, c.support, c.tp, c.fp, c.fn_, c.precision, c.recall, c.f1
        )?;
    }
    writeln!(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::Attribute;
    use crate::core::{Record, Value};

    #[test]
    fn renders_every_section() {
        let ds = Dataset::new(
            "s".into(),
            vec![Attribute::numeric("x"), Attribute::nominal("c", ["u", "v"])],
            vec![
                Record::new(0, vec![Value::Number(1.0), Value::category("u")], "A"),
                Record::new(1, vec![Value::Number(4.0), Value::category("v")], "B"),
            ],
        )
        .unwrap();
        let c = ClassificationMetrics::from_pairs(&[("A", "A"), ("B", "A")]);
        let nc = ClassificationMetrics::from_pairs(&[("A", "A"), ("B", "B")]);
        let report = StatReport {
            title: "STAT_RIA".into(),
            meta: vec![("ALG".into(), "RIA".into()), ("N".into(), "2".into())],
            timings: PhaseTimings {
                load: Duration::from_millis(3),
                classify: Duration::from_millis(10),
                ..PhaseTimings::default()
            },
            settings: DistanceSettings::default(),
            dataset: &ds,
            c_id: &c,
            nc_id: &nc,
        };
        let text = report.render();

        assert!(text.starts_with("STAT_RIA\nGenerated: "));
        assert!(text.contains("META:\nALG: RIA\nN: 2\n"));
        assert!(text.contains("LOAD:     3\n"));
        assert!(text.contains("TOTAL:    13\n"));
        assert!(text.contains("DistanceMode: global\n"));
        assert!(text.contains("x\tmin=1\tmax=4\trange=3\n"));
        assert!(text.contains("c\tdomain=2\n"));
        assert!(text.contains("== CId ==\nAccuracy: 0.500000\n"));
        assert!(text.contains("== NCId ==\nAccuracy: 1.000000\n"));
        assert!(text.contains("B\t1\t0\t0\t1\t0.000000\t0.000000\t0.000000\n"));
    }

    #[test]
    fn datasets_without_numeric_attributes_say_none() {
        let ds = Dataset::new(
            "s".into(),
            vec![Attribute::nominal("c", ["u"])],
            vec![Record::new(0, vec![Value::category("u")], "A")],
        )
        .unwrap();
        let m = ClassificationMetrics::from_pairs(&[("A", "A")]);
        let report = StatReport {
            title: "STAT_RIONA".into(),
            meta: vec![],
            timings: PhaseTimings::default(),
            settings: DistanceSettings::default(),
            dataset: &ds,
            c_id: &m,
            nc_id: &m,
        };
        assert!(report.render().contains("Numeric attributes (min, max, range):\n(none)\n"));
    }
}
