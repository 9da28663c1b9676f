use anyhow::Result;
use std::path::{Path, PathBuf};
use strum::{EnumMessage, IntoEnumIterator};

use crate::config::{AlgorithmKind, ExperimentConfig, KSpec};
use crate::distance::{DistanceMode, DistanceSettings, MissingDistanceMode, NominalMetric};
use crate::ui::cli::args::parse_separator;
use crate::ui::cli::drivers::PromptDriver;

const DIM_ITALIC: &str = "\x1b[2m\x1b[3m";
const RESET: &str = "\x1b[0m";

fn kind_items<K>() -> Vec<(K, String)>
where
    K: Copy + Into<&'static str> + EnumMessage + IntoEnumIterator,
{
    K::iter()
        .map(|k| {
            let label = k.get_message().unwrap_or_else(|| k.into());
            let desc = k.get_detailed_message().unwrap_or("");
            let text = if desc.is_empty() {
                label.to_string()
            } else {
                format!("{label}  {DIM_ITALIC}{desc}{RESET}")
            };
            (k, text)
        })
        .collect()
}

fn select_kind<K, D>(driver: &D, title: &str, help: &str, current: K) -> Result<K>
where
    K: Copy + PartialEq + Into<&'static str> + EnumMessage + IntoEnumIterator,
    D: PromptDriver,
{
    let items = kind_items::<K>();
    let start = items.iter().position(|(k, _)| *k == current).unwrap_or(0);
    let texts = items.iter().map(|(_, t)| t.clone()).collect();
    let picked = driver.ask_select(title, help, texts, start)?;
    Ok(items.get(picked).map(|(k, _)| *k).unwrap_or(current))
}

/// Walks the user through one experiment, starting from the defaults.
pub fn prompt_config<D: PromptDriver>(driver: &D) -> Result<ExperimentConfig> {
    let defaults = ExperimentConfig::default();
    let mut cfg = ExperimentConfig {
        data: prompt_path_until_ok(
            driver,
            "Dataset",
            "Delimited text (last column = class) or .arff",
            "",
        )?,
        ..defaults
    };

    let is_arff = cfg
        .data
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("arff"));
    if !is_arff {
        cfg.has_header = driver.ask_bool(
            "Header row?",
            "The first line holds column names",
            cfg.has_header,
        )?;
        cfg.separator = loop {
            let answer = driver.ask_string("Separator", "A single character, or \"tab\"", ",")?;
            match parse_separator(&answer) {
                Ok(c) => break c,
                Err(msg) => eprintln!("✗ {msg}"),
            }
        };
    }

    cfg.all = driver.ask_bool(
        "Batch mode?",
        "kNN for k=1,3,log2n plus RIONA, all written to one directory",
        false,
    )?;
    if cfg.all {
        cfg.all_ria = driver.ask_bool("Include RIA?", "Much slower than RIONA", false)?;
    } else {
        cfg.algorithm = select_kind(driver, "Algorithm", "", cfg.algorithm)?;
    }

    if cfg.all || cfg.algorithm != AlgorithmKind::Ria {
        cfg.k = prompt_k(driver, cfg.k)?;
    }

    cfg.distance = DistanceSettings::new(
        select_kind::<DistanceMode, _>(driver, "Distance mode", "", cfg.distance.mode)?,
        select_kind::<NominalMetric, _>(driver, "Nominal distance", "", cfg.distance.nominal_metric)?,
        select_kind::<MissingDistanceMode, _>(
            driver,
            "Missing values",
            "Both variants currently charge the full penalty",
            cfg.distance.missing_mode,
        )?,
    );

    cfg.impute = driver.ask_bool(
        "Impute missing values?",
        "Class mean for numeric, class mode for nominal attributes",
        cfg.impute,
    )?;

    cfg.out_dir = loop {
        let answer = driver.ask_string(
            "Output directory",
            "OUT_/STAT_/kNN_ files go here (kNN may leave it blank)",
            "",
        )?;
        let trimmed = answer.trim();
        if !trimmed.is_empty() {
            break Some(PathBuf::from(trimmed));
        }
        if !cfg.all && cfg.algorithm == AlgorithmKind::Knn {
            break None;
        }
        eprintln!("✗ Only kNN runs may skip writing files");
    };

    cfg.threads = driver.ask_u64("Threads", "0 lets rayon decide", 0)? as usize;

    Ok(cfg)
}

fn prompt_k<D: PromptDriver>(driver: &D, current: KSpec) -> Result<KSpec> {
    loop {
        let answer = driver.ask_string(
            "k",
            "Neighbourhood size: a positive integer or log2n",
            &current.tag(),
        )?;
        match answer.parse::<KSpec>() {
            Ok(k) => return Ok(k),
            Err(e) => eprintln!("✗ {e}"),
        }
    }
}

fn validate_path_str(input: &str) -> Result<(), String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Path cannot be empty".into());
    }
    let p = Path::new(trimmed);

    if !p.exists() {
        return Err(format!("Path does not exist: {}", p.display()));
    }
    if !p.is_file() {
        return Err("Expected a file path, not a directory".into());
    }
    Ok(())
}

fn prompt_path_until_ok<D: PromptDriver>(
    driver: &D,
    title: &str,
    help: &str,
    default: &str,
) -> Result<PathBuf> {
    loop {
        let answer = driver.ask_string(title, help, default)?;
        match validate_path_str(&answer) {
            Ok(()) => return Ok(PathBuf::from(answer.trim())),
            Err(msg) => {
                eprintln!("✗ {}", msg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use tempfile::NamedTempFile;

    enum Answer {
        Text(String),
        Bool(bool),
        Num(u64),
        Pick(usize),
    }

    struct ScriptedDriver {
        answers: RefCell<VecDeque<Answer>>,
    }

    impl ScriptedDriver {
        fn new(answers: Vec<Answer>) -> Self {
            Self {
                answers: RefCell::new(answers.into()),
            }
        }

        fn next(&self, title: &str) -> Result<Answer> {
            self.answers
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| anyhow!("script ran out at '{title}'"))
        }

        fn exhausted(&self) -> bool {
            self.answers.borrow().is_empty()
        }
    }

    impl PromptDriver for ScriptedDriver {
        fn ask_string(&self, title: &str, _help: &str, _default: &str) -> Result<String> {
            match self.next(title)? {
                Answer::Text(s) => Ok(s),
                _ => Err(anyhow!("expected text for '{title}'")),
            }
        }

        fn ask_bool(&self, title: &str, _help: &str, _default: bool) -> Result<bool> {
            match self.next(title)? {
                Answer::Bool(b) => Ok(b),
                _ => Err(anyhow!("expected a yes/no for '{title}'")),
            }
        }

        fn ask_u64(&self, title: &str, _help: &str, _default: u64) -> Result<u64> {
            match self.next(title)? {
                Answer::Num(n) => Ok(n),
                _ => Err(anyhow!("expected a number for '{title}'")),
            }
        }

        fn ask_select(&self, title: &str, _help: &str, options: Vec<String>, _start: usize) -> Result<usize> {
            match self.next(title)? {
                Answer::Pick(i) if i < options.len() => Ok(i),
                _ => Err(anyhow!("expected a valid pick for '{title}'")),
            }
        }
    }

    fn text(s: &str) -> Answer {
        Answer::Text(s.to_string())
    }

    #[test]
    fn single_run_walkthrough() {
        let data = NamedTempFile::with_suffix(".csv").unwrap();
        let path = data.path().to_string_lossy().into_owned();

        let driver = ScriptedDriver::new(vec![
            text("/definitely/not/here.csv"),
            text(&path),
            Answer::Bool(false),
            text(";;"),
            text(";"),
            Answer::Bool(false),
            Answer::Pick(2),
            text("nope"),
            text("log2n"),
            Answer::Pick(1),
            Answer::Pick(1),
            Answer::Pick(0),
            Answer::Bool(true),
            text(""),
            text("runs"),
            Answer::Num(2),
        ]);

        let cfg = prompt_config(&driver).unwrap();
        assert!(driver.exhausted());
        assert_eq!(cfg.data, PathBuf::from(&path));
        assert!(!cfg.has_header);
        assert_eq!(cfg.separator, ';');
        assert_eq!(cfg.algorithm, AlgorithmKind::Riona);
        assert_eq!(cfg.k, KSpec::Log2N);
        assert_eq!(cfg.distance.mode, DistanceMode::Local);
        assert_eq!(cfg.distance.nominal_metric, NominalMetric::SvdmPrime);
        assert_eq!(cfg.distance.missing_mode, MissingDistanceMode::Variant1);
        assert_eq!(cfg.out_dir, Some(PathBuf::from("runs")));
        assert_eq!(cfg.threads, 2);
    }

    #[test]
    fn batch_mode_on_arff_insists_on_a_directory() {
        let data = NamedTempFile::with_suffix(".arff").unwrap();
        let path = data.path().to_string_lossy().into_owned();

        let driver = ScriptedDriver::new(vec![
            text(&path),
            Answer::Bool(true),
            Answer::Bool(true),
            text("5"),
            Answer::Pick(0),
            Answer::Pick(0),
            Answer::Pick(1),
            Answer::Bool(false),
            text("  "),
            text("out"),
            Answer::Num(0),
        ]);

        let cfg = prompt_config(&driver).unwrap();
        assert!(driver.exhausted());
        assert!(cfg.all && cfg.all_ria);
        assert_eq!(cfg.k, KSpec::Fixed(5));
        assert_eq!(cfg.distance.missing_mode, MissingDistanceMode::Variant2);
        assert!(!cfg.impute);
        assert_eq!(cfg.out_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn ria_skips_the_k_question() {
        let data = NamedTempFile::with_suffix(".data").unwrap();
        let path = data.path().to_string_lossy().into_owned();

        let driver = ScriptedDriver::new(vec![
            text(&path),
            Answer::Bool(true),
            text(","),
            Answer::Bool(false),
            Answer::Pick(1),
            Answer::Pick(0),
            Answer::Pick(0),
            Answer::Pick(0),
            Answer::Bool(true),
            text("results"),
            Answer::Num(0),
        ]);

        let cfg = prompt_config(&driver).unwrap();
        assert!(driver.exhausted());
        assert_eq!(cfg.algorithm, AlgorithmKind::Ria);
        assert_eq!(cfg.k, KSpec::default());
    }
}
