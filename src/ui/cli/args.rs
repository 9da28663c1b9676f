use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueHint};

use crate::config::{AlgorithmKind, ExperimentConfig, KSpec};
use crate::distance::{DistanceMode, MissingDistanceMode, NominalMetric};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Leave-one-out runner for the RIA, RIONA and k-NN classifiers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run an experiment without the interactive wizard
    Run(RunArgs),
}

#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// JSON experiment file; flags below override its fields
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Dataset to classify (.csv/.data/.txt, or .arff)
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub data: Option<PathBuf>,

    /// Classifier (knn, ria, riona)
    #[arg(long = "alg", value_name = "ALG")]
    pub algorithm: Option<String>,

    /// Neighbourhood size: a positive integer or log2n
    #[arg(long, value_name = "K")]
    pub k: Option<String>,

    /// Distance statistics: g(lobal) or l(ocal)
    #[arg(long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Nominal distance: svdm or svdmprime
    #[arg(long = "nomdist", value_name = "METRIC")]
    pub nominal_metric: Option<String>,

    /// Missing-value variant: v1 or v2
    #[arg(long, value_name = "VARIANT")]
    pub missing: Option<String>,

    /// Keep missing values instead of class-conditional imputation
    #[arg(long)]
    pub no_impute: bool,

    /// The first line is data, not column names
    #[arg(long)]
    pub no_header: bool,

    /// Field separator of delimited files (a single character, or "tab")
    #[arg(long = "sep", value_name = "CHAR", value_parser = parse_separator)]
    pub separator: Option<char>,

    /// Directory for auto-named OUT_/STAT_/kNN_ files
    #[arg(long = "outdir", value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub out_dir: Option<PathBuf>,

    /// OUT file path (wins over --outdir)
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub out: Option<PathBuf>,

    /// STAT file path (wins over --outdir)
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub stat: Option<PathBuf>,

    /// kNN neighbour list path (wins over --outdir)
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub knn_out: Option<PathBuf>,

    /// Batch: kNN for k=1,3,log2n and RIONA for --k (needs --outdir)
    #[arg(long)]
    pub all: bool,

    /// With --all, also run RIA (slow)
    #[arg(long, requires = "all")]
    pub all_ria: bool,

    /// Worker threads (0 lets rayon decide)
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Emit progress every N classified records
    #[arg(
        long,
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub sample_frequency: Option<u64>,
}

impl RunArgs {
    /// The config file (or the defaults) with every given flag applied.
    pub fn into_config(self) -> Result<ExperimentConfig> {
        let mut cfg = match &self.config {
            Some(path) => ExperimentConfig::from_json_file(path)?,
            None => ExperimentConfig::default(),
        };

        if let Some(data) = self.data {
            cfg.data = data;
        }
        if let Some(alg) = &self.algorithm {
            cfg.algorithm = parse_kind::<AlgorithmKind>(alg)
                .with_context(|| format!("invalid algorithm '{alg}'"))?;
        }
        if let Some(k) = &self.k {
            cfg.k = KSpec::from_str(k).with_context(|| format!("invalid k '{k}'"))?;
        }
        if let Some(mode) = &self.mode {
            cfg.distance.mode = parse_kind::<DistanceMode>(mode)
                .with_context(|| format!("invalid mode '{mode}'"))?;
        }
        if let Some(metric) = &self.nominal_metric {
            cfg.distance.nominal_metric = parse_kind::<NominalMetric>(metric)
                .with_context(|| format!("invalid nominal metric '{metric}'"))?;
        }
        if let Some(missing) = &self.missing {
            cfg.distance.missing_mode = parse_kind::<MissingDistanceMode>(missing)
                .with_context(|| format!("invalid missing mode '{missing}'"))?;
        }
        if self.no_impute {
            cfg.impute = false;
        }
        if self.no_header {
            cfg.has_header = false;
        }
        if let Some(sep) = self.separator {
            cfg.separator = sep;
        }
        if let Some(dir) = self.out_dir {
            cfg.out_dir = Some(dir);
        }
        if let Some(out) = self.out {
            cfg.out = Some(out);
        }
        if let Some(stat) = self.stat {
            cfg.stat = Some(stat);
        }
        if let Some(knn_out) = self.knn_out {
            cfg.knn_out = Some(knn_out);
        }
        cfg.all |= self.all;
        cfg.all_ria |= self.all_ria;
        if let Some(threads) = self.threads {
            cfg.threads = threads;
        }
        if let Some(freq) = self.sample_frequency {
            cfg.sample_frequency = freq;
        }

        if cfg.data.as_os_str().is_empty() {
            bail!("no dataset given; pass --data or set \"data\" in the config file");
        }
        if cfg.all && cfg.out_dir.is_none() {
            bail!("--all needs --outdir");
        }
        Ok(cfg)
    }
}

pub(crate) fn parse_kind<T>(raw: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let candidates = candidate_spellings(raw);
    for cand in candidates {
        if let Ok(parsed) = cand.parse::<T>() {
            return Ok(parsed);
        }
    }
    Err(anyhow!("could not parse value '{raw}'"))
}

fn candidate_spellings(input: &str) -> Vec<String> {
    let mut out = Vec::new();
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return out;
    }

    out.push(trimmed.to_string());
    out.push(trimmed.to_lowercase());
    out.push(kebab_from_token(trimmed));
    out.push(trimmed.replace('_', "-"));
    out.sort();
    out.dedup();
    out
}

fn kebab_from_token(token: &str) -> String {
    let mut buf = String::new();
    let mut prev_lower = false;
    for ch in token.chars() {
        if ch.is_uppercase() {
            if prev_lower {
                buf.push('-');
            }
            for low in ch.to_lowercase() {
                buf.push(low);
            }
            prev_lower = false;
        } else if ch == '_' {
            buf.push('-');
            prev_lower = false;
        } else {
            buf.push(ch);
            prev_lower = ch.is_lowercase();
        }
    }
    if buf.is_empty() {
        token.to_lowercase()
    } else {
        buf
    }
}

pub(crate) fn parse_separator(raw: &str) -> Result<char, String> {
    match raw {
        "\\t" | "tab" | "TAB" => return Ok('\t'),
        _ => {}
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        (None, _) => Err("separator cannot be empty".to_string()),
        _ => Err(format!("separator must be a single character, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn run_args(argv: &[&str]) -> RunArgs {
        let mut full = vec!["riona", "run"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Some(Command::Run(args)) => args,
            None => panic!("expected the run subcommand"),
        }
    }

    #[test]
    fn flags_map_onto_the_config() {
        let cfg = run_args(&[
            "--data", "data/nursery.data", "--alg", "RIONA", "--k", "log2n", "--mode", "l",
            "--nomdist", "svdmprime", "--missing", "v2", "--no-impute", "--no-header", "--sep",
            ";", "--outdir", "out", "--threads", "4",
        ])
        .into_config()
        .unwrap();

        assert_eq!(cfg.data, PathBuf::from("data/nursery.data"));
        assert_eq!(cfg.algorithm, AlgorithmKind::Riona);
        assert_eq!(cfg.k, KSpec::Log2N);
        assert_eq!(cfg.distance.mode, DistanceMode::Local);
        assert_eq!(cfg.distance.nominal_metric, NominalMetric::SvdmPrime);
        assert_eq!(cfg.distance.missing_mode, MissingDistanceMode::Variant2);
        assert!(!cfg.impute);
        assert!(!cfg.has_header);
        assert_eq!(cfg.separator, ';');
        assert_eq!(cfg.out_dir, Some(PathBuf::from("out")));
        assert_eq!(cfg.threads, 4);
    }

    #[test]
    fn flags_override_the_config_file() {
        let mut f = NamedTempFile::with_suffix(".json").unwrap();
        write!(f, r#"{{"data":"a.csv","algorithm":"ria","k":5,"threads":2}}"#).unwrap();
        let path = f.path().to_string_lossy().into_owned();

        let cfg = run_args(&["--config", path.as_str(), "--k", "7", "--mode", "global"])
            .into_config()
            .unwrap();
        assert_eq!(cfg.data, PathBuf::from("a.csv"));
        assert_eq!(cfg.algorithm, AlgorithmKind::Ria);
        assert_eq!(cfg.k, KSpec::Fixed(7));
        assert_eq!(cfg.threads, 2);
    }

    #[test]
    fn missing_data_and_bad_values_are_rejected() {
        assert!(run_args(&[]).into_config().is_err());
        assert!(run_args(&["--data", "x", "--alg", "svm"]).into_config().is_err());
        assert!(run_args(&["--data", "x", "--k", "lots"]).into_config().is_err());
        assert!(run_args(&["--data", "x", "--all"]).into_config().is_err());
        assert!(Cli::try_parse_from(["riona", "run", "--all-ria"]).is_err());
        assert!(Cli::try_parse_from(["riona", "run", "--sample-frequency", "0"]).is_err());
    }

    #[test]
    fn no_subcommand_means_wizard() {
        assert!(Cli::try_parse_from(["riona"]).unwrap().command.is_none());
    }

    #[test]
    fn separators() {
        assert_eq!(parse_separator(";"), Ok(';'));
        assert_eq!(parse_separator("tab"), Ok('\t'));
        assert_eq!(parse_separator("\\t"), Ok('\t'));
        assert!(parse_separator("").is_err());
        assert!(parse_separator(";;").is_err());
    }

    #[test]
    fn kind_spellings() {
        assert_eq!(kebab_from_token("SvdmPrime"), "svdm-prime");
        assert_eq!(parse_kind::<NominalMetric>("SvdmPrime").unwrap(), NominalMetric::SvdmPrime);
        assert_eq!(parse_kind::<DistanceMode>(" G ").unwrap(), DistanceMode::Global);
    }
}
