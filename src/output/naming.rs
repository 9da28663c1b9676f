use crate::distance::DistanceSettings;
use std::path::{Path, PathBuf};

/// Dataset part of output names: the file name without `.data` (or without
/// its extension otherwise), with path-hostile characters replaced by `_`.
pub fn dataset_tag(data_path: &Path) -> String {
    let name = data_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let stem = if name.len() > 5 && name.to_ascii_lowercase().ends_with(".data") {
        name[..name.len() - 5].to_string()
    } else {
        Path::new(&name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(name)
    };

    sanitize(&stem)
}

fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// `{alg}_{dataset}_k{k}_{mode}_{metric}_{missing}`.
pub fn run_tag(algorithm: &str, dataset: &str, k_tag: &str, settings: &DistanceSettings) -> String {
    format!(
        "{algorithm}_{dataset}_k{k_tag}_{}_{}_{}",
        settings.mode.tag(),
        settings.nominal_metric.tag(),
        settings.missing_mode.tag()
    )
}

pub fn out_path(dir: &Path, tag: &str) -> PathBuf {
    dir.join(format!("OUT_{tag}.csv"))
}

pub fn stat_path(dir: &Path, tag: &str) -> PathBuf {
    dir.join(format!("STAT_{tag}.txt"))
}

pub fn knn_path(dir: &Path, tag: &str) -> PathBuf {
    dir.join(format!("kNN_{tag}.txt"))
}
