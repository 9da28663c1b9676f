use crate::core::attributes::{Attribute, NominalAttribute};
use crate::core::{Dataset, Record, Value};
use crate::error::{Error, Result};
use crate::loaders::LoadOptions;
use crate::utils::file_parsing::{split_preserving_quotes, strip_surrounding_quotes};
use std::fs;
use std::path::Path;

/// Tokens read as a missing cell, compared case-insensitively.
pub const MISSING_TOKENS: [&str; 6] = ["", "?", "NA", "N/A", "null", "-"];

pub fn is_missing_token(token: &str) -> bool {
    MISSING_TOKENS.iter().any(|m| m.eq_ignore_ascii_case(token))
}

fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Delimited text with the class label in the last column. A feature column
/// is numeric when every present token in it parses as a finite number, and
/// nominal otherwise.
#[derive(Clone, Debug)]
pub struct CsvLoader {
    options: LoadOptions,
}

impl CsvLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    pub fn load(&self, path: &Path) -> Result<Dataset> {
        let text = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string());
        self.parse(&name, &text)
    }

    pub fn parse(&self, name: &str, text: &str) -> Result<Dataset> {
        let sep = self.options.separator;
        let rows: Vec<(usize, Vec<String>)> = text
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty())
            .map(|(i, l)| (i + 1, tokenize(l, sep)))
            .collect();

        let (header, data) = match (self.options.has_header, rows.split_first()) {
            (true, Some((header, data))) => (Some(header), data),
            _ => (None, rows.as_slice()),
        };
        let Some((_, first)) = data.first() else {
            return Err(Error::invalid_input(format!("'{name}' has no data rows")));
        };

        let columns = first.len();
        if columns < 2 {
            return Err(Error::invalid_input(format!(
                "'{name}' needs at least one feature column and a label column"
            )));
        }
        let n_features = columns - 1;

        for (line, tokens) in data {
            if tokens.len() != columns {
                return Err(Error::parse(
                    *line,
                    format!("expected {columns} columns, found {}", tokens.len()),
                ));
            }
        }

        let numeric: Vec<bool> = (0..n_features)
            .map(|j| {
                data.iter()
                    .map(|(_, tokens)| tokens[j].as_str())
                    .filter(|t| !is_missing_token(t))
                    .all(|t| parse_number(t).is_some())
            })
            .collect();

        let names: Vec<String> = match header {
            Some((line, tokens)) => {
                if tokens.len() != columns {
                    return Err(Error::parse(
                        *line,
                        format!("header has {} columns, data has {columns}", tokens.len()),
                    ));
                }
                tokens[..n_features].to_vec()
            }
            None => (1..=n_features).map(|i| format!("f{i}")).collect(),
        };

        let mut domains: Vec<Option<NominalAttribute>> = names
            .iter()
            .zip(&numeric)
            .map(|(n, &is_num)| (!is_num).then(|| NominalAttribute::new(n.clone())))
            .collect();

        let mut records = Vec::with_capacity(data.len());
        for (id, (line, tokens)) in data.iter().enumerate() {
            let mut values = Vec::with_capacity(n_features);
            for (j, token) in tokens[..n_features].iter().enumerate() {
                if is_missing_token(token) {
                    values.push(Value::Missing);
                    continue;
                }
                match &mut domains[j] {
                    Some(domain) => {
                        domain.observe_value(token);
                        values.push(Value::category(token.as_str()));
                    }
                    None => {
                        let v = parse_number(token).ok_or_else(|| {
                            Error::parse(*line, format!("cannot parse '{token}' in column {}", j + 1))
                        })?;
                        values.push(Value::Number(v));
                    }
                }
            }

            let label = &tokens[n_features];
            if label.is_empty() {
                return Err(Error::parse(*line, "empty label"));
            }
            records.push(Record::new(id as u64, values, label.as_str()));
        }

        let attributes = names
            .into_iter()
            .zip(domains)
            .map(|(n, domain)| match domain {
                Some(domain) => Attribute::Nominal(domain),
                None => Attribute::numeric(n),
            })
            .collect();

        Dataset::new(name.to_string(), attributes, records)
    }
}

fn tokenize(line: &str, sep: char) -> Vec<String> {
    split_preserving_quotes(line.trim(), sep)
        .iter()
        .map(|t| strip_surrounding_quotes(t.trim()).trim().to_string())
        .collect()
}
