use crate::core::attributes::Attribute;
use crate::core::{Dataset, Record, Value};
use crate::error::{Error, Result};
use crate::utils::file_parsing::{
    is_comment_or_empty, split_preserving_quotes, strip_surrounding_quotes,
};
use std::fs;
use std::path::Path;

#[derive(Debug, PartialEq)]
pub(crate) enum DeclaredKind {
    Numeric,
    Nominal(Vec<String>),
}

/// Loads a dense ARFF file. The last attribute is the class and has to be
/// nominal; `?` marks a missing cell.
pub fn load_arff(path: &Path) -> Result<Dataset> {
    let text = fs::read_to_string(path)?;
    parse_arff(&text)
}

pub fn parse_arff(text: &str) -> Result<Dataset> {
    let mut relation: Option<String> = None;
    let mut declared: Vec<(String, DeclaredKind)> = Vec::new();
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));
    let mut last_line = 0;

    loop {
        let Some((line_no, line)) = lines.next() else {
            return Err(Error::parse(last_line, "ARFF file ended before @data"));
        };
        last_line = line_no;
        if is_comment_or_empty(line) {
            continue;
        }

        let low = line.trim().to_ascii_lowercase();
        if low.starts_with("@relation") {
            let raw = line.trim()["@relation".len()..].trim();
            relation = Some(strip_surrounding_quotes(raw).to_string());
        } else if low.starts_with("@attribute") {
            declared.push(parse_attribute_line(line).map_err(|m| Error::parse(line_no, m))?);
        } else if low.starts_with("@data") {
            break;
        } else {
            return Err(Error::parse(
                line_no,
                format!("unsupported header directive: {}", line.trim()),
            ));
        }
    }

    let Some((class_name, DeclaredKind::Nominal(_))) = declared.last() else {
        return Err(Error::invalid_input(
            "the last ARFF attribute is the class and must be nominal",
        ));
    };
    if declared.len() < 2 {
        return Err(Error::invalid_input(format!(
            "no feature attributes besides the class '{class_name}'"
        )));
    }

    let n_features = declared.len() - 1;
    let mut records = Vec::new();
    for (line_no, line) in lines {
        if is_comment_or_empty(line) {
            continue;
        }
        let (values, label) = parse_instance_values(&declared, line)
            .map_err(|m| Error::parse(line_no, m))?;
        records.push(Record::new(records.len() as u64, values, label));
    }

    let attributes = declared
        .into_iter()
        .take(n_features)
        .map(|(name, kind)| match kind {
            DeclaredKind::Numeric => Attribute::numeric(name),
            DeclaredKind::Nominal(values) => Attribute::nominal(name, values),
        })
        .collect();

    Dataset::new(
        relation.unwrap_or_else(|| "unnamed_relation".to_string()),
        attributes,
        records,
    )
}

pub(crate) fn parse_attribute_line(line: &str) -> std::result::Result<(String, DeclaredKind), String> {
    let trimmed = line.trim();
    if !trimmed.to_ascii_lowercase().starts_with("@attribute") {
        return Err("line is not '@attribute'".into());
    }
    let rest = trimmed["@attribute".len()..].trim();

    let (name, after_name) = if rest.starts_with('\'') || rest.starts_with('"') {
        let quote = &rest[..1];
        let end = rest[1..]
            .find(quote)
            .ok_or("attribute name without closing quote")?
            + 1;
        (rest[1..end].to_string(), rest[end + 1..].trim())
    } else {
        let mut it = rest.splitn(2, char::is_whitespace);
        let name = it.next().unwrap_or_default().to_string();
        let after = it.next().ok_or("attribute type is missing")?;
        (name, after.trim())
    };

    let low = after_name.to_ascii_lowercase();
    if low.starts_with("numeric") || low.starts_with("real") || low.starts_with("integer") {
        return Ok((name, DeclaredKind::Numeric));
    }

    if after_name.starts_with('{') {
        let close = after_name
            .rfind('}')
            .ok_or("nominal set without closing '}'")?;
        let values: Vec<String> = split_preserving_quotes(&after_name[1..close], ',')
            .iter()
            .map(|s| strip_surrounding_quotes(s.trim()).to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if values.is_empty() {
            return Err("empty nominal domain".into());
        }
        return Ok((name, DeclaredKind::Nominal(values)));
    }

    Err(format!("attribute type not supported: {after_name}"))
}

fn parse_instance_values(
    declared: &[(String, DeclaredKind)],
    line: &str,
) -> std::result::Result<(Vec<Value>, String), String> {
    let tokens = split_preserving_quotes(line.trim(), ',');
    if tokens.len() != declared.len() {
        return Err(format!(
            "number of columns ({}) differs from number of attributes ({})",
            tokens.len(),
            declared.len()
        ));
    }

    let mut values = Vec::with_capacity(tokens.len());
    for ((name, kind), raw) in declared.iter().zip(&tokens) {
        let raw = raw.trim();
        if raw == "?" {
            values.push(Value::Missing);
            continue;
        }
        match kind {
            DeclaredKind::Numeric => {
                let v = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| format!("invalid numeric value '{raw}' for '{name}'"))?;
                values.push(Value::Number(v));
            }
            DeclaredKind::Nominal(domain) => {
                let key = strip_surrounding_quotes(raw);
                if !domain.iter().any(|d| d == key) {
                    return Err(format!("value '{key}' is not in the domain of '{name}'"));
                }
                values.push(Value::category(key));
            }
        }
    }

    match values.pop() {
        Some(Value::Category(label)) => Ok((values, label)),
        _ => Err("missing class value".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::AttributeKind;

    const WEATHER: &str = "% toy data\n\
        @relation 'weather'\n\
        @attribute outlook {sunny, overcast, 'light rain'}\n\
        @attribute temperature real\n\
        @attribute play {yes, no}\n\
        \n\
        @data\n\
        sunny,85,no\n\
        'light rain',?,yes\n\
        % trailing comment\n\
        ?,64,yes\n";

    #[test]
    fn parses_header_and_rows() {
        let ds = parse_arff(WEATHER).unwrap();
        assert_eq!(ds.name(), "weather");
        assert_eq!(ds.number_of_attributes(), 2);
        assert_eq!(ds.attributes()[0].kind(), AttributeKind::Nominal);
        assert_eq!(ds.attributes()[1].kind(), AttributeKind::Numeric);
        assert_eq!(
            ds.attributes()[0].as_nominal().unwrap().values,
            vec!["sunny", "overcast", "light rain"]
        );

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.record(0).label, "no");
        assert_eq!(ds.record(1).values[0], Value::category("light rain"));
        assert_eq!(ds.record(1).values[1], Value::Missing);
        assert_eq!(ds.record(2).values[0], Value::Missing);
        assert_eq!(ds.record(2).id, 2);
    }

    #[test]
    fn attribute_line_errors() {
        assert!(parse_attribute_line("@attribute outlook").is_err());
        assert!(parse_attribute_line("@attribute 'bad {x, y}").is_err());
        assert!(parse_attribute_line("@relation r").is_err());
        assert!(parse_attribute_line("@attribute a {   }").is_err());
        assert!(parse_attribute_line("@attribute a {x, y").is_err());
        assert!(parse_attribute_line("@attribute note string").is_err());
    }

    #[test]
    fn attribute_line_trailing_comma_and_quoted_name() {
        let (name, kind) = parse_attribute_line("@attribute 'my attr' {x, }").unwrap();
        assert_eq!(name, "my attr");
        assert_eq!(kind, DeclaredKind::Nominal(vec!["x".into()]));
        let (_, kind) = parse_attribute_line("@ATTRIBUTE n INTEGER").unwrap();
        assert_eq!(kind, DeclaredKind::Numeric);
    }

    #[test]
    fn undeclared_value_reports_its_line() {
        let text = "@relation r\n@attribute a {x}\n@attribute c {A}\n@data\nx,A\ny,A\n";
        let err = parse_arff(text).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 6, .. }), "{err}");
    }

    #[test]
    fn numeric_class_is_rejected() {
        let text = "@relation r\n@attribute a {x}\n@attribute c numeric\n@data\nx,1\n";
        assert!(matches!(parse_arff(text).unwrap_err(), Error::InvalidInput(_)));
    }

    #[test]
    fn missing_class_value_is_a_parse_error() {
        let text = "@relation r\n@attribute a numeric\n@attribute c {A}\n@data\n1,?\n";
        assert!(matches!(parse_arff(text).unwrap_err(), Error::Parse { line: 5, .. }));
    }

    #[test]
    fn eof_before_data() {
        let err = parse_arff("@relation r\n@attribute a numeric\n").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
