use crate::core::attributes::Attribute;
use crate::core::{Record, Value};
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fmt;

/// Attribute layout plus the records described by it. Immutable once built:
/// preprocessing produces a new dataset through [`Dataset::with_records`].
#[derive(Clone)]
pub struct Dataset {
    name: String,
    attributes: Vec<Attribute>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(name: String, attributes: Vec<Attribute>, records: Vec<Record>) -> Result<Dataset> {
        validate(&attributes, &records)?;
        Ok(Dataset {
            name,
            attributes,
            records,
        })
    }

    /// Same name and attribute layout, different records.
    pub fn with_records(&self, records: Vec<Record>) -> Result<Dataset> {
        Dataset::new(self.name.clone(), self.attributes.clone(), records)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn number_of_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, index: usize) -> &Record {
        &self.records[index]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn validate(attributes: &[Attribute], records: &[Record]) -> Result<()> {
    let mut seen_ids = HashSet::with_capacity(records.len());

    for (row, record) in records.iter().enumerate() {
        if record.values.len() != attributes.len() {
            return Err(Error::invalid_input(format!(
                "record #{row} (id {}) has {} values but the dataset declares {} attributes",
                record.id,
                record.values.len(),
                attributes.len()
            )));
        }

        if !seen_ids.insert(record.id) {
            return Err(Error::invalid_input(format!(
                "duplicate record id {}",
                record.id
            )));
        }

        for (j, (attribute, value)) in attributes.iter().zip(&record.values).enumerate() {
            match (attribute, value) {
                (_, Value::Missing) => {}
                (Attribute::Numeric(_), Value::Number(_)) => {}
                (Attribute::Nominal(nominal), Value::Category(v)) => {
                    if !nominal.contains(v) {
                        return Err(Error::invalid_input(format!(
                            "value '{v}' of record id {} is not in the domain of attribute '{}'",
                            record.id, nominal.name
                        )));
                    }
                }
                (attribute, value) => {
                    return Err(Error::invalid_input(format!(
                        "record id {} holds {value:?} in {} attribute #{j} '{}'",
                        record.id,
                        attribute.kind(),
                        attribute.name()
                    )));
                }
            }
        }
    }

    Ok(())
}

impl fmt::Debug for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dataset")
            .field("name", &self.name)
            .field("n_attributes", &self.attributes.len())
            .field("n_records", &self.records.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> Vec<Attribute> {
        vec![
            Attribute::numeric("x"),
            Attribute::nominal("colour", ["red", "blue"]),
        ]
    }

    #[test]
    fn accepts_well_formed_records() {
        let ds = Dataset::new(
            "d".into(),
            attrs(),
            vec![
                Record::new(0, vec![Value::Number(1.0), Value::category("red")], "A"),
                Record::new(7, vec![Value::Missing, Value::Missing], "B"),
            ],
        )
        .unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.number_of_attributes(), 2);
        assert_eq!(ds.record(1).label, "B");
    }

    #[test]
    fn rejects_value_count_mismatch() {
        let err = Dataset::new(
            "d".into(),
            attrs(),
            vec![Record::new(0, vec![Value::Number(1.0)], "A")],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let row = vec![Value::Number(1.0), Value::category("red")];
        let err = Dataset::new(
            "d".into(),
            attrs(),
            vec![Record::new(3, row.clone(), "A"), Record::new(3, row, "B")],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn rejects_kind_mismatch_and_unknown_category() {
        let err = Dataset::new(
            "d".into(),
            attrs(),
            vec![Record::new(0, vec![Value::category("red"), Value::Missing], "A")],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = Dataset::new(
            "d".into(),
            attrs(),
            vec![Record::new(0, vec![Value::Missing, Value::category("green")], "A")],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
