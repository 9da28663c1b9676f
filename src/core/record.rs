use crate::core::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub id: u64,
    pub values: Vec<Value>,
    pub label: String,
}

impl Record {
    pub fn new(id: u64, values: Vec<Value>, label: impl Into<String>) -> Record {
        Record {
            id,
            values,
            label: label.into(),
        }
    }

    pub fn has_missing(&self) -> bool {
        self.values.iter().any(Value::is_missing)
    }
}
