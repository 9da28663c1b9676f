use crate::classifiers::Prediction;
use crate::core::Dataset;
use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes one row per record: id, the record's values, its true label (RId)
/// and both decisions. `predictions` must be in record order.
pub fn write_out<W: Write>(out: &mut W, dataset: &Dataset, predictions: &[Prediction]) -> Result<()> {
    if predictions.len() != dataset.len() {
        return Err(Error::invalid_input(format!(
            "{} predictions for {} records",
            predictions.len(),
            dataset.len()
        )));
    }

    write!(out, "id")?;
    for attribute in dataset.attributes() {
        write!(out, ",{}", attribute.name())?;
    }
    writeln!(out, ",RId,CId,NCId")?;

    for (record, p) in dataset.records().iter().zip(predictions) {
        if record.id != p.record_id {
            return Err(Error::invalid_input(format!(
                "prediction for id {} found at the row of id {}",
                p.record_id, record.id
            )));
        }
        write!(out, "{}", record.id)?;
        for value in &record.values {
            write!(out, ",{value}")?;
        }
        writeln!(out, ",{},{},{}", p.true_label, p.c_id, p.nc_id)?;
    }
    Ok(())
}

pub fn write_out_file(path: &Path, dataset: &Dataset, predictions: &[Prediction]) -> Result<()> {
    create_parent(path)?;
    let mut out = BufWriter::new(File::create(path)?);
    write_out(&mut out, dataset, predictions)?;
    out.flush()?;
    Ok(())
}

pub(crate) fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
