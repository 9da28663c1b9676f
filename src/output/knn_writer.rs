use crate::classifiers::KnnPrediction;
use crate::error::Result;
use crate::output::out_writer::create_parent;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// `testId;neighbourId:distance;...`, one line per query, closest first.
/// Distances use the shortest representation that reads back exactly.
pub fn write_neighbours<W: Write>(out: &mut W, predictions: &[KnnPrediction]) -> Result<()> {
    for p in predictions {
        write!(out, "{}", p.record_id)?;
        for n in &p.neighbours {
            write!(out, ";{}:{}", n.id, n.distance)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_neighbours_file(path: &Path, predictions: &[KnnPrediction]) -> Result<()> {
    create_parent(path)?;
    let mut out = BufWriter::new(File::create(path)?);
    write_neighbours(&mut out, predictions)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::Neighbour;

    #[test]
    fn one_line_per_query() {
        let predictions = vec![
            KnnPrediction {
                record_id: 7,
                true_label: "A".into(),
                predicted: "A".into(),
                neighbours: vec![
                    Neighbour { index: 1, id: 3, distance: 0.1 },
                    Neighbour { index: 0, id: 2, distance: 1.0 / 3.0 },
                ],
            },
            KnnPrediction {
                record_id: 8,
                true_label: "B".into(),
                predicted: "A".into(),
                neighbours: vec![Neighbour { index: 2, id: 7, distance: 2.0 }],
            },
        ];
        let mut buf = Vec::new();
        write_neighbours(&mut buf, &predictions).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "7;3:0.1;2:0.3333333333333333\n8;7:2\n"
        );
    }
}
