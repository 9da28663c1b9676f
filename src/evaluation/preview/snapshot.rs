use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Progress of a leave-one-out run, as sent to the status line.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub algorithm: String,
    pub instances_seen: u64,
    pub total: u64,
    /// Running accuracy of the primary decision (CId, or the kNN vote).
    pub accuracy: f64,
    pub seconds: f64,
    pub extras: BTreeMap<String, f64>,
}

impl Snapshot {
    #[inline]
    fn fmtv(v: f64) -> String {
        if v.is_nan() {
            "NaN".into()
        } else {
            format!("{:.6}", v)
        }
    }

    pub fn is_final(&self) -> bool {
        self.instances_seen >= self.total
    }
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}: seen={}/{}, acc={}, t={:.6}s",
            self.algorithm,
            self.instances_seen,
            self.total,
            Self::fmtv(self.accuracy),
            self.seconds
        )?;

        const ORDER: &[&str] = &["accuracy_nc"];

        for key in ORDER {
            if let Some(v) = self.extras.get(*key) {
                write!(f, ", {}={}", key, Self::fmtv(*v))?;
            }
        }

        for (k, v) in self.extras.iter() {
            if ORDER.iter().any(|kk| *kk == k.as_str()) {
                continue;
            }
            write!(f, ", {}={}", k, Self::fmtv(*v))?;
        }

        Ok(())
    }
}
