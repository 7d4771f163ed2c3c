use crate::models::Observation;
use serde::{Deserialize, Serialize};

/// Summary statistics over the numeric values of an observation set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub count: usize,
    /// Observations whose value is not a number (suppressed, `"."`, empty).
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

pub fn summarize(observations: &[Observation]) -> Summary {
    let mut vals: Vec<f64> = observations.iter().filter_map(Observation::value).collect();
    let missing = observations.len() - vals.len();
    vals.sort_by(|a, b| a.total_cmp(b));

    let count = vals.len();
    let min = vals.first().cloned();
    let max = vals.last().cloned();
    let mean = if count > 0 {
        Some(vals.iter().copied().sum::<f64>() / count as f64)
    } else {
        None
    };
    let median = if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    };
    Summary {
        count,
        missing,
        min,
        max,
        mean,
        median,
    }
}

/// Order by the year in each time label. The service does not sort observations.
///
/// Stable: within a year, and for labels without a year (which go last), the
/// service order is kept.
pub fn sort_chronologically(observations: &mut [Observation]) {
    observations.sort_by_key(|o| o.year().unwrap_or(i32::MAX));
}
