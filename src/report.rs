//! Lag statistics and ranking

use crate::domain::LagSample;
use serde::Serialize;
use std::cmp::Ordering;

/// Number of slowest updates listed by default
pub const DEFAULT_TOP: usize = 10;

/// Summary statistics over lag values, in days
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LagStatistics {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl LagStatistics {
    /// Computes statistics over lag values; `None` when there are none
    pub fn from_lags(lags: &[f64]) -> Option<Self> {
        if lags.is_empty() {
            return None;
        }

        let mut sorted = lags.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        Some(Self {
            count,
            mean,
            median,
            min: sorted[0],
            max: sorted[count - 1],
        })
    }

    /// Computes statistics over the lags of `samples`
    pub fn from_samples(samples: &[LagSample]) -> Option<Self> {
        let lags: Vec<f64> = samples.iter().map(|s| s.lag_days).collect();
        Self::from_lags(&lags)
    }
}

/// The `n` samples with the largest lag, ties kept in discovery order
pub fn slowest(samples: &[LagSample], n: usize) -> Vec<&LagSample> {
    let mut ranked: Vec<&LagSample> = samples.iter().collect();
    ranked.sort_by(|a, b| b.lag_days.partial_cmp(&a.lag_days).unwrap_or(Ordering::Equal));
    ranked.truncate(n);
    ranked
}
