use crate::record::PcapRecord;

use log::*;

/// Gap in seconds that counts as a lull before a burst.
pub const HIGH_THRESHOLD: f64 = 0.05;
/// Gap in seconds that counts as burst traffic.
pub const LOW_THRESHOLD: f64 = 0.02;

///
/// Thresholds for the sudden burst rule: a gap longer than `high_threshold` immediately followed by
/// a gap shorter than `low_threshold`. Both comparisons are strict.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurstPolicy {
    pub high_threshold: f64,
    pub low_threshold: f64,
}

impl Default for BurstPolicy {
    fn default() -> Self {
        BurstPolicy {
            high_threshold: HIGH_THRESHOLD,
            low_threshold: LOW_THRESHOLD,
        }
    }
}

///
/// First place a burst was seen. `gap_index` indexes the inter-arrival times, so the short gap runs
/// from timestamp `gap_index` to `gap_index + 1` and the lull precedes it.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Burst {
    pub gap_index: usize,
    pub lull: f64,
    pub gap: f64,
}

impl BurstPolicy {
    pub fn new(high_threshold: f64, low_threshold: f64) -> BurstPolicy {
        BurstPolicy {
            high_threshold,
            low_threshold,
        }
    }

    pub fn with_high_threshold(mut self, high_threshold: f64) -> BurstPolicy {
        self.high_threshold = high_threshold;
        self
    }

    pub fn with_low_threshold(mut self, low_threshold: f64) -> BurstPolicy {
        self.low_threshold = low_threshold;
        self
    }

    pub fn is_burst(&self, lull: f64, gap: f64) -> bool {
        lull > self.high_threshold && gap < self.low_threshold
    }

    ///
    /// Scan consecutive pairs of inter-arrival times, stopping at the first match
    ///
    pub fn find_burst_in_gaps(&self, gaps: &[f64]) -> Option<Burst> {
        let found = gaps
            .windows(2)
            .position(|pair| self.is_burst(pair[0], pair[1]))
            .map(|i| Burst {
                gap_index: i + 1,
                lull: gaps[i],
                gap: gaps[i + 1],
            });

        if let Some(ref burst) = found {
            debug!(
                "Burst at gap {}: {}s lull followed by {}s gap",
                burst.gap_index, burst.lull, burst.gap
            );
        }

        found
    }

    pub fn find_burst(&self, timestamps: &[f64]) -> Option<Burst> {
        let gaps = inter_arrival_times(timestamps);

        trace!("Inter-arrival times: {:?}", gaps);

        self.find_burst_in_gaps(&gaps)
    }

    pub fn detect(&self, timestamps: &[f64]) -> bool {
        self.find_burst(timestamps).is_some()
    }

    ///
    /// Same rule over record timestamps, with each gap computed from the exact integer times
    ///
    pub fn detect_in_records(&self, records: &[PcapRecord]) -> bool {
        let gaps = records
            .windows(2)
            .map(|pair| pair[1].timestamp.seconds_since(&pair[0].timestamp))
            .collect::<Vec<_>>();

        trace!("Inter-arrival times: {:?}", gaps);

        self.find_burst_in_gaps(&gaps).is_some()
    }
}

/// `diff[i] = timestamps[i + 1] - timestamps[i]`, empty for fewer than two timestamps.
pub fn inter_arrival_times(timestamps: &[f64]) -> Vec<f64> {
    timestamps.windows(2).map(|pair| pair[1] - pair[0]).collect()
}

pub fn detect_burst_anomaly(timestamps: &[f64], policy: &BurstPolicy) -> bool {
    policy.detect(timestamps)
}
