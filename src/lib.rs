pub mod analysis;
pub mod errors;
pub mod file;
pub mod global_header;
pub mod record;

#[cfg(test)]
pub(crate) mod test_utils;

pub use analysis::{
    detect_burst_anomaly, inter_arrival_times, Burst, BurstPolicy, HIGH_THRESHOLD, LOW_THRESHOLD,
};
pub use errors::{Error, FormatError, HeaderKind};
pub use file::{parse_capture, CaptureFile, PcapRecords};
pub use global_header::{GlobalHeader, Resolution};
pub use nom::number::Endianness;
pub use record::{PcapRecord, Timestamp};

use log::*;

/// Largest capture buffer accepted by default, 256 MiB.
pub const DEFAULT_MAX_CAPTURE_LENGTH: usize = 256 * 1024 * 1024;

///
/// Settings for a parse-and-analyze pass, chosen by the application embedding the crate
///
#[derive(Clone, Debug, PartialEq)]
pub struct AnalyzerConfig {
    pub burst: BurstPolicy,
    /// `None` accepts buffers of any size.
    pub max_capture_length: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            burst: BurstPolicy::default(),
            max_capture_length: Some(DEFAULT_MAX_CAPTURE_LENGTH),
        }
    }
}

impl AnalyzerConfig {
    pub fn new(burst: BurstPolicy) -> AnalyzerConfig {
        AnalyzerConfig {
            burst,
            ..AnalyzerConfig::default()
        }
    }

    pub fn with_max_capture_length(mut self, max_capture_length: Option<usize>) -> AnalyzerConfig {
        self.max_capture_length = max_capture_length;
        self
    }

    fn check_length(&self, size: usize) -> Result<(), Error> {
        match self.max_capture_length {
            Some(limit) if size > limit => Err(Error::CaptureTooLarge { size, limit }),
            _ => Ok(()),
        }
    }
}

///
/// Outcome of analyzing one capture buffer
///
#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    Anomaly,
    NoAnomaly,
    Failed(Error),
}

impl Verdict {
    pub fn is_anomaly(&self) -> bool {
        *self == Verdict::Anomaly
    }

    pub fn is_failed(&self) -> bool {
        self.error().is_some()
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            Verdict::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Result<bool, Error>> for Verdict {
    fn from(v: Result<bool, Error>) -> Self {
        match v {
            Ok(true) => Verdict::Anomaly,
            Ok(false) => Verdict::NoAnomaly,
            Err(e) => Verdict::Failed(e),
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Verdict::Anomaly => write!(f, "Anomaly detected"),
            Verdict::NoAnomaly => write!(f, "No anomaly detected"),
            Verdict::Failed(e) => write!(f, "Analysis failed: {}", e),
        }
    }
}

fn try_analyze(input: &[u8], config: &AnalyzerConfig) -> Result<bool, Error> {
    config.check_length(input.len())?;

    let records = parse_capture(input)?;

    Ok(config.burst.detect_in_records(&records))
}

///
/// Decode a capture buffer and run the burst rule over its record timestamps
///
pub fn analyze_capture(input: &[u8], config: &AnalyzerConfig) -> Verdict {
    let verdict = Verdict::from(try_analyze(input, config));

    match verdict.error() {
        Some(e) => warn!("Capture of {}B rejected: {}", input.len(), e),
        None => debug!("{} in {}B capture", verdict, input.len()),
    }

    verdict
}
