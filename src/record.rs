use crate::errors::{FormatError, HeaderKind};
use crate::global_header::Resolution;

use nom::bytes::complete::take;
use nom::number::{complete as number, Endianness};
use nom::sequence::tuple;
use nom::IResult;

pub const RECORD_HEADER_LENGTH: usize = 16;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

///
/// Exact capture timestamp, kept as the integer pair found in the record header
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timestamp {
    pub seconds: u32,
    pub subseconds: u32,
    pub resolution: Resolution,
}

impl Timestamp {
    pub fn new(seconds: u32, subseconds: u32, resolution: Resolution) -> Timestamp {
        Timestamp {
            seconds,
            subseconds,
            resolution,
        }
    }

    /// `seconds + subseconds / divisor`, lossy for large second counts.
    pub fn as_secs_f64(&self) -> f64 {
        f64::from(self.seconds) + f64::from(self.subseconds) / f64::from(self.resolution.divisor())
    }

    pub fn as_nanos(&self) -> u64 {
        u64::from(self.seconds) * NANOS_PER_SECOND
            + u64::from(self.subseconds) * self.resolution.nanos_per_tick()
    }

    ///
    /// Gap to an earlier timestamp in seconds. The subtraction happens on integer nanoseconds so only
    /// the result is rounded, not the two absolute times.
    ///
    pub fn seconds_since(&self, earlier: &Timestamp) -> f64 {
        let delta = i128::from(self.as_nanos()) - i128::from(earlier.as_nanos());
        delta as f64 / NANOS_PER_SECOND as f64
    }

    pub fn to_system_time(&self) -> std::time::SystemTime {
        std::time::UNIX_EPOCH + std::time::Duration::from_nanos(self.as_nanos())
    }
}

/// Sub-second fields at or above the divisor carry into the seconds, matching `as_secs_f64`.
impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let nanos = self.as_nanos();
        let seconds = nanos / NANOS_PER_SECOND;
        let fraction = nanos % NANOS_PER_SECOND;

        match self.resolution {
            Resolution::Microseconds => write!(f, "{}.{:06}", seconds, fraction / 1_000),
            Resolution::Nanoseconds => write!(f, "{}.{:09}", seconds, fraction),
        }
    }
}

///
/// Pcap record associated with a libpcap capture, borrowing its payload from the capture buffer
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PcapRecord<'a> {
    pub timestamp: Timestamp,
    pub actual_length: u32,
    pub original_length: u32,
    pub offset: usize,
    pub payload: &'a [u8],
}

fn record_header(input: &[u8], endianness: Endianness) -> IResult<&[u8], (u32, u32, u32, u32)> {
    tuple((
        number::u32(endianness),
        number::u32(endianness),
        number::u32(endianness),
        number::u32(endianness),
    ))(input)
}

fn record_payload(input: &[u8], length: usize) -> IResult<&[u8], &[u8]> {
    take(length)(input)
}

impl<'a> PcapRecord<'a> {
    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    pub fn actual_length(&self) -> u32 {
        self.actual_length
    }

    pub fn original_length(&self) -> u32 {
        self.original_length
    }

    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Whether the frame was cut short by the capture's snap length.
    pub fn is_truncated(&self) -> bool {
        self.original_length > self.actual_length
    }

    ///
    /// Parse one record starting at `input`, which sits `offset` bytes into the capture and is the
    /// `index`th record. The payload must be entirely present in `input`.
    ///
    pub fn parse(
        input: &'a [u8],
        offset: usize,
        index: usize,
        endianness: Endianness,
        resolution: Resolution,
    ) -> Result<(&'a [u8], PcapRecord<'a>), FormatError> {
        let (rem, (ts_seconds, ts_subseconds, actual_length, original_length)) =
            record_header(input, endianness).map_err(|_| FormatError::TruncatedHeader {
                kind: HeaderKind::Record,
                offset,
                needed: RECORD_HEADER_LENGTH,
                available: input.len(),
            })?;

        let needed = actual_length as usize;

        let (rem, payload) =
            record_payload(rem, needed).map_err(|_| FormatError::TruncatedPayload {
                index,
                offset,
                needed,
                available: rem.len(),
            })?;

        Ok((
            rem,
            PcapRecord {
                timestamp: Timestamp::new(ts_seconds, ts_subseconds, resolution),
                actual_length,
                original_length,
                offset,
                payload,
            },
        ))
    }
}

impl<'a> std::fmt::Display for PcapRecord<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Timestamp={}   Length={}   Original Length={}",
            self.timestamp, self.actual_length, self.original_length
        )
    }
}
