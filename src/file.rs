use crate::errors::{FormatError, HeaderKind};
use crate::global_header::{GlobalHeader, Resolution, GLOBAL_HEADER_LENGTH};
use crate::record::{PcapRecord, Timestamp, RECORD_HEADER_LENGTH};

use log::*;
use nom::number::Endianness;

///
/// Lazy, single pass walk over the records following a global header. Yields each record in file
/// order, stops at a clean end of buffer, and stops for good after the first format error.
///
#[derive(Clone, Debug)]
pub struct PcapRecords<'a> {
    input: &'a [u8],
    offset: usize,
    index: usize,
    endianness: Endianness,
    resolution: Resolution,
    done: bool,
}

impl<'a> PcapRecords<'a> {
    ///
    /// Records in `input`, whose first byte sits `offset` bytes into the capture
    ///
    pub fn new(
        input: &'a [u8],
        offset: usize,
        endianness: Endianness,
        resolution: Resolution,
    ) -> PcapRecords<'a> {
        PcapRecords {
            input,
            offset,
            index: 0,
            endianness,
            resolution,
            done: false,
        }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    pub fn timestamps(self) -> impl Iterator<Item = Result<Timestamp, FormatError>> + 'a {
        self.map(|r| r.map(|record| record.timestamp))
    }

    ///
    /// Collect every record, or nothing if any part of the capture is malformed
    ///
    pub fn collect_all(self) -> Result<Vec<PcapRecord<'a>>, FormatError> {
        self.collect()
    }
}

impl<'a> Iterator for PcapRecords<'a> {
    type Item = Result<PcapRecord<'a>, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.input.is_empty() {
            trace!("Capture exhausted after {} records", self.index);
            self.done = true;
            return None;
        }

        if self.input.len() < RECORD_HEADER_LENGTH {
            self.done = true;
            warn!("{} trailing bytes at offset {}", self.input.len(), self.offset);
            return Some(Err(FormatError::TruncatedHeader {
                kind: HeaderKind::Record,
                offset: self.offset,
                needed: RECORD_HEADER_LENGTH,
                available: self.input.len(),
            }));
        }

        match PcapRecord::parse(
            self.input,
            self.offset,
            self.index,
            self.endianness,
            self.resolution,
        ) {
            Ok((rem, record)) => {
                trace!("Record {} at offset {}: {}", self.index, self.offset, record);

                self.offset += self.input.len() - rem.len();
                self.index += 1;
                self.input = rem;

                Some(Ok(record))
            }
            Err(e) => {
                warn!("Failed to parse record {}: {}", self.index, e);
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<'a> std::iter::FusedIterator for PcapRecords<'a> {}

pub struct CaptureFile<'a> {
    pub global_header: GlobalHeader,
    pub records: PcapRecords<'a>,
}

impl<'a> CaptureFile<'a> {
    ///
    /// Parse a slice of bytes that start with libpcap file format header (https://wiki.wireshark.org/Development/LibpcapFileFormat).
    /// Records are decoded lazily as `records` is iterated.
    ///
    pub fn parse(input: &'a [u8]) -> Result<CaptureFile<'a>, FormatError> {
        let (rem, header) = GlobalHeader::parse(input)?;

        debug!(
            "Global header version {}.{}, with endianness {:?} and {:?} timestamps",
            header.version_major,
            header.version_minor,
            header.endianness,
            header.resolution
        );

        trace!("{} bytes left for record parsing", rem.len());

        let records = PcapRecords::new(rem, GLOBAL_HEADER_LENGTH, header.endianness, header.resolution);

        Ok(CaptureFile {
            global_header: header,
            records,
        })
    }
}

///
/// Decode a whole capture buffer into its records, in file order. Any format error discards all
/// records decoded so far.
///
pub fn parse_capture(input: &[u8]) -> Result<Vec<PcapRecord<'_>>, FormatError> {
    let records = CaptureFile::parse(input)?.records.collect_all()?;

    debug!("Parsed {} records from {}B capture", records.len(), input.len());

    Ok(records)
}
