use crate::errors::{FormatError, HeaderKind};

use arrayref::array_ref;
use log::*;
use nom::number::{complete as number, Endianness};
use nom::sequence::tuple;
use nom::IResult;

pub const GLOBAL_HEADER_LENGTH: usize = 24;

const MAGIC_MICROS: u32 = 0xa1b2c3d4;
const MAGIC_MICROS_SWAPPED: u32 = 0xd4c3b2a1;
const MAGIC_NANOS: u32 = 0xa1b23c4d;
const MAGIC_NANOS_SWAPPED: u32 = 0x4d3cb2a1;

///
/// Unit of the sub-second timestamp field, selected by the magic number
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Microseconds,
    Nanoseconds,
}

impl Resolution {
    /// Sub-second ticks per second.
    pub fn divisor(self) -> u32 {
        match self {
            Resolution::Microseconds => 1_000_000,
            Resolution::Nanoseconds => 1_000_000_000,
        }
    }

    /// Nanoseconds per sub-second tick.
    pub fn nanos_per_tick(self) -> u64 {
        match self {
            Resolution::Microseconds => 1_000,
            Resolution::Nanoseconds => 1,
        }
    }
}

///
/// Global header of a libpcap capture (https://wiki.wireshark.org/Development/LibpcapFileFormat)
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobalHeader {
    pub endianness: Endianness,
    pub resolution: Resolution,
    pub version_major: u16,
    pub version_minor: u16,
    pub zone: i32,
    pub sig_figs: u32,
    pub snap_length: u32,
    pub network: u32,
}

fn header_fields(
    input: &[u8],
    endianness: Endianness,
) -> IResult<&[u8], (u16, u16, i32, u32, u32, u32)> {
    tuple((
        number::u16(endianness),
        number::u16(endianness),
        number::i32(endianness),
        number::u32(endianness),
        number::u32(endianness),
        number::u32(endianness),
    ))(input)
}

impl GlobalHeader {
    fn truncated(available: usize) -> FormatError {
        FormatError::TruncatedHeader {
            kind: HeaderKind::Global,
            offset: 0,
            needed: GLOBAL_HEADER_LENGTH,
            available,
        }
    }

    ///
    /// Decode the 24 byte global header, returning the bytes that follow it
    ///
    pub fn parse(input: &[u8]) -> Result<(&[u8], GlobalHeader), FormatError> {
        if input.len() < GLOBAL_HEADER_LENGTH {
            return Err(GlobalHeader::truncated(input.len()));
        }

        let magic = u32::from_be_bytes(*array_ref!(input, 0, 4));

        let (endianness, resolution) = match magic {
            MAGIC_MICROS => (Endianness::Big, Resolution::Microseconds),
            MAGIC_MICROS_SWAPPED => (Endianness::Little, Resolution::Microseconds),
            MAGIC_NANOS => (Endianness::Big, Resolution::Nanoseconds),
            MAGIC_NANOS_SWAPPED => (Endianness::Little, Resolution::Nanoseconds),
            _ => return Err(FormatError::BadMagic { magic }),
        };

        let (rem, (version_major, version_minor, zone, sig_figs, snap_length, network)) =
            header_fields(&input[4..], endianness)
                .map_err(|_| GlobalHeader::truncated(input.len()))?;

        trace!("Magic {:#010x} selects {:?} endian, {:?}", magic, endianness, resolution);

        Ok((
            rem,
            GlobalHeader {
                endianness,
                resolution,
                version_major,
                version_minor,
                zone,
                sig_figs,
                snap_length,
                network,
            },
        ))
    }
}
