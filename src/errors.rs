use thiserror::{Error as ThisError};

///
/// Which fixed-size header was cut short
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderKind {
    Global,
    Record,
}

impl std::fmt::Display for HeaderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            HeaderKind::Global => write!(f, "global"),
            HeaderKind::Record => write!(f, "record"),
        }
    }
}

///
/// Errors raised while walking the bytes of a capture file
///
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum FormatError {
    #[error("Unrecognized capture magic number {magic:#010x}")]
    BadMagic {
        magic: u32
    },
    #[error("Truncated {kind} header at offset {offset}: need {needed} bytes, have {available}")]
    TruncatedHeader {
        kind: HeaderKind,
        offset: usize,
        needed: usize,
        available: usize
    },
    #[error("Truncated payload of record {index} at offset {offset}: need {needed} bytes, have {available}")]
    TruncatedPayload {
        index: usize,
        offset: usize,
        needed: usize,
        available: usize
    }
}

///
/// Top level error for a parse-and-analyze pass
///
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum Error {
    #[error("Format error while parsing capture: {0}")]
    Format(#[from] FormatError),
    #[error("Capture of {size}B exceeds limit of {limit}B")]
    CaptureTooLarge {
        size: usize,
        limit: usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bad_magic() {
        let e = FormatError::BadMagic { magic: 0xdeadbeef };

        assert_eq!(format!("{}", e), "Unrecognized capture magic number 0xdeadbeef");
    }

    #[test]
    fn format_truncated_header() {
        let e = FormatError::TruncatedHeader {
            kind: HeaderKind::Record,
            offset: 40,
            needed: 16,
            available: 3
        };

        assert_eq!(format!("{}", e), "Truncated record header at offset 40: need 16 bytes, have 3");
    }

    #[test]
    fn wraps_format_error() {
        let e: Error = FormatError::BadMagic { magic: 0 }.into();

        assert_eq!(e, Error::Format(FormatError::BadMagic { magic: 0 }));
        assert!(std::error::Error::source(&e).is_some());
    }
}
