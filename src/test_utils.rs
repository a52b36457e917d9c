//! Builders for synthetic capture buffers used across the unit tests.

use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};

const MAGIC_MICROS: u32 = 0xa1b2c3d4;
const MAGIC_NANOS: u32 = 0xa1b23c4d;

pub struct TestRecord {
    seconds: u32,
    subseconds: u32,
    captured_length: Option<u32>,
    original_length: Option<u32>,
    payload: Vec<u8>,
}

impl TestRecord {
    pub fn new(seconds: u32, subseconds: u32, payload: &[u8]) -> TestRecord {
        TestRecord {
            seconds,
            subseconds,
            captured_length: None,
            original_length: None,
            payload: payload.to_vec(),
        }
    }

    /// Lie about the stored length in the record header.
    pub fn captured_length(mut self, length: u32) -> TestRecord {
        self.captured_length = Some(length);
        self
    }

    pub fn original_length(mut self, length: u32) -> TestRecord {
        self.original_length = Some(length);
        self
    }

    fn write<B: ByteOrder>(&self, out: &mut Vec<u8>) {
        let stored = self.payload.len() as u32;

        out.write_u32::<B>(self.seconds).unwrap();
        out.write_u32::<B>(self.subseconds).unwrap();
        out.write_u32::<B>(self.captured_length.unwrap_or(stored)).unwrap();
        out.write_u32::<B>(self.original_length.unwrap_or(stored)).unwrap();
        out.extend_from_slice(&self.payload);
    }
}

pub struct CaptureBuilder {
    big_endian: bool,
    magic: u32,
    records: Vec<TestRecord>,
}

impl CaptureBuilder {
    pub fn little_micros() -> CaptureBuilder {
        CaptureBuilder { big_endian: false, magic: MAGIC_MICROS, records: vec![] }
    }

    pub fn big_micros() -> CaptureBuilder {
        CaptureBuilder { big_endian: true, magic: MAGIC_MICROS, records: vec![] }
    }

    pub fn little_nanos() -> CaptureBuilder {
        CaptureBuilder { big_endian: false, magic: MAGIC_NANOS, records: vec![] }
    }

    pub fn big_nanos() -> CaptureBuilder {
        CaptureBuilder { big_endian: true, magic: MAGIC_NANOS, records: vec![] }
    }

    pub fn record(mut self, record: TestRecord) -> CaptureBuilder {
        self.records.push(record);
        self
    }

    /// One empty record per `(seconds, microseconds)` pair.
    pub fn timestamps(self, timestamps: &[(u32, u32)]) -> CaptureBuilder {
        timestamps
            .iter()
            .fold(self, |b, (s, us)| b.record(TestRecord::new(*s, *us, &[0u8; 4])))
    }

    pub fn build(&self) -> Vec<u8> {
        if self.big_endian {
            self.write::<BigEndian>()
        } else {
            self.write::<LittleEndian>()
        }
    }

    fn write<B: ByteOrder>(&self) -> Vec<u8> {
        let mut out = vec![];

        out.write_u32::<B>(self.magic).unwrap();
        out.write_u16::<B>(2).unwrap(); //version major
        out.write_u16::<B>(4).unwrap(); //version minor
        out.write_i32::<B>(0).unwrap(); //zone
        out.write_u32::<B>(0).unwrap(); //sig figs
        out.write_u32::<B>(65535).unwrap(); //snap length
        out.write_u32::<B>(1).unwrap(); //network, ethernet

        for record in &self.records {
            record.write::<B>(&mut out);
        }

        out
    }
}
