use lazy_static::lazy_static;

use crate::binary::{Context, Schema, Value};

/// Compliance indicator of the standard header.
pub const COMPLIANCE_INDICATOR: u8 = b'@';

pub const DATA_ELEMENT_SEPARATOR: u8 = b'\n';

pub const RECORD_SEPARATOR: u8 = 0x1e;

pub const SEGMENT_TERMINATOR: u8 = b'\r';

pub const FILE_TYPE: [u8; 5] = *b"ANSI ";

const HEADER_SIZE: usize = 4 + 5 + 6 + 2 + 2 + 2;

const SUBFILE_DESIGNATOR_SIZE: usize = 2 + 4 + 4;

lazy_static! {
    /// Layout of a PDF417 AAMVA container.
    ///
    /// The header declares its own control characters, so subfiles are read
    /// up to the `segmentTerminator` byte found in the enclosing record rather
    /// than a hardcoded one. Control characters are kept as raw bytes.
    pub static ref CONTAINER_SCHEMA: Schema = Schema::builder()
        .raw("compliance", 1)
        .raw("elementSeparator", 1)
        .raw("recordSeparator", 1)
        .raw("segmentTerminator", 1)
        .string("fileType", 5)
        .string("issuerIdentificationNumber", 6)
        .string("aamvaVersionNumber", 2)
        .string("jurisdictionVersionNumber", 2)
        .int("numberOfEntries", 2)
        .array(
            "entries",
            "numberOfEntries",
            Schema::builder()
                .string("type", 2)
                .int("offset", 4)
                .int("length", 4)
                .build(),
        )
        .array(
            "subfiles",
            "numberOfEntries",
            Schema::builder()
                .string("type", 2)
                .bytes_until("data", is_segment_terminator)
                .build(),
        )
        .build();
}

fn is_segment_terminator(byte: u8, context: &Context<'_>) -> bool {
    context
        .parent()
        .and_then(|p| p.get("segmentTerminator"))
        .and_then(Value::as_raw)
        == Some(&[byte][..])
}

/// Writes AAMVA containers using the standard control characters.
///
/// Entry offsets and lengths are computed from the subfiles pushed.
pub struct ContainerBuilder {
    issuer_id: u32,
    version: u8,
    jurisdiction_version: u8,
    subfiles: Vec<([u8; 2], Vec<u8>)>,
}

impl ContainerBuilder {
    pub fn new(issuer_id: u32, version: u8, jurisdiction_version: u8) -> Self {
        Self {
            issuer_id,
            version,
            jurisdiction_version,
            subfiles: Vec::new(),
        }
    }

    /// Appends a subfile made of the given `(code, value)` elements.
    pub fn push<K, V>(
        &mut self,
        subfile_type: [u8; 2],
        elements: impl IntoIterator<Item = (K, V)>,
    ) -> &mut Self
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let mut data = Vec::new();
        for (i, (code, value)) in elements.into_iter().enumerate() {
            if i > 0 {
                data.push(DATA_ELEMENT_SEPARATOR);
            }

            data.extend_from_slice(code.as_ref());
            data.extend_from_slice(value.as_ref());
        }

        data.push(SEGMENT_TERMINATOR);
        self.subfiles.push((subfile_type, data));
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::new();

        result.extend([
            COMPLIANCE_INDICATOR,
            DATA_ELEMENT_SEPARATOR,
            RECORD_SEPARATOR,
            SEGMENT_TERMINATOR,
        ]);
        result.extend(FILE_TYPE);
        result.extend(encode_digits::<6>(self.issuer_id.into()));
        result.extend(encode_digits::<2>(self.version.into()));
        result.extend(encode_digits::<2>(self.jurisdiction_version.into()));
        result.extend(encode_digits::<2>(self.subfiles.len() as u64));

        let mut offset = HEADER_SIZE + SUBFILE_DESIGNATOR_SIZE * self.subfiles.len();
        for (subfile_type, data) in &self.subfiles {
            let length = subfile_type.len() + data.len();
            result.extend(subfile_type);
            result.extend(encode_digits::<4>(offset as u64));
            result.extend(encode_digits::<4>(length as u64));
            offset += length;
        }

        for (subfile_type, data) in &self.subfiles {
            result.extend(subfile_type);
            result.extend(data);
        }

        result
    }
}

fn encode_digits<const N: usize>(mut value: u64) -> [u8; N] {
    let mut digits = [b'0'; N];
    for d in digits.iter_mut().rev() {
        *d = b'0' + (value % 10) as u8;
        value /= 10;
    }

    digits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits() {
        assert_eq!(encode_digits::<2>(9), *b"09");
        assert_eq!(encode_digits::<4>(308), *b"0308");
        assert_eq!(encode_digits::<6>(636000), *b"636000");
    }

    #[test]
    fn write_container() {
        let mut builder = ContainerBuilder::new(636000, 9, 1);
        builder
            .push(*b"DL", [("DAQ", "123"), ("DCS", "DOE")])
            .push(*b"ZZ", [("ZZA", "X")]);

        assert_eq!(
            builder.to_bytes(),
            b"@\n\x1e\rANSI 636000090102DL00410016ZZ00570007DLDAQ123\nDCSDOE\rZZZZAX\r"
        );
    }

    #[test]
    fn schema_reads_written_container() {
        let mut builder = ContainerBuilder::new(1, 10, 0);
        builder.push(*b"ID", [("DAQ", "1")]);
        let bytes = builder.to_bytes();

        let (record, consumed) = CONTAINER_SCHEMA.parse(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(record.raw("segmentTerminator"), Some(&[SEGMENT_TERMINATOR][..]));
        assert_eq!(record.string("issuerIdentificationNumber"), Some("000001"));
        assert_eq!(record.int("numberOfEntries"), Some(1));

        let entries = record.array("entries").unwrap();
        assert_eq!(entries[0].int("offset"), Some(31));
        assert_eq!(entries[0].int("length"), Some(7));

        let subfiles = record.array("subfiles").unwrap();
        assert_eq!(subfiles[0].string("type"), Some("ID"));
        assert_eq!(subfiles[0].bytes("data").unwrap().data, b"DAQ1");
    }

    #[test]
    fn non_ascii_segment_terminator() {
        let bytes = b"@\n\x1e\x85ANSI 000000090001DL00310010DLDAQ\xef1\x85";
        let (record, consumed) = CONTAINER_SCHEMA.parse(bytes).unwrap();

        let run = record.array("subfiles").unwrap()[0].bytes("data").unwrap();
        assert!(run.terminated);
        assert_eq!(run.data, b"DAQ\xef1");
        assert_eq!(consumed, bytes.len());
    }
}
