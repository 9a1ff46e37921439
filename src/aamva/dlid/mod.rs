//! AAMVA DL/ID container decoding.
//!
//! See: <https://www.aamva.org/assets/best-practices,-guides,-standards,-manuals,-whitepapers/aamva-dl-id-card-design-standard-(2020)>
use std::collections::BTreeMap;

use serde::Serialize;

use crate::binary::{self, Record, Value};

mod macros;
pub(crate) use macros::*;

mod elements;
pub use elements::*;

pub mod pdf_417;
pub use pdf_417::{ContainerBuilder, CONTAINER_SCHEMA};

/// Subfile types carrying the cardholder's data elements.
pub const IDENTITY_SUBFILE_TYPES: [&str; 2] = ["DL", "ID"];

/// Data elements of a subfile, by three-character code.
pub type FieldMap = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("unsupported input encoding `{0}`")]
    InvalidInputType(String),

    #[error("subfile `{subfile}` is not terminated")]
    TruncatedInput { subfile: String },

    #[error(transparent)]
    Parse(#[from] binary::Error),

    #[error("missing container field `{0}`")]
    MissingField(&'static str),
}

/// Raw barcode payload.
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    Bytes(&'a [u8]),

    /// Text tagged with its encoding. Only UTF-8 is accepted.
    Text { text: &'a str, encoding: &'a str },
}

impl<'a> Input<'a> {
    pub fn tagged(text: &'a str, encoding: &'a str) -> Self {
        Self::Text { text, encoding }
    }

    pub fn as_bytes(&self) -> Result<&'a [u8], DecodeError> {
        match *self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::Text { text, encoding } => {
                if encoding.eq_ignore_ascii_case("utf-8") || encoding.eq_ignore_ascii_case("utf8") {
                    Ok(text.as_bytes())
                } else {
                    Err(DecodeError::InvalidInputType(encoding.to_owned()))
                }
            }
        }
    }
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(value: &'a [u8]) -> Self {
        Self::Bytes(value)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Input<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        Self::Bytes(value)
    }
}

impl<'a> From<&'a Vec<u8>> for Input<'a> {
    fn from(value: &'a Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(value: &'a str) -> Self {
        Self::tagged(value, "utf-8")
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(value: &'a String) -> Self {
        Self::tagged(value, "utf-8")
    }
}

/// Decoded AAMVA container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub compliance: String,
    pub element_separator: String,
    pub record_separator: String,
    pub segment_terminator: String,
    pub file_type: String,
    pub issuer_identification_number: String,
    pub aamva_version_number: String,
    pub jurisdiction_version_number: String,
    pub number_of_entries: u64,
    pub entries: Vec<Entry>,
    pub subfiles: Vec<Subfile>,
}

/// Subfile directory entry.
///
/// Informative only: subfiles are read sequentially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    #[serde(rename = "type")]
    pub subfile_type: String,
    pub offset: u64,
    pub length: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subfile {
    #[serde(rename = "type")]
    pub subfile_type: String,
    pub data: FieldMap,
}

impl Container {
    fn from_record(mut record: Record) -> Result<Self, DecodeError> {
        let element_separator = take_raw(&mut record, "elementSeparator")?;

        let entries = take_array(&mut record, "entries")?
            .into_iter()
            .map(|mut entry| -> Result<Entry, DecodeError> {
                Ok(Entry {
                    subfile_type: take_string(&mut entry, "type")?,
                    offset: take_int(&mut entry, "offset")?,
                    length: take_int(&mut entry, "length")?,
                })
            })
            .collect::<Result<_, _>>()?;

        let subfiles = take_array(&mut record, "subfiles")?
            .into_iter()
            .map(|mut subfile| -> Result<Subfile, DecodeError> {
                let subfile_type = take_string(&mut subfile, "type")?;
                let run = match subfile.take("data") {
                    Some(Value::Bytes(run)) => run,
                    _ => return Err(DecodeError::MissingField("data")),
                };

                if !run.terminated {
                    return Err(DecodeError::TruncatedInput {
                        subfile: subfile_type,
                    });
                }

                let separator = element_separator
                    .first()
                    .copied()
                    .ok_or(DecodeError::MissingField("elementSeparator"))?;
                let data = tokenize(&run.data, separator);
                tracing::trace!(subfile = %subfile_type, elements = data.len(), "tokenized subfile");

                Ok(Subfile { subfile_type, data })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            compliance: take_text(&mut record, "compliance")?,
            element_separator: String::from_utf8_lossy(&element_separator).into_owned(),
            record_separator: take_text(&mut record, "recordSeparator")?,
            segment_terminator: take_text(&mut record, "segmentTerminator")?,
            file_type: take_string(&mut record, "fileType")?,
            issuer_identification_number: take_string(&mut record, "issuerIdentificationNumber")?,
            aamva_version_number: take_string(&mut record, "aamvaVersionNumber")?,
            jurisdiction_version_number: take_string(&mut record, "jurisdictionVersionNumber")?,
            number_of_entries: take_int(&mut record, "numberOfEntries")?,
            entries,
            subfiles,
        })
    }

    /// First subfile of the given type.
    pub fn subfile(&self, subfile_type: &str) -> Option<&Subfile> {
        self.subfiles
            .iter()
            .find(|s| s.subfile_type == subfile_type)
    }

    /// First `DL` or `ID` subfile.
    pub fn identity_subfile(&self) -> Option<&Subfile> {
        self.subfiles
            .iter()
            .find(|s| IDENTITY_SUBFILE_TYPES.contains(&s.subfile_type.as_str()))
    }
}

/// Decodes a raw barcode payload into a [`Container`].
///
/// Fixed-width integers that are not decimal numbers read as `0`, and the
/// directory entries are not checked against the subfiles actually present.
/// Input ending early yields short fields and fewer subfiles than declared;
/// only a subfile missing its segment terminator is an error.
pub fn decode<'a>(input: impl Into<Input<'a>>) -> Result<Container, DecodeError> {
    let bytes = input.into().as_bytes()?;
    let (record, consumed) = CONTAINER_SCHEMA.parse(bytes)?;
    let container = Container::from_record(record)?;

    tracing::debug!(
        issuer = %container.issuer_identification_number,
        entries = container.number_of_entries,
        subfiles = ?container.subfiles.iter().map(|s| s.subfile_type.as_str()).collect::<Vec<_>>(),
        consumed,
        "decoded AAMVA container"
    );

    Ok(container)
}

/// Splits a subfile payload into data elements.
///
/// Each element starts with its three-character code, immediately followed
/// by the value. Later occurrences of a code replace earlier ones.
pub fn tokenize(data: &[u8], element_separator: u8) -> FieldMap {
    data.split(|b| *b == element_separator)
        .map(|element| {
            let element = String::from_utf8_lossy(element);
            let at = element
                .char_indices()
                .nth(3)
                .map_or(element.len(), |(i, _)| i);
            let (code, value) = element.split_at(at);
            (code.to_owned(), value.to_owned())
        })
        .collect()
}

fn take_string(record: &mut Record, name: &'static str) -> Result<String, DecodeError> {
    match record.take(name) {
        Some(Value::String(s)) => Ok(s),
        _ => Err(DecodeError::MissingField(name)),
    }
}

fn take_raw(record: &mut Record, name: &'static str) -> Result<Vec<u8>, DecodeError> {
    match record.take(name) {
        Some(Value::Raw(bytes)) => Ok(bytes),
        _ => Err(DecodeError::MissingField(name)),
    }
}

/// Control character, for display.
fn take_text(record: &mut Record, name: &'static str) -> Result<String, DecodeError> {
    take_raw(record, name).map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

fn take_int(record: &mut Record, name: &'static str) -> Result<u64, DecodeError> {
    match record.take(name) {
        Some(Value::Int(n)) => Ok(n),
        _ => Err(DecodeError::MissingField(name)),
    }
}

fn take_array(record: &mut Record, name: &'static str) -> Result<Vec<Record>, DecodeError> {
    match record.take(name) {
        Some(Value::Array(items)) => Ok(items),
        _ => Err(DecodeError::MissingField(name)),
    }
}
