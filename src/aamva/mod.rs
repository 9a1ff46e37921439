//! AAMVA driver's license and ID card barcode data.
//!
//! Decodes the PDF417 payload of a DL/ID card, selects data elements from its
//! `DL` or `ID` subfile and produces the canonical form and digest of the
//! selection.
pub mod canonical;
pub mod component_index;
pub mod dlid;
pub mod selector;

pub use canonical::{canonicalize, hash, hash_base64url};
pub use component_index::{
    bitmask_for_ordinal, decode_component_index, encode_component_index, ComponentIndex,
    InvalidComponentIndex,
};
pub use dlid::{decode, Container, DecodeError, FieldMap, Input, MandatoryElement};
pub use selector::{select, SelectError, Selector, SelectorRequest};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Select(#[from] SelectError),
}

/// Decodes `input` and selects data elements from its `DL` or `ID` subfile.
pub fn parse<'a>(input: impl Into<Input<'a>>, selector: &Selector) -> Result<FieldMap, ParseError> {
    let container = decode(input)?;
    Ok(select(&container, selector)?)
}

#[cfg(test)]
mod tests {
    use super::{dlid::ContainerBuilder, *};

    #[test]
    fn parse_selects_from_decoded_container() {
        let mut builder = ContainerBuilder::new(636000, 9, 0);
        builder.push(*b"DL", [("DAC", "JOHN"), ("DCS", "SMITH"), ("DAW", "160")]);
        let bytes = builder.to_bytes();

        let fields = parse(&bytes, &Selector::Mandatory).unwrap();
        assert_eq!(canonicalize(&fields), b"DACJOHN\nDCSSMITH\n");
    }

    #[test]
    fn parse_with_missing_subfiles() {
        let bytes = b"@\n\x1e\rANSI 000000090002DL00410016ZZ00570007DLDAQ123\nDCSDOE\r";

        let fields = parse(bytes, &Selector::fields(["DCS"])).unwrap();
        assert_eq!(canonicalize(&fields), b"DCSDOE\n");
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            parse(b"@\n\x1e\rANSI 000000090001DL00310010DLDAQ1", &Selector::All),
            Err(ParseError::Decode(DecodeError::TruncatedInput { .. }))
        ));
        assert!(matches!(
            parse(b"@\n\x1e\rANSI", &Selector::All),
            Err(ParseError::Select(SelectError::SubfileNotFound))
        ));

        let mut builder = ContainerBuilder::new(636000, 9, 0);
        builder.push(*b"ZZ", [("ZZA", "X")]);
        assert!(matches!(
            parse(&builder.to_bytes(), &Selector::All),
            Err(ParseError::Select(SelectError::SubfileNotFound))
        ));
    }
}
