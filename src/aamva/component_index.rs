use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

use super::dlid::{MandatoryElement, MANDATORY_ELEMENTS};

/// Multibase header of the base64url (no padding) encoding.
pub const MULTIBASE_BASE64URL: char = 'u';

/// Length of the multibase text form: header plus four base64url characters.
pub const ENCODED_LEN: usize = 5;

/// Number of bits of a component index.
pub const BITS: usize = 24;

const RESERVED_BITS: u32 = 0b11;

#[derive(Debug, thiserror::Error)]
pub enum InvalidComponentIndex {
    #[error("encoded component index must be exactly 5 characters long, found {0}")]
    InvalidLength(usize),

    #[error("invalid multibase header `{0}`, expected base64url (`u`)")]
    InvalidMultibaseHeader(char),

    #[error(transparent)]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("component index must decode to exactly 3 bytes, found {0}")]
    InvalidByteLength(usize),

    #[error("ordinal {0} out of range, must be between 0 and 23")]
    IndexOutOfRange(usize),

    #[error("reserved low-order bits of component index {0:#026b} must be zero")]
    InvalidReservedBits(u32),

    #[error("component index {0:#x} does not fit in 24 bits")]
    TooWide(u32),
}

/// Decodes the multibase text form of a component index into its 24-bit value.
///
/// Reserved bits are returned as found.
pub fn decode_component_index(encoded: &str) -> Result<u32, InvalidComponentIndex> {
    let len = encoded.chars().count();
    if len != ENCODED_LEN {
        return Err(InvalidComponentIndex::InvalidLength(len));
    }

    let mut chars = encoded.chars();
    match chars.next() {
        Some(MULTIBASE_BASE64URL) => (),
        Some(c) => return Err(InvalidComponentIndex::InvalidMultibaseHeader(c)),
        None => return Err(InvalidComponentIndex::InvalidLength(0)),
    }

    let bytes = URL_SAFE_NO_PAD.decode(chars.as_str())?;
    match <[u8; 3]>::try_from(bytes.as_slice()) {
        Ok(b) => Ok(u32::from_be_bytes([0, b[0], b[1], b[2]])),
        Err(_) => Err(InvalidComponentIndex::InvalidByteLength(bytes.len())),
    }
}

/// Encodes a 24-bit field index into its multibase text form.
pub fn encode_component_index(bits: u32) -> Result<String, InvalidComponentIndex> {
    ComponentIndex::from_bits(bits).map(|index| index.encode())
}

/// Single-bit mask selecting the `i`-th element of [`MANDATORY_ELEMENTS`].
///
/// Ordinal `0` is the most significant bit.
pub fn bitmask_for_ordinal(i: usize) -> Result<u32, InvalidComponentIndex> {
    if i < BITS {
        Ok(mask_of_index(i))
    } else {
        Err(InvalidComponentIndex::IndexOutOfRange(i))
    }
}

fn mask_of_index(i: usize) -> u32 {
    1u32 << (BITS - 1 - i)
}

/// Set of mandatory elements, stored as a 24-bit big-endian bitmap over
/// [`MANDATORY_ELEMENTS`].
///
/// The two low-order bits are reserved and always zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ComponentIndex(u32);

impl ComponentIndex {
    /// Every mandatory element (`u___8`).
    pub const ALL_MANDATORY: Self = Self(0xff_ff_fc);

    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bits(bits: u32) -> Result<Self, InvalidComponentIndex> {
        if bits >> BITS != 0 {
            return Err(InvalidComponentIndex::TooWide(bits));
        }

        if bits & RESERVED_BITS != 0 {
            return Err(InvalidComponentIndex::InvalidReservedBits(bits));
        }

        Ok(Self(bits))
    }

    pub fn from_elements(elements: impl IntoIterator<Item = MandatoryElement>) -> Self {
        let mut index = Self::new();
        for e in elements {
            index.insert(e);
        }

        index
    }

    pub fn decode(encoded: &str) -> Result<Self, InvalidComponentIndex> {
        Self::from_bits(decode_component_index(encoded)?)
    }

    pub fn encode(&self) -> String {
        let bytes = self.0.to_be_bytes();
        let mut result = String::with_capacity(ENCODED_LEN);
        result.push(MULTIBASE_BASE64URL);
        URL_SAFE_NO_PAD.encode_string(&bytes[1..], &mut result);
        result
    }

    pub fn into_u32(self) -> u32 {
        self.0
    }

    fn mask_of(e: MandatoryElement) -> u32 {
        mask_of_index(e.ordinal())
    }

    pub fn contains_ordinal(&self, i: usize) -> bool {
        bitmask_for_ordinal(i).is_ok_and(|mask| self.0 & mask != 0)
    }

    pub fn contains(&self, e: MandatoryElement) -> bool {
        self.0 & Self::mask_of(e) != 0
    }

    pub fn insert(&mut self, e: MandatoryElement) {
        self.0 |= Self::mask_of(e)
    }

    pub fn remove(&mut self, e: MandatoryElement) {
        self.0 &= !Self::mask_of(e)
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Selected elements, in [`MANDATORY_ELEMENTS`] order.
    pub fn iter(&self) -> impl '_ + Iterator<Item = MandatoryElement> {
        MANDATORY_ELEMENTS
            .iter()
            .enumerate()
            .filter_map(|(i, e)| {
                if self.contains_ordinal(i) {
                    Some(*e)
                } else {
                    None
                }
            })
    }
}

impl TryFrom<u32> for ComponentIndex {
    type Error = InvalidComponentIndex;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_bits(value)
    }
}

impl From<ComponentIndex> for u32 {
    fn from(value: ComponentIndex) -> Self {
        value.0
    }
}

impl std::str::FromStr for ComponentIndex {
    type Err = InvalidComponentIndex;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl std::fmt::Display for ComponentIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_masks() {
        assert_eq!(bitmask_for_ordinal(0).unwrap(), 0b100000000000000000000000);
        assert_eq!(bitmask_for_ordinal(1).unwrap(), 0b010000000000000000000000);
        assert_eq!(bitmask_for_ordinal(23).unwrap(), 0b1);

        let mut seen = 0u32;
        for i in 0..BITS {
            let mask = bitmask_for_ordinal(i).unwrap();
            assert_eq!(mask.count_ones(), 1);
            assert_eq!(seen & mask, 0);
            seen |= mask;
        }

        assert_eq!(seen, 0xff_ff_ff);
    }

    #[test]
    fn ordinal_out_of_range() {
        for i in [24, 100, usize::MAX] {
            assert!(matches!(
                bitmask_for_ordinal(i),
                Err(InvalidComponentIndex::IndexOutOfRange(j)) if j == i
            ));
        }
    }

    #[test]
    fn decode() {
        assert_eq!(
            decode_component_index("uP_BA").unwrap(),
            0b001111111111000001000000
        );
        assert_eq!(
            decode_component_index("u___8").unwrap(),
            0b111111111111111111111100
        );
        assert_eq!(
            ComponentIndex::decode("u___8").unwrap(),
            ComponentIndex::ALL_MANDATORY
        );
    }

    #[test]
    fn invalid_header() {
        for header in ['v', 'z', '0', '1', '2', '3', '4', '5'] {
            let encoded = format!("{header}____");
            assert!(matches!(
                decode_component_index(&encoded),
                Err(InvalidComponentIndex::InvalidMultibaseHeader(c)) if c == header
            ));
        }
    }

    #[test]
    fn invalid_length() {
        for encoded in ["", "u", "uP", "uP_", "uP__", "uP___X"] {
            assert!(matches!(
                decode_component_index(encoded),
                Err(InvalidComponentIndex::InvalidLength(_))
            ));
        }
    }

    #[test]
    fn invalid_base64() {
        assert!(matches!(
            decode_component_index("uP+BA"),
            Err(InvalidComponentIndex::InvalidBase64(_))
        ));
    }

    #[test]
    fn encode() {
        assert_eq!(encode_component_index(0b001111111111000001000000).unwrap(), "uP_BA");
        assert_eq!(ComponentIndex::ALL_MANDATORY.encode(), "u___8");
        assert_eq!(ComponentIndex::new().encode(), "uAAAA");
    }

    #[test]
    fn reserved_bits() {
        for bits in [0b01, 0b10, 0b111111111111111111111111] {
            assert!(matches!(
                encode_component_index(bits),
                Err(InvalidComponentIndex::InvalidReservedBits(b)) if b == bits
            ));
        }

        assert!(matches!(
            ComponentIndex::decode("u___-"),
            Err(InvalidComponentIndex::InvalidReservedBits(_))
        ));
        assert!(matches!(
            encode_component_index(1 << 24),
            Err(InvalidComponentIndex::TooWide(_))
        ));
    }

    #[test]
    fn round_trip() {
        for bits in [0, 0b100, 0xff_ff_fc, 0b001111111111000001000000, 0x80_00_00] {
            let encoded = encode_component_index(bits).unwrap();
            assert_eq!(encoded.len(), ENCODED_LEN);
            assert_eq!(decode_component_index(&encoded).unwrap(), bits);
        }
    }

    #[test]
    fn element_set() {
        let mut index = ComponentIndex::new();
        index.insert(MandatoryElement::CustomerFirstName);
        index.insert(MandatoryElement::CustomerFamilyName);
        index.insert(MandatoryElement::CustomerIdNumber);
        assert_eq!(index.into_u32(), 0b100000100000000000100000);
        assert_eq!(index.encode(), "uggAg");
        assert_eq!(index.len(), 3);

        assert_eq!(
            index.iter().collect::<Vec<_>>(),
            [
                MandatoryElement::CustomerFirstName,
                MandatoryElement::CustomerIdNumber,
                MandatoryElement::CustomerFamilyName
            ]
        );

        index.remove(MandatoryElement::CustomerIdNumber);
        assert!(!index.contains(MandatoryElement::CustomerIdNumber));
        assert!(index.contains(MandatoryElement::CustomerFamilyName));
        assert!(!index.contains_ordinal(22));
    }

    #[test]
    fn all_mandatory_elements() {
        let index = ComponentIndex::from_elements(MandatoryElement::LIST);

        assert_eq!(index, ComponentIndex::ALL_MANDATORY);
        assert_eq!(index.len(), MandatoryElement::COUNT);
        assert_eq!(index.iter().collect::<Vec<_>>(), *MANDATORY_ELEMENTS);
    }
}
