//! This library decodes the AAMVA data carried by the PDF417 barcode of
//! driver's licenses and ID cards, and derives a canonical, hashable form of
//! a selection of its data elements, as used by
//! [Verifiable Credential Barcodes][vc-barcodes].
//!
//! ```
//! use aamva_canonicalize::{aamva::dlid::ContainerBuilder, canonicalize, parse, Selector};
//!
//! let mut builder = ContainerBuilder::new(636000, 9, 0);
//! builder.push(*b"DL", [("DCS", "SMITH"), ("DAC", "JOHN"), ("DAW", "160")]);
//! let barcode = builder.to_bytes();
//!
//! let selector = Selector::component_index("ugAAA").unwrap();
//! let fields = parse(&barcode, &selector).unwrap();
//! assert_eq!(canonicalize(&fields), b"DACJOHN\n");
//! ```
//!
//! [vc-barcodes]: <https://w3c-ccg.github.io/vc-barcodes/>
pub mod aamva;
pub mod binary;

pub use aamva::{
    canonicalize, decode, hash, hash_base64url, parse, select, ComponentIndex, Container,
    FieldMap, Selector,
};
