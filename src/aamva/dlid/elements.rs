use std::collections::HashMap;

use lazy_static::lazy_static;

use super::data_elements_enum;

data_elements_enum! {
    /// Data elements every compliant DL/ID subfile carries.
    ///
    /// See: <https://www.aamva.org/assets/best-practices,-guides,-standards,-manuals,-whitepapers/aamva-dl-id-card-design-standard-(2020)>
    pub enum MandatoryElement {
        /// Jurisdiction-specific vehicle class (DCA).
        VehicleClass: "DCA",

        /// Jurisdiction-specific restriction codes (DCB).
        RestrictionCodes: "DCB",

        /// Jurisdiction-specific endorsement codes (DCD).
        EndorsementCodes: "DCD",

        /// Document Expiration Date (DBA).
        DocumentExpirationDate: "DBA",

        /// Customer Family Name (DCS).
        CustomerFamilyName: "DCS",

        /// Customer First Name (DAC).
        CustomerFirstName: "DAC",

        /// Customer Middle Name(s) (DAD).
        CustomerMiddleName: "DAD",

        /// Document Issue Date (DBD).
        DocumentIssueDate: "DBD",

        /// Date of Birth (DBB).
        DateOfBirth: "DBB",

        /// Physical Description – Sex (DBC).
        Sex: "DBC",

        /// Physical Description – Eye Color (DAY).
        EyeColor: "DAY",

        /// Physical Description – Height (DAU).
        Height: "DAU",

        /// Address – Street 1 (DAG).
        AddressStreet1: "DAG",

        /// Address – City (DAI).
        AddressCity: "DAI",

        /// Address – Jurisdiction Code (DAJ).
        AddressJurisdictionCode: "DAJ",

        /// Address – Postal Code (DAK).
        AddressPostalCode: "DAK",

        /// Customer ID Number (DAQ).
        CustomerIdNumber: "DAQ",

        /// Document Discriminator (DCF).
        DocumentDiscriminator: "DCF",

        /// Country Identification (DCG).
        CountryIdentification: "DCG",

        /// Family name truncation (DDE).
        FamilyNameTruncation: "DDE",

        /// First name truncation (DDF).
        FirstNameTruncation: "DDF",

        /// Middle name truncation (DDG).
        MiddleNameTruncation: "DDG"
    }
}

impl MandatoryElement {
    /// Position of the element in [`MANDATORY_ELEMENTS`].
    pub fn ordinal(&self) -> usize {
        MANDATORY_ORDINALS[self]
    }

    pub fn from_ordinal(i: usize) -> Option<Self> {
        MANDATORY_ELEMENTS.get(i).copied()
    }
}

lazy_static! {
    /// Mandatory elements sorted by code, in byte order.
    ///
    /// Component index bits and canonical ordering both refer to this order.
    pub static ref MANDATORY_ELEMENTS: [MandatoryElement; MandatoryElement::COUNT] = {
        let mut list = MandatoryElement::LIST;
        list.sort_by_key(MandatoryElement::id);
        list
    };
    static ref MANDATORY_ORDINALS: HashMap<MandatoryElement, usize> = MANDATORY_ELEMENTS
        .iter()
        .enumerate()
        .map(|(i, e)| (*e, i))
        .collect();
}
