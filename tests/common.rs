pub const SIGNATURE_DATA: &str = "NRecFIyZjocrir2Zuzp3KDOYh30ohkVkVqJzq+Ns2kjfm2KLbDesFNsrPqIpsRueu8rb6V0tcYjyDs5jETx95EgJeCjGmRZLzJ0WNeYcQwEDO/UuMXUwR1lFMxNic2Hx9+Z5NLNMxjt4wsk6pBEXO1Ul0T/4LFEKzRM31Vf+z0l5x077DZwtb3V88Nwq26xaDDZZW1xAi0I99limW7fZqZ0DQFvcEeiCqTq0EvNieXXU/sYB";

/// Decoded PDF417 payload of a sample driver's license: a `DL` subfile
/// followed by a `ZZ` subfile holding a signature.
pub fn pdf417_string() -> String {
    format!(
        "@\n\x1e\rANSI 000000090002DL00410267ZZ03080162\
        DLDAQ00000000\nDCSDOE\nDDEN\nDACJOHN\nDDFN\nDADNONE\nDDGN\nDCANONE\nDCBNONE\nDCDNONE\n\
        DBD01012024\nDBB01011950\nDBA01012029\nDBC1\nDAU072 IN\nDAYBLK\nDAG123 EXAMPLE ST\n\
        DAIGOTHAM\nDAJNY\nDAK123450000  \nDCFTESTDOCDISCRIM\nDCGUSA\nDAW160\nDCK1234567890\n\
        DDAN\nDDB01012000\r\
        ZZZZA{SIGNATURE_DATA}\r"
    )
}

pub const SELECTED_CANONICAL: &str = "DAG123 EXAMPLE ST\nDAIGOTHAM\nDAJNY\nDAK123450000  \n\
    DAQ00000000\nDAU072 IN\nDAYBLK\nDBA01012029\nDBB01011950\nDBC1\nDCGUSA\n";

pub const MANDATORY_CANONICAL: &str = "DACJOHN\nDADNONE\nDAG123 EXAMPLE ST\nDAIGOTHAM\nDAJNY\n\
    DAK123450000  \nDAQ00000000\nDAU072 IN\nDAYBLK\nDBA01012029\nDBB01011950\nDBC1\n\
    DBD01012024\nDCANONE\nDCBNONE\nDCDNONE\nDCFTESTDOCDISCRIM\nDCGUSA\nDCSDOE\nDDEN\nDDFN\nDDGN\n";

pub const COMPLETE_CANONICAL: &str = "DACJOHN\nDADNONE\nDAG123 EXAMPLE ST\nDAIGOTHAM\nDAJNY\n\
    DAK123450000  \nDAQ00000000\nDAU072 IN\nDAW160\nDAYBLK\nDBA01012029\nDBB01011950\nDBC1\n\
    DBD01012024\nDCANONE\nDCBNONE\nDCDNONE\nDCFTESTDOCDISCRIM\nDCGUSA\nDCK1234567890\nDCSDOE\n\
    DDAN\nDDB01012000\nDDEN\nDDFN\nDDGN\n";
