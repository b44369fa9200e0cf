/// Signature envelope discriminant (first byte of every envelope).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SignatureType {
    /// `u8` threshold, chain-bound subdigest.
    Legacy = 0x00,
    /// `u16` threshold, chain-bound subdigest.
    Dynamic = 0x01,
    /// Dynamic layout over the chain-agnostic subdigest.
    NoChainId = 0x02,
    /// Ordered list of nested envelopes.
    Chained = 0x03,
}

impl SignatureType {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for SignatureType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use SignatureType::*;
        let ty = match value {
            0x00 => Legacy,
            0x01 => Dynamic,
            0x02 => NoChainId,
            0x03 => Chained,
            other => return Err(other),
        };
        Ok(ty)
    }
}
