//! Head byte and length framing shared by the reader and the writer.

// CBOR major types
pub const MAJOR_UNSIGNED: u8 = 0;
pub const MAJOR_NEGATIVE: u8 = 1;
pub const MAJOR_BYTES: u8 = 2;
pub const MAJOR_TEXT: u8 = 3;
pub const MAJOR_ARRAY: u8 = 4;
pub const MAJOR_MAP: u8 = 5;
pub const MAJOR_TAG: u8 = 6;
pub const MAJOR_SIMPLE: u8 = 7;

// Additional info values
pub const FALSE: u8 = 20;
pub const TRUE: u8 = 21;
pub const NULL: u8 = 22;
pub const UNDEFINED: u8 = 23;
pub const ONE_BYTE: u8 = 24;
pub const TWO_BYTES: u8 = 25;
pub const FOUR_BYTES: u8 = 26;
pub const EIGHT_BYTES: u8 = 27;
pub const INDEFINITE: u8 = 31;

/// Break stop code terminating indefinite-length items
pub const BREAK: u8 = 0xFF;

/// The first byte of every CBOR data item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Head {
    pub major: u8,
    pub info: u8,
}

impl Head {
    pub fn from_byte(byte: u8) -> Self {
        Head {
            major: byte >> 5,
            info: byte & 0x1f,
        }
    }

    pub fn to_byte(self) -> u8 {
        (self.major << 5) | self.info
    }

    pub fn is_break(self) -> bool {
        self.to_byte() == BREAK
    }

    /// Number of argument bytes following the head, or `None` for the
    /// reserved values 28..=30 and the indefinite marker.
    pub fn argument_width(self) -> Option<usize> {
        match self.info {
            0..=23 => Some(0),
            ONE_BYTE => Some(1),
            TWO_BYTES => Some(2),
            FOUR_BYTES => Some(4),
            EIGHT_BYTES => Some(8),
            _ => None,
        }
    }
}

/// A resolved string/aggregate length.
///
/// For maps the count is in pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Definite(u64),
    Indefinite,
}

impl Length {
    pub fn definite(self) -> Option<u64> {
        match self {
            Length::Definite(n) => Some(n),
            Length::Indefinite => None,
        }
    }

    pub fn is_indefinite(self) -> bool {
        self == Length::Indefinite
    }
}

/// Additional info that encodes `value` in the fewest bytes.
pub(crate) fn minimal_info(value: u64) -> u8 {
    if value < 24 {
        value as u8
    } else if value <= u8::MAX as u64 {
        ONE_BYTE
    } else if value <= u16::MAX as u64 {
        TWO_BYTES
    } else if value <= u32::MAX as u64 {
        FOUR_BYTES
    } else {
        EIGHT_BYTES
    }
}

/// Whether major type `major` may carry the indefinite-length marker.
pub(crate) fn allows_indefinite(major: u8) -> bool {
    matches!(major, MAJOR_BYTES | MAJOR_TEXT | MAJOR_ARRAY | MAJOR_MAP)
}
