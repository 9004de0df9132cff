use std::io::Write;

use half::f16;

use crate::error::Result;
use crate::head::*;

/// CBOR writer appending minimally framed data items to `W`.
///
/// Strings, arrays and maps are always written with a definite length, so
/// aggregate counts must be known up front.
///
/// ```
/// use cbor_codec::Encoder;
///
/// let mut encoder = Encoder::new(Vec::new());
/// encoder.start_map(1).unwrap();
/// encoder.write_string("a").unwrap();
/// encoder.write_number(1000).unwrap();
/// assert_eq!(encoder.into_inner(), [0xa1, 0x61, 0x61, 0x19, 0x03, 0xe8]);
/// ```
pub struct Encoder<W: Write> {
    writer: W,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Encoder { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Writes a head for `major` whose argument is `value`, using the
    /// narrowest width that holds it.
    pub fn write_head(&mut self, major: u8, value: u64) -> Result<()> {
        let info = minimal_info(value);
        self.writer.write_all(&[(major << 5) | info])?;
        match info {
            ONE_BYTE => self.writer.write_all(&[value as u8])?,
            TWO_BYTES => self.writer.write_all(&(value as u16).to_be_bytes())?,
            FOUR_BYTES => self.writer.write_all(&(value as u32).to_be_bytes())?,
            EIGHT_BYTES => self.writer.write_all(&value.to_be_bytes())?,
            _ => {}
        }
        Ok(())
    }

    fn write_simple(&mut self, info: u8) -> Result<()> {
        self.writer.write_all(&[(MAJOR_SIMPLE << 5) | info])?;
        Ok(())
    }

    pub fn write_number(&mut self, v: i64) -> Result<()> {
        if v >= 0 {
            self.write_head(MAJOR_UNSIGNED, v as u64)
        } else {
            self.write_head(MAJOR_NEGATIVE, (-1 - v) as u64)
        }
    }

    pub fn write_unsigned(&mut self, v: u64) -> Result<()> {
        self.write_head(MAJOR_UNSIGNED, v)
    }

    /// Writes `v` as a half-precision float when that is lossless, otherwise
    /// as single precision.
    pub fn write_float(&mut self, v: f32) -> Result<()> {
        let h = f16::from_f32(v);
        if v.is_nan() || h.to_f32() == v {
            self.write_half(h)
        } else {
            self.write_simple(FOUR_BYTES)?;
            self.writer.write_all(&v.to_be_bytes())?;
            Ok(())
        }
    }

    /// Writes `v` in the narrowest of half, single and double precision that
    /// represents it exactly.
    pub fn write_double(&mut self, v: f64) -> Result<()> {
        let s = v as f32;
        if v.is_nan() || s as f64 == v {
            self.write_float(s)
        } else {
            self.write_simple(EIGHT_BYTES)?;
            self.writer.write_all(&v.to_be_bytes())?;
            Ok(())
        }
    }

    fn write_half(&mut self, h: f16) -> Result<()> {
        let h = if h.is_nan() { f16::NAN } else { h };
        self.write_simple(TWO_BYTES)?;
        self.writer.write_all(&h.to_be_bytes())?;
        Ok(())
    }

    pub fn write_string(&mut self, v: &str) -> Result<()> {
        self.write_head(MAJOR_TEXT, v.len() as u64)?;
        self.writer.write_all(v.as_bytes())?;
        Ok(())
    }

    pub fn write_byte_string(&mut self, v: &[u8]) -> Result<()> {
        self.write_head(MAJOR_BYTES, v.len() as u64)?;
        self.writer.write_all(v)?;
        Ok(())
    }

    pub fn write_boolean(&mut self, v: bool) -> Result<()> {
        self.write_simple(if v { TRUE } else { FALSE })
    }

    pub fn write_null(&mut self) -> Result<()> {
        self.write_simple(NULL)
    }

    pub fn write_undefined(&mut self) -> Result<()> {
        self.write_simple(UNDEFINED)
    }

    pub fn start_array(&mut self, count: usize) -> Result<()> {
        self.write_head(MAJOR_ARRAY, count as u64)
    }

    /// `count` is the number of key/value pairs.
    pub fn start_map(&mut self, count: usize) -> Result<()> {
        self.write_head(MAJOR_MAP, count as u64)
    }
}
