use std::borrow::Cow;

use tracing::trace;

use crate::config::Config;
use crate::de::FieldKey;
use crate::error::{CborError, Result};
use crate::head::*;

/// Pull-based CBOR reader over an in-memory buffer.
///
/// Each `next_*` call consumes exactly one data item of the requested kind
/// and advances the cursor. Reads never go past the end of the buffer.
///
/// ```
/// use cbor_codec::Decoder;
///
/// let mut decoder = Decoder::new(&[0x0c, 0x19, 0x03, 0xe8]);
/// assert_eq!(decoder.next_number().unwrap(), 12);
/// assert_eq!(decoder.next_number().unwrap(), 1000);
/// decoder.end().unwrap();
/// ```
pub struct Decoder<'de> {
    data: &'de [u8],
    pos: usize,
    config: Config,
    depth: usize,
    pub(crate) field_key: Option<FieldKey<'de>>,
    pub(crate) unknown_field: Option<FieldKey<'de>>,
}

impl<'de> Decoder<'de> {
    pub fn new(data: &'de [u8]) -> Self {
        Self::with_config(data, Config::default())
    }

    pub fn with_config(data: &'de [u8], config: Config) -> Self {
        Decoder {
            data,
            pos: 0,
            config,
            depth: 0,
            field_key: None,
            unknown_field: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Fails if any bytes remain after the top-level value.
    pub fn end(&self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(CborError::TrailingData(n)),
        }
    }

    fn take(&mut self, len: u64) -> Result<&'de [u8]> {
        let remaining = self.remaining();
        if len > remaining as u64 {
            return Err(CborError::UnexpectedEof {
                needed: len,
                remaining,
            });
        }
        let start = self.pos;
        self.pos += len as usize;
        Ok(&self.data[start..self.pos])
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N as u64)?);
        Ok(buf)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn peek_u8(&self) -> Result<u8> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(CborError::UnexpectedEof {
                needed: 1,
                remaining: 0,
            })
    }

    pub fn peek_head(&self) -> Result<Head> {
        self.peek_u8().map(Head::from_byte)
    }

    pub fn read_head(&mut self) -> Result<Head> {
        self.read_u8().map(Head::from_byte)
    }

    /// Resolves the argument of `head` into a length, reading 0/1/2/4/8
    /// further bytes big-endian.
    pub fn read_length(&mut self, head: Head) -> Result<Length> {
        Ok(match head.info {
            0..=23 => Length::Definite(head.info as u64),
            ONE_BYTE => Length::Definite(self.read_u8()? as u64),
            TWO_BYTES => Length::Definite(u16::from_be_bytes(self.read_array()?) as u64),
            FOUR_BYTES => Length::Definite(u32::from_be_bytes(self.read_array()?) as u64),
            EIGHT_BYTES => Length::Definite(u64::from_be_bytes(self.read_array()?)),
            INDEFINITE if allows_indefinite(head.major) => Length::Indefinite,
            INDEFINITE => return Err(CborError::IndefiniteNotAllowed(head.major)),
            info => {
                return Err(CborError::InvalidAdditionalInfo {
                    major: head.major,
                    info,
                });
            }
        })
    }

    pub(crate) fn read_argument(&mut self, head: Head) -> Result<u64> {
        match self.read_length(head)? {
            Length::Definite(value) => Ok(value),
            Length::Indefinite => Err(CborError::IndefiniteNotAllowed(head.major)),
        }
    }

    fn expect_major(&mut self, major: u8, expected: &'static str) -> Result<Head> {
        let head = self.read_head()?;
        if head.major != major {
            return Err(mismatch(expected, head));
        }
        Ok(head)
    }

    pub(crate) fn enter(&mut self) -> Result<()> {
        if self.depth >= self.config.depth_limit() {
            return Err(CborError::DepthLimitExceeded(self.config.depth_limit()));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Reads an unsigned integer (major type 0) across the full `u64` range.
    pub fn next_unsigned(&mut self) -> Result<u64> {
        let head = self.expect_major(MAJOR_UNSIGNED, "unsigned integer")?;
        self.read_argument(head)
    }

    pub(crate) fn negative_from_raw(raw: u64) -> Result<i64> {
        if raw > i64::MAX as u64 {
            return Err(CborError::IntegerOverflow);
        }
        Ok(-1 - raw as i64)
    }

    /// Reads an unsigned or negative integer into the signed 64-bit range.
    pub fn next_number(&mut self) -> Result<i64> {
        let head = self.read_head()?;
        match head.major {
            MAJOR_UNSIGNED => {
                i64::try_from(self.read_argument(head)?).map_err(|_| CborError::IntegerOverflow)
            }
            MAJOR_NEGATIVE => Self::negative_from_raw(self.read_argument(head)?),
            _ => Err(mismatch("integer", head)),
        }
    }

    /// Reads a half or single precision float. A double-precision value is
    /// rejected rather than narrowed.
    pub fn next_float(&mut self) -> Result<f32> {
        let head = self.expect_major(MAJOR_SIMPLE, "float")?;
        match head.info {
            TWO_BYTES => Ok(half::f16::from_be_bytes(self.read_array()?).to_f32()),
            FOUR_BYTES => Ok(f32::from_be_bytes(self.read_array()?)),
            _ => Err(mismatch("half or single precision float", head)),
        }
    }

    /// Reads a float of any width, widening half and single precision values.
    pub fn next_double(&mut self) -> Result<f64> {
        let head = self.expect_major(MAJOR_SIMPLE, "float")?;
        self.read_float_after(head)
    }

    pub(crate) fn read_float_after(&mut self, head: Head) -> Result<f64> {
        match head.info {
            TWO_BYTES => Ok(half::f16::from_be_bytes(self.read_array()?).to_f64()),
            FOUR_BYTES => Ok(f32::from_be_bytes(self.read_array()?) as f64),
            EIGHT_BYTES => Ok(f64::from_be_bytes(self.read_array()?)),
            _ => Err(mismatch("float", head)),
        }
    }

    pub fn next_boolean(&mut self) -> Result<bool> {
        let head = self.read_head()?;
        match (head.major, head.info) {
            (MAJOR_SIMPLE, FALSE) => Ok(false),
            (MAJOR_SIMPLE, TRUE) => Ok(true),
            _ => Err(mismatch("boolean", head)),
        }
    }

    /// True if the next item is `null` or `undefined`. Does not consume it.
    pub fn is_null(&self) -> Result<bool> {
        let head = self.peek_head()?;
        Ok(head.major == MAJOR_SIMPLE && matches!(head.info, NULL | UNDEFINED))
    }

    pub fn next_null(&mut self) -> Result<()> {
        if !self.is_null()? {
            return Err(mismatch("null", self.peek_head()?));
        }
        self.pos += 1;
        Ok(())
    }

    /// Feeds the content of a definite string, or each chunk of an
    /// indefinite one, to `f`.
    fn read_chunks<F>(&mut self, head: Head, mut f: F) -> Result<()>
    where
        F: FnMut(&'de [u8]) -> Result<()>,
    {
        match self.read_length(head)? {
            Length::Definite(len) => f(self.take(len)?),
            Length::Indefinite => loop {
                let chunk = self.read_head()?;
                if chunk.is_break() {
                    return Ok(());
                }
                if chunk.major != head.major {
                    return Err(CborError::InvalidChunk(chunk.to_byte()));
                }
                match self.read_length(chunk)? {
                    Length::Definite(len) => f(self.take(len)?)?,
                    Length::Indefinite => return Err(CborError::InvalidChunk(chunk.to_byte())),
                }
            },
        }
    }

    pub(crate) fn read_bytes_after(&mut self, head: Head) -> Result<Cow<'de, [u8]>> {
        if head.info != INDEFINITE {
            let len = self.read_argument(head)?;
            return Ok(Cow::Borrowed(self.take(len)?));
        }
        let mut buf = Vec::new();
        self.read_chunks(head, |chunk| {
            buf.extend_from_slice(chunk);
            Ok(())
        })?;
        Ok(Cow::Owned(buf))
    }

    pub(crate) fn read_text_after(&mut self, head: Head) -> Result<Cow<'de, str>> {
        if head.info != INDEFINITE {
            let len = self.read_argument(head)?;
            let bytes = self.take(len)?;
            return std::str::from_utf8(bytes)
                .map(Cow::Borrowed)
                .map_err(|_| CborError::InvalidUtf8);
        }
        let mut text = String::new();
        self.read_chunks(head, |chunk| {
            text.push_str(std::str::from_utf8(chunk).map_err(|_| CborError::InvalidUtf8)?);
            Ok(())
        })?;
        Ok(Cow::Owned(text))
    }

    /// Reads a byte string (major type 2), joining the chunks of an
    /// indefinite-length one. Borrows from the input when definite.
    pub fn next_bytes(&mut self) -> Result<Cow<'de, [u8]>> {
        let head = self.expect_major(MAJOR_BYTES, "byte string")?;
        self.read_bytes_after(head)
    }

    pub fn next_byte_string(&mut self) -> Result<Vec<u8>> {
        self.next_bytes().map(Cow::into_owned)
    }

    /// Reads a text string (major type 3), joining the chunks of an
    /// indefinite-length one. Borrows from the input when definite.
    pub fn next_str(&mut self) -> Result<Cow<'de, str>> {
        let head = self.expect_major(MAJOR_TEXT, "text string")?;
        self.read_text_after(head)
    }

    pub fn next_string(&mut self) -> Result<String> {
        self.next_str().map(Cow::into_owned)
    }

    /// Reads an array header. For [`Length::Indefinite`] the caller reads
    /// elements until [`is_break`](Self::is_break) and then calls
    /// [`read_break`](Self::read_break).
    pub fn start_array(&mut self) -> Result<Length> {
        let head = self.expect_major(MAJOR_ARRAY, "array")?;
        self.read_length(head)
    }

    /// Reads a map header. A definite length counts pairs.
    pub fn start_map(&mut self) -> Result<Length> {
        let head = self.expect_major(MAJOR_MAP, "map")?;
        self.read_length(head)
    }

    /// True if the next byte is the break code. Does not consume it.
    pub fn is_break(&self) -> Result<bool> {
        Ok(self.peek_u8()? == BREAK)
    }

    pub fn read_break(&mut self) -> Result<()> {
        let byte = self.read_u8()?;
        if byte != BREAK {
            return Err(CborError::MissingBreak(byte));
        }
        Ok(())
    }

    /// Consumes one well-formed data item of any shape without
    /// materialising it.
    ///
    /// Purely structural: text is not checked for UTF-8 and integer
    /// magnitudes are not range-checked.
    pub fn skip_element(&mut self) -> Result<()> {
        let start = self.pos;
        self.skip_value()?;
        trace!(start, end = self.pos, "skipped element");
        Ok(())
    }

    fn skip_value(&mut self) -> Result<()> {
        let head = self.read_head()?;
        match head.major {
            MAJOR_UNSIGNED | MAJOR_NEGATIVE => {
                self.read_argument(head)?;
            }
            MAJOR_BYTES | MAJOR_TEXT => self.read_chunks(head, |_| Ok(()))?,
            MAJOR_ARRAY | MAJOR_MAP => {
                let items_per_entry = if head.major == MAJOR_MAP { 2 } else { 1 };
                self.enter()?;
                match self.read_length(head)? {
                    Length::Definite(count) => {
                        for _ in 0..count {
                            for _ in 0..items_per_entry {
                                self.skip_value()?;
                            }
                        }
                    }
                    Length::Indefinite => {
                        while !self.is_break()? {
                            for _ in 0..items_per_entry {
                                self.skip_value()?;
                            }
                        }
                        self.pos += 1;
                    }
                }
                self.leave();
            }
            MAJOR_TAG => {
                self.read_argument(head)?;
                self.enter()?;
                self.skip_value()?;
                self.leave();
            }
            _ => match head.info {
                0..=23 => {}
                INDEFINITE => return Err(CborError::UnexpectedBreak),
                info => match head.argument_width() {
                    Some(width) => {
                        self.take(width as u64)?;
                    }
                    None => {
                        return Err(CborError::InvalidAdditionalInfo {
                            major: head.major,
                            info,
                        });
                    }
                },
            },
        }
        Ok(())
    }
}

/// A break code where a value belongs is malformed input, whatever the
/// caller asked for.
pub(crate) fn mismatch(expected: &'static str, head: Head) -> CborError {
    if head.is_break() {
        CborError::UnexpectedBreak
    } else {
        CborError::TypeMismatch {
            expected,
            found: head.to_byte(),
        }
    }
}
