use std::borrow::Cow;
use std::fmt;

use serde::Deserialize;
use serde::de::{self, DeserializeSeed, Visitor};
use tracing::debug;

use crate::decode::{Decoder, mismatch};
use crate::error::{CborError, Result};
use crate::head::*;

impl<'de> Decoder<'de> {
    pub fn decode<T: Deserialize<'de>>(&mut self) -> Result<T> {
        T::deserialize(self)
    }

    fn visit_aggregate<V: Visitor<'de>>(
        &mut self,
        head: Head,
        fields: Option<&'static [&'static str]>,
        visitor: V,
    ) -> Result<V::Value> {
        let len = self.read_length(head)?;
        self.enter()?;
        let mut access = Access {
            de: &mut *self,
            remaining: len.definite(),
            done: false,
            fields,
        };
        let value = if head.major == MAJOR_MAP {
            visitor.visit_map(&mut access)?
        } else {
            visitor.visit_seq(&mut access)?
        };
        access.finish()?;
        self.leave();
        Ok(value)
    }

    // Tag numbers are not interpreted, only stepped over
    fn skip_tags(&mut self) -> Result<()> {
        while self.peek_head()?.major == MAJOR_TAG {
            let head = self.read_head()?;
            self.read_argument(head)?;
        }
        Ok(())
    }
}

/// A map key as read by `deserialize_identifier`, kept until the value that
/// follows it is decoded.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FieldKey<'de> {
    Text(Cow<'de, str>),
    Index(u64),
    Other(u8),
}

impl FieldKey<'_> {
    /// Matches the way derived field visitors resolve a key: by name, or by
    /// position for integer keys.
    fn is_known(&self, fields: &[&str]) -> bool {
        match self {
            FieldKey::Text(name) => fields.contains(&name.as_ref()),
            FieldKey::Index(i) => *i < fields.len() as u64,
            FieldKey::Other(_) => false,
        }
    }
}

impl fmt::Display for FieldKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldKey::Text(name) => f.write_str(name),
            FieldKey::Index(i) => write!(f, "{i}"),
            FieldKey::Other(byte) => write!(f, "<head 0x{byte:02x}>"),
        }
    }
}

impl<'de, 'a> de::Deserializer<'de> for &'a mut Decoder<'de> {
    type Error = CborError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.unknown_field = None;
        let head = self.read_head()?;
        match head.major {
            MAJOR_UNSIGNED => {
                let val = self.read_argument(head)?;
                visitor.visit_u64(val)
            }
            MAJOR_NEGATIVE => {
                let val = Decoder::negative_from_raw(self.read_argument(head)?)?;
                visitor.visit_i64(val)
            }
            MAJOR_BYTES => match self.read_bytes_after(head)? {
                Cow::Borrowed(b) => visitor.visit_borrowed_bytes(b),
                Cow::Owned(b) => visitor.visit_byte_buf(b),
            },
            MAJOR_TEXT => match self.read_text_after(head)? {
                Cow::Borrowed(s) => visitor.visit_borrowed_str(s),
                Cow::Owned(s) => visitor.visit_string(s),
            },
            MAJOR_ARRAY | MAJOR_MAP => self.visit_aggregate(head, None, visitor),
            MAJOR_TAG => {
                // Tag numbers are not interpreted; pass through to the content
                self.read_argument(head)?;
                self.enter()?;
                let value = de::Deserializer::deserialize_any(&mut *self, visitor)?;
                self.leave();
                Ok(value)
            }
            _ => match head.info {
                FALSE => visitor.visit_bool(false),
                TRUE => visitor.visit_bool(true),
                NULL | UNDEFINED => visitor.visit_none(),
                TWO_BYTES | FOUR_BYTES | EIGHT_BYTES => {
                    let val = self.read_float_after(head)?;
                    visitor.visit_f64(val)
                }
                INDEFINITE => Err(CborError::UnexpectedBreak),
                28..=30 => Err(CborError::InvalidAdditionalInfo {
                    major: head.major,
                    info: head.info,
                }),
                _ => Err(CborError::TypeMismatch {
                    expected: "supported simple value",
                    found: head.to_byte(),
                }),
            },
        }
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.unknown_field = None;
        self.skip_tags()?;
        let val = self.next_float()?;
        visitor.visit_f32(val)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.unknown_field = None;
        self.skip_tags()?;
        let val = self.next_double()?;
        visitor.visit_f64(val)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.unknown_field = None;
        if self.is_null()? {
            self.next_null()?;
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.unknown_field = None;
        self.next_null()?;
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        self.unknown_field = None;
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.unknown_field = None;
        self.skip_tags()?;
        let head = self.read_head()?;
        match head.major {
            MAJOR_MAP => self.visit_aggregate(head, Some(fields), visitor),
            MAJOR_ARRAY => self.visit_aggregate(head, None, visitor),
            _ => Err(mismatch("struct", head)),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.unknown_field = None;
        let head = self.peek_head()?;
        match head.major {
            MAJOR_TEXT => {
                let variant = self.next_string()?;
                visitor.visit_enum(de::value::StringDeserializer::<CborError>::new(variant))
            }
            MAJOR_MAP => {
                let len = self.start_map()?;
                if len.definite().is_some_and(|n| n != 1) {
                    return Err(CborError::TypeMismatch {
                        expected: "single-entry map",
                        found: head.to_byte(),
                    });
                }
                self.enter()?;
                let value = visitor.visit_enum(VariantAccess { de: &mut *self })?;
                if len.is_indefinite() {
                    self.read_break()?;
                }
                self.leave();
                Ok(value)
            }
            _ => Err(mismatch("enum", head)),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.unknown_field = None;
        let head = self.peek_head()?;
        match head.major {
            MAJOR_TEXT => match self.next_str()? {
                Cow::Borrowed(key) => {
                    self.field_key = Some(FieldKey::Text(Cow::Borrowed(key)));
                    visitor.visit_borrowed_str(key)
                }
                Cow::Owned(key) => {
                    self.field_key = Some(FieldKey::Text(Cow::Owned(key.clone())));
                    visitor.visit_string(key)
                }
            },
            MAJOR_BYTES => {
                let other = FieldKey::Other(head.to_byte());
                match self.next_bytes()? {
                    Cow::Borrowed(key) => {
                        self.field_key = Some(
                            std::str::from_utf8(key)
                                .map_or(other, |name| FieldKey::Text(Cow::Borrowed(name))),
                        );
                        visitor.visit_borrowed_bytes(key)
                    }
                    Cow::Owned(key) => {
                        self.field_key = Some(std::str::from_utf8(&key).map_or(other, |name| {
                            FieldKey::Text(Cow::Owned(name.to_owned()))
                        }));
                        visitor.visit_byte_buf(key)
                    }
                }
            }
            MAJOR_UNSIGNED => {
                let index = self.next_unsigned()?;
                self.field_key = Some(FieldKey::Index(index));
                visitor.visit_u64(index)
            }
            _ => {
                let value = de::Deserializer::deserialize_any(&mut *self, visitor)?;
                self.field_key = Some(FieldKey::Other(head.to_byte()));
                Ok(value)
            }
        }
    }

    /// Skips one value. Only the value of a struct key that the target type
    /// does not declare is subject to `ignore_unknown_keys`.
    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if let Some(key) = self.unknown_field.take() {
            if !self.config().ignores_unknown_keys() {
                return Err(CborError::UnknownKey(key.to_string()));
            }
            debug!(%key, "ignoring unknown key");
        }
        self.skip_element()?;
        visitor.visit_unit()
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 char str string
        bytes byte_buf seq tuple tuple_struct map
    }
}

/// Element access for arrays and maps of either definite or indefinite
/// length.
struct Access<'a, 'de> {
    de: &'a mut Decoder<'de>,
    remaining: Option<u64>,
    done: bool,
    // Declared field names when decoding a struct from a map
    fields: Option<&'static [&'static str]>,
}

impl<'a, 'de> Access<'a, 'de> {
    fn has_next(&mut self) -> Result<bool> {
        if self.done {
            return Ok(false);
        }
        match self.remaining.as_mut() {
            Some(0) => {
                self.done = true;
                Ok(false)
            }
            Some(n) => {
                *n -= 1;
                Ok(true)
            }
            None if self.de.is_break()? => {
                self.de.read_break()?;
                self.done = true;
                Ok(false)
            }
            None => Ok(true),
        }
    }

    /// Fails if the visitor stopped before the end of the aggregate.
    fn finish(&mut self) -> Result<()> {
        if self.has_next()? {
            return Err(CborError::Serde(
                "aggregate has more entries than expected".to_string(),
            ));
        }
        Ok(())
    }
}

impl<'de, 'a> de::SeqAccess<'de> for Access<'a, 'de> {
    type Error = CborError;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        if !self.has_next()? {
            return Ok(None);
        }
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        self.remaining.and_then(|n| usize::try_from(n).ok())
    }
}

impl<'de, 'a> de::MapAccess<'de> for Access<'a, 'de> {
    type Error = CborError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        self.de.field_key = None;
        if !self.has_next()? {
            return Ok(None);
        }
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        let key = self.de.field_key.take();
        if let (Some(fields), Some(key)) = (self.fields, key) {
            if !key.is_known(fields) {
                self.de.unknown_field = Some(key);
            }
        }
        let value = seed.deserialize(&mut *self.de);
        self.de.unknown_field = None;
        value
    }

    fn size_hint(&self) -> Option<usize> {
        self.remaining.and_then(|n| usize::try_from(n).ok())
    }
}

/// `{variant: payload}` enum encoding.
struct VariantAccess<'a, 'de> {
    de: &'a mut Decoder<'de>,
}

impl<'de, 'a> de::EnumAccess<'de> for VariantAccess<'a, 'de> {
    type Error = CborError;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self)> {
        let variant = seed.deserialize(&mut *self.de)?;
        Ok((variant, self))
    }
}

impl<'de, 'a> de::VariantAccess<'de> for VariantAccess<'a, 'de> {
    type Error = CborError;

    fn unit_variant(self) -> Result<()> {
        self.de.next_null()
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        seed.deserialize(self.de)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_seq(self.de, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        de::Deserializer::deserialize_struct(self.de, "", fields, visitor)
    }
}
