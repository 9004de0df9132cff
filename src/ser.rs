use std::io::Write;

use serde::Serialize;

use crate::encode::Encoder;
use crate::error::{CborError, Result};

impl<W: Write> Encoder<W> {
    pub fn encode<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut *self)
    }

    fn write_variant_key(&mut self, variant: &'static str) -> Result<()> {
        self.start_map(1)?;
        self.write_string(variant)
    }
}

fn required_len(len: Option<usize>) -> Result<usize> {
    len.ok_or_else(|| CborError::Serde("indefinite length not supported".to_string()))
}

impl<'a, W: Write> serde::Serializer for &'a mut Encoder<W> {
    type Ok = ();
    type Error = CborError;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.write_boolean(v)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.write_number(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.write_number(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.write_number(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.write_number(v)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.write_unsigned(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.write_unsigned(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.write_unsigned(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.write_unsigned(v)
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.write_float(v)
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.write_double(v)
    }

    fn serialize_char(self, v: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.write_string(v.encode_utf8(&mut buf))
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.write_string(v)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        self.write_byte_string(v)
    }

    fn serialize_none(self) -> Result<()> {
        self.write_null()
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        self.write_null()
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.write_string(variant)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()> {
        self.write_variant_key(variant)?;
        value.serialize(self)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        self.start_array(required_len(len)?)?;
        Ok(self)
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.write_variant_key(variant)?;
        self.start_array(len)?;
        Ok(self)
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        self.start_map(required_len(len)?)?;
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        self.start_map(len)?;
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        self.write_variant_key(variant)?;
        self.start_map(len)?;
        Ok(self)
    }
}

impl<'a, W: Write> serde::ser::SerializeSeq for &'a mut Encoder<W> {
    type Ok = ();
    type Error = CborError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, W: Write> serde::ser::SerializeTuple for &'a mut Encoder<W> {
    type Ok = ();
    type Error = CborError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, W: Write> serde::ser::SerializeTupleStruct for &'a mut Encoder<W> {
    type Ok = ();
    type Error = CborError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, W: Write> serde::ser::SerializeTupleVariant for &'a mut Encoder<W> {
    type Ok = ();
    type Error = CborError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, W: Write> serde::ser::SerializeMap for &'a mut Encoder<W> {
    type Ok = ();
    type Error = CborError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        key.serialize(&mut **self)
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, W: Write> serde::ser::SerializeStruct for &'a mut Encoder<W> {
    type Ok = ();
    type Error = CborError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.write_string(key)?;
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, W: Write> serde::ser::SerializeStructVariant for &'a mut Encoder<W> {
    type Ok = ();
    type Error = CborError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.write_string(key)?;
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}
