//! # CBOR Codec
//!
//! A CBOR (Concise Binary Object Representation, RFC 7049) encoder/decoder.
//!
//! ## Features
//! - Pull-based [`Decoder`] over a byte slice: read one data item at a time,
//!   peek at heads, or skip whole items structurally
//! - Push-based [`Encoder`] over any `Write` that always picks the shortest
//!   head and the narrowest exact float width
//! - Definite and indefinite-length strings, arrays and maps on input;
//!   definite lengths only on output
//! - serde integration via [`to_vec`], [`to_writer`] and [`from_slice`]
//! - Dynamic [`Value`] for data without a fixed schema
//!
//! ## Byte strings
//! `Vec<u8>` serializes as an array of integers. Mark a field with
//! `#[serde(with = "serde_bytes")]`, or use `serde_bytes::ByteBuf`, to get a
//! CBOR byte string instead. Borrowed `&[u8]` and `&str` fields decode without
//! copying when the input is not chunked.
//!
//! ## Unknown keys
//! Struct decoding rejects keys the type does not declare unless
//! [`Config::ignore_unknown_keys`] is set, in which case the values are
//! skipped. A declared field absent from the input always fails with
//! [`CborError::MissingField`].
//!
//! ## Example
//! ```rust
//! use cbor_codec::{Config, from_slice, from_slice_with_config, to_vec};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Simple {
//!     a: String,
//! }
//!
//! let encoded = to_vec(&Simple { a: "str".into() }).unwrap();
//! assert_eq!(encoded, [0xa1, 0x61, 0x61, 0x63, 0x73, 0x74, 0x72]);
//!
//! // {_ "a": "123", "b": "987"}
//! let data = [
//!     0xbf, 0x61, 0x61, 0x63, 0x31, 0x32, 0x33, 0x61, 0x62, 0x63, 0x39, 0x38, 0x37, 0xff,
//! ];
//! assert!(from_slice::<Simple>(&data).is_err());
//!
//! let config = Config::default().ignore_unknown_keys(true);
//! let decoded: Simple = from_slice_with_config(&data, config).unwrap();
//! assert_eq!(decoded, Simple { a: "123".into() });
//! ```

use std::io::Write;

use serde::{Deserialize, Serialize};

mod config;
mod de;
pub mod decode;
pub mod encode;
pub mod error;
pub mod head;
mod ser;
pub mod value;

pub use config::Config;
pub use decode::Decoder;
pub use encode::Encoder;
pub use error::{CborError, ErrorKind, Result};
pub use head::{Head, Length};
pub use value::Value;

/// Serializes `value` into a freshly allocated buffer.
pub fn to_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    to_writer(&mut buf, value)?;
    Ok(buf)
}

pub fn to_writer<W: Write, T: Serialize + ?Sized>(writer: W, value: &T) -> Result<()> {
    let mut encoder = Encoder::new(writer);
    encoder.encode(value)
}

/// Deserializes exactly one data item from `slice` using the default
/// [`Config`]. Bytes left over after the item are an error.
pub fn from_slice<'de, T: Deserialize<'de>>(slice: &'de [u8]) -> Result<T> {
    from_slice_with_config(slice, Config::default())
}

pub fn from_slice_with_config<'de, T: Deserialize<'de>>(
    slice: &'de [u8],
    config: Config,
) -> Result<T> {
    let mut decoder = Decoder::with_config(slice, config);
    let value = decoder.decode()?;
    decoder.end()?;
    Ok(value)
}
