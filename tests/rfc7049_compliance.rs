// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

//! RFC 7049 Appendix A compliance tests
//! Tests encoding/decoding against the byte sequences listed in the RFC.
//!
//! Values the encoder can produce are checked both ways. Indefinite-length
//! items and non-minimal heads are decode-only, since the encoder always
//! emits definite lengths and the shortest head.

use std::collections::BTreeMap;

use cbor_codec::{CborError, ErrorKind, Value, from_slice, to_vec};
use hex_literal::hex;
use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

#[test]
fn test_rfc7049_integers() {
    assert_encode_decode(0u64, &hex!("00"));
    assert_encode_decode(1u64, &hex!("01"));
    assert_encode_decode(10u64, &hex!("0a"));
    assert_encode_decode(23u64, &hex!("17"));
    assert_encode_decode(24u64, &hex!("1818"));
    assert_encode_decode(25u64, &hex!("1819"));
    assert_encode_decode(100u64, &hex!("1864"));
    assert_encode_decode(1000u64, &hex!("1903e8"));
    assert_encode_decode(1000000u64, &hex!("1a000f4240"));
    assert_encode_decode(1000000000000u64, &hex!("1b000000e8d4a51000"));
    assert_encode_decode(18446744073709551615u64, &hex!("1bffffffffffffffff"));

    assert_encode_decode(-1i64, &hex!("20"));
    assert_encode_decode(-10i64, &hex!("29"));
    assert_encode_decode(-100i64, &hex!("3863"));
    assert_encode_decode(-1000i64, &hex!("3903e7"));

    // -18446744073709551616 does not fit any native integer
    let err = from_slice::<i64>(&hex!("3bffffffffffffffff")).unwrap_err();
    assert!(matches!(err, CborError::IntegerOverflow));
}

#[test]
fn test_non_minimal_heads_decode() {
    assert_eq!(from_slice::<u8>(&hex!("1817")).unwrap(), 23);
    assert_eq!(from_slice::<u16>(&hex!("190001")).unwrap(), 1);
    assert_eq!(from_slice::<i64>(&hex!("3a00000000")).unwrap(), -1);
    assert_eq!(
        from_slice::<String>(&hex!("78016161")).unwrap(),
        "a"
    );
}

#[test]
fn test_rfc7049_simple_values() {
    assert_encode_decode(false, &hex!("f4"));
    assert_encode_decode(true, &hex!("f5"));

    let none: Option<u8> = None;
    assert_encode_decode(none, &hex!("f6"));

    let some: Option<u8> = Some(42);
    assert_encode_decode(some, &hex!("182a"));

    // undefined reads as an absent optional
    assert_eq!(from_slice::<Option<u8>>(&hex!("f7")).unwrap(), None);
}

#[test]
fn test_rfc7049_floats() {
    assert_encode_decode(0.0f64, &hex!("f90000"));
    assert_encode_decode(-0.0f64, &hex!("f98000"));
    assert_encode_decode(1.0f64, &hex!("f93c00"));
    assert_encode_decode(1.1f64, &hex!("fb3ff199999999999a"));
    assert_encode_decode(1.5f64, &hex!("f93e00"));
    assert_encode_decode(65504.0f64, &hex!("f97bff"));
    assert_encode_decode(100000.0f64, &hex!("fa47c35000"));
    assert_encode_decode(3.4028234663852886e+38f64, &hex!("fa7f7fffff"));
    assert_encode_decode(1.0e+300f64, &hex!("fb7e37e43c8800759c"));
    assert_encode_decode(5.960464477539063e-8f64, &hex!("f90001"));
    assert_encode_decode(0.00006103515625f64, &hex!("f90400"));
    assert_encode_decode(-4.0f64, &hex!("f9c400"));
    assert_encode_decode(-4.1f64, &hex!("fbc010666666666666"));

    assert_eq!(to_vec(&f64::INFINITY).unwrap(), hex!("f97c00"));
    assert_eq!(to_vec(&f64::NEG_INFINITY).unwrap(), hex!("f9fc00"));
    assert_eq!(to_vec(&f64::NAN).unwrap(), hex!("f97e00"));

    // Wider encodings of special values still decode
    let nans: [&[u8]; 3] = [&hex!("f97e00"), &hex!("fa7fc00000"), &hex!("fb7ff8000000000000")];
    for bytes in nans {
        assert!(from_slice::<f64>(bytes).unwrap().is_nan());
    }
    let infinities: [&[u8]; 3] = [&hex!("f97c00"), &hex!("fa7f800000"), &hex!("fb7ff0000000000000")];
    for bytes in infinities {
        assert_eq!(from_slice::<f64>(bytes).unwrap(), f64::INFINITY);
    }
    let neg_infinities: [&[u8]; 3] = [&hex!("f9fc00"), &hex!("faff800000"), &hex!("fbfff0000000000000")];
    for bytes in neg_infinities {
        assert_eq!(from_slice::<f64>(bytes).unwrap(), f64::NEG_INFINITY);
    }
}

#[test]
fn test_rfc7049_strings() {
    assert_encode_decode("".to_string(), &hex!("60"));
    assert_encode_decode("a".to_string(), &hex!("6161"));
    assert_encode_decode("IETF".to_string(), &hex!("6449455446"));
    assert_encode_decode("\"\\".to_string(), &hex!("62225c"));
    assert_encode_decode("\u{00fc}".to_string(), &hex!("62c3bc"));
    assert_encode_decode("\u{6c34}".to_string(), &hex!("63e6b0b4"));
    assert_encode_decode("\u{10151}".to_string(), &hex!("64f0908591"));

    assert_encode_decode(ByteBuf::from(vec![]), &hex!("40"));
    assert_encode_decode(ByteBuf::from(vec![0x01, 0x02, 0x03, 0x04]), &hex!("4401020304"));
}

#[test]
fn test_rfc7049_indefinite_strings() {
    // (_ h'0102', h'030405')
    let bytes: ByteBuf = from_slice(&hex!("5f42010243030405ff")).unwrap();
    assert_eq!(bytes.into_vec(), vec![1, 2, 3, 4, 5]);

    // (_ "strea", "ming")
    let text: String = from_slice(&hex!("7f657374726561646d696e67ff")).unwrap();
    assert_eq!(text, "streaming");

    // Chunks of the wrong major type are malformed
    let err = from_slice::<String>(&hex!("7f4161ff")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}

#[test]
fn test_rfc7049_arrays() {
    let empty: Vec<u8> = vec![];
    assert_encode_decode(empty, &hex!("80"));

    assert_encode_decode(vec![1, 2, 3], &hex!("83010203"));

    let nested = vec![
        Value::Integer(1),
        Value::Array(vec![Value::Integer(2), Value::Integer(3)]),
        Value::Array(vec![Value::Integer(4), Value::Integer(5)]),
    ];
    assert_encode_decode(nested.clone(), &hex!("8301820203820405"));

    // Every mix of definite and indefinite framing decodes to the same value
    let framings: [&[u8]; 4] = [
        &hex!("9f018202039f0405ffff"),
        &hex!("9f01820203820405ff"),
        &hex!("83018202039f0405ff"),
        &hex!("83019f0203ff820405"),
    ];
    for bytes in framings {
        let decoded: Vec<Value> = from_slice(bytes).unwrap();
        assert_eq!(decoded, nested, "Decoding mismatch for {:02x?}", bytes);
    }

    let counting: Vec<u8> = (1..=25).collect();
    assert_encode_decode(
        counting.clone(),
        &hex!("98190102030405060708090a0b0c0d0e0f101112131415161718181819"),
    );
    let decoded: Vec<u8> =
        from_slice(&hex!("9f0102030405060708090a0b0c0d0e0f101112131415161718181819ff")).unwrap();
    assert_eq!(decoded, counting);

    let empty: Vec<u8> = from_slice(&hex!("9fff")).unwrap();
    assert!(empty.is_empty());
}

#[test]
fn test_rfc7049_maps() {
    let empty: BTreeMap<String, u64> = BTreeMap::new();
    assert_encode_decode(empty, &hex!("a0"));

    let mut map = BTreeMap::new();
    map.insert(1, 2);
    map.insert(3, 4);
    assert_encode_decode(map, &hex!("a201020304"));

    let mut map2 = BTreeMap::new();
    map2.insert("a".to_string(), Value::Integer(1));
    map2.insert(
        "b".to_string(),
        Value::Array(vec![Value::Integer(2), Value::Integer(3)]),
    );
    assert_encode_decode(map2.clone(), &hex!("a26161016162820203"));

    // {_ "a": 1, "b": [_ 2, 3]}
    let decoded: BTreeMap<String, Value> =
        from_slice(&hex!("bf61610161629f0203ffff")).unwrap();
    assert_eq!(decoded, map2);

    // ["a", {_ "b": "c"}]
    let decoded: (String, BTreeMap<String, String>) =
        from_slice(&hex!("826161bf61626163ff")).unwrap();
    assert_eq!(decoded.0, "a");
    assert_eq!(decoded.1["b"], "c");
}

#[test]
fn test_rfc7049_indefinite_struct() {
    #[derive(Debug, PartialEq, Deserialize)]
    struct Funds {
        #[serde(rename = "Fun")]
        fun: bool,
        #[serde(rename = "Amt")]
        amt: i8,
    }

    // {_ "Fun": true, "Amt": -2}
    let decoded: Funds = from_slice(&hex!("bf6346756ef563416d7421ff")).unwrap();
    assert_eq!(decoded, Funds { fun: true, amt: -2 });
}

#[test]
fn test_rfc7049_tags_pass_through() {
    // 0("2013-03-21T20:04:00Z")
    let decoded: String =
        from_slice(&hex!("c074323031332d30332d32315432303a30343a30305a")).unwrap();
    assert_eq!(decoded, "2013-03-21T20:04:00Z");

    // 1(1363896240) and 1(1363896240.5)
    assert_eq!(from_slice::<u64>(&hex!("c11a514b67b0")).unwrap(), 1363896240);
    assert_eq!(
        from_slice::<f64>(&hex!("c1fb41d452d9ec200000")).unwrap(),
        1363896240.5
    );

    // 23(h'01020304')
    let bytes: ByteBuf = from_slice(&hex!("d74401020304")).unwrap();
    assert_eq!(bytes.into_vec(), vec![1, 2, 3, 4]);

    // Value sees through the tag as well
    let value: Value = from_slice(&hex!("d82076687474703a2f2f7777772e6578616d706c652e636f6d"))
        .unwrap();
    assert_eq!(value.as_str(), Some("http://www.example.com"));
}

#[test]
fn test_newtype_struct_encoding() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct UserId(u64);

    let user_id = UserId(42);
    let cbor = to_vec(&user_id).unwrap();

    // Just the integer, not a map
    assert_eq!(cbor, hex!("182a"));

    let decoded: UserId = from_slice(&cbor).unwrap();
    assert_eq!(decoded, user_id);
}

#[test]
fn test_newtype_string_encoding() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Name(String);

    let name = Name("Alice".to_string());
    let cbor = to_vec(&name).unwrap();
    assert_eq!(cbor, hex!("65416c696365"));

    let decoded: Name = from_slice(&cbor).unwrap();
    assert_eq!(decoded, name);
}

#[test]
fn test_value_roundtrip() {
    let test_cases: [&[u8]; 12] = [
        &hex!("00"),       // 0
        &hex!("01"),       // 1
        &hex!("20"),       // -1
        &hex!("f4"),       // false
        &hex!("f5"),       // true
        &hex!("f6"),       // null
        &hex!("6161"),     // "a"
        &hex!("4161"),     // h'61'
        &hex!("f93e00"),   // 1.5
        &hex!("80"),       // []
        &hex!("a0"),       // {}
        &hex!("a1016161"), // {1: "a"}
    ];

    for bytes in test_cases {
        let value: Value = from_slice(bytes).unwrap();
        let encoded = to_vec(&value).unwrap();
        assert_eq!(encoded, bytes, "Failed roundtrip for {:02x?}", bytes);
    }
}

#[test]
fn test_malformed_inputs() {
    let cases: [(&[u8], ErrorKind); 9] = [
        (&hex!("18"), ErrorKind::UnexpectedEndOfInput),    // missing argument byte
        (&hex!("62c3"), ErrorKind::UnexpectedEndOfInput),  // truncated text
        (&hex!("8301"), ErrorKind::UnexpectedEndOfInput),  // truncated array
        (&hex!("9f01"), ErrorKind::UnexpectedEndOfInput),  // unterminated array
        (&hex!("1c"), ErrorKind::MalformedInput),          // reserved additional info
        (&hex!("ff"), ErrorKind::MalformedInput),          // stray break
        (&hex!("1f"), ErrorKind::MalformedInput),          // indefinite integer
        (&hex!("62c328"), ErrorKind::InvalidTextEncoding), // invalid UTF-8
        (&hex!("6161"), ErrorKind::TypeMismatch),          // text where integer expected
    ];

    for (bytes, kind) in cases {
        let err = from_slice::<Value>(bytes)
            .and_then(|_| from_slice::<i64>(bytes).map(|_| ()))
            .unwrap_err();
        assert_eq!(err.kind(), kind, "Unexpected error {:?} for {:02x?}", err, bytes);
    }
}

// Helper functions

fn assert_encode_decode<T>(value: T, expected: &[u8])
where
    T: serde::Serialize + serde::de::DeserializeOwned + std::fmt::Debug + PartialEq,
{
    let encoded = to_vec(&value).unwrap();
    assert_eq!(encoded, expected, "Encoding mismatch for {:?}", value);

    let decoded: T = from_slice(expected).unwrap();
    assert_eq!(decoded, value, "Decoding mismatch for {:02x?}", expected);
}
