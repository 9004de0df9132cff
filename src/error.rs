use std::io;
use thiserror::Error;

/// Errors raised while reading or writing CBOR.
///
/// Every error is terminal for the [`Decoder`](crate::Decoder) or
/// [`Encoder`](crate::Encoder) that produced it: the cursor position is
/// unspecified afterwards and the instance should be dropped.
#[derive(Error, Debug)]
pub enum CborError {
    #[error("Unexpected end of input: needed {needed} more bytes, {remaining} remaining")]
    UnexpectedEof { needed: u64, remaining: usize },

    #[error("Invalid additional info {info} for major type {major}")]
    InvalidAdditionalInfo { major: u8, info: u8 },

    #[error("Indefinite length is not allowed for major type {0}")]
    IndefiniteNotAllowed(u8),

    #[error("Break code outside of an indefinite-length item")]
    UnexpectedBreak,

    #[error("Expected break code, found head 0x{0:02x}")]
    MissingBreak(u8),

    #[error("Chunked string contains an invalid chunk (head 0x{0:02x})")]
    InvalidChunk(u8),

    #[error("Integer out of the supported 64-bit range")]
    IntegerOverflow,

    #[error("Nesting deeper than {0} levels")]
    DepthLimitExceeded(usize),

    #[error("{0} bytes of trailing data after the top-level value")]
    TrailingData(usize),

    #[error("Incorrect type: expected {expected}, found head 0x{found:02x}")]
    TypeMismatch { expected: &'static str, found: u8 },

    #[error("Invalid UTF-8 in text string")]
    InvalidUtf8,

    #[error("Field '{0}' is required, but it was missing")]
    MissingField(&'static str),

    #[error("Encountered an unknown key '{0}'")]
    UnknownKey(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serde error: {0}")]
    Serde(String),
}

/// Coarse classification of a [`CborError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnexpectedEndOfInput,
    MalformedInput,
    TypeMismatch,
    InvalidTextEncoding,
    MissingField,
    UnknownKey,
    Io,
    Custom,
}

impl CborError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CborError::UnexpectedEof { .. } => ErrorKind::UnexpectedEndOfInput,
            CborError::InvalidAdditionalInfo { .. }
            | CborError::IndefiniteNotAllowed(_)
            | CborError::UnexpectedBreak
            | CborError::MissingBreak(_)
            | CborError::InvalidChunk(_)
            | CborError::IntegerOverflow
            | CborError::DepthLimitExceeded(_)
            | CborError::TrailingData(_) => ErrorKind::MalformedInput,
            CborError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            CborError::InvalidUtf8 => ErrorKind::InvalidTextEncoding,
            CborError::MissingField(_) => ErrorKind::MissingField,
            CborError::UnknownKey(_) => ErrorKind::UnknownKey,
            CborError::Io(_) => ErrorKind::Io,
            CborError::Serde(_) => ErrorKind::Custom,
        }
    }

    /// True for errors caused by the shape of the input bytes rather than by
    /// what the caller asked for.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::MalformedInput | ErrorKind::UnexpectedEndOfInput
        )
    }
}

impl serde::ser::Error for CborError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        CborError::Serde(msg.to_string())
    }
}

impl serde::de::Error for CborError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        CborError::Serde(msg.to_string())
    }

    fn missing_field(field: &'static str) -> Self {
        CborError::MissingField(field)
    }
}

pub type Result<T> = std::result::Result<T, CborError>;
