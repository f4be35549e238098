// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! A minimal CBOR (RFC 8949) encoder and decoder for the tag-value tree
//! serialization format. Trees are encoded as maps with short text keys;
//! polymorphic nodes carry their variant name under the `"@t"` key.

#[cfg(test)]
mod tests;

use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// A CBOR data item. Maps preserve insertion order so that encoding is
/// deterministic and round-trips exactly.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Looks up a key in a map item.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("unexpected end of input at offset {0}")]
    UnexpectedEof(usize),
    #[error("unsupported CBOR item with header {0:#04x} at offset {1}")]
    Unsupported(u8, usize),
    #[error("map key is not a text string at offset {0}")]
    NonTextKey(usize),
    #[error("invalid UTF-8 in text string at offset {0}")]
    InvalidUtf8(usize),
    #[error("trailing bytes after the top-level item at offset {0}")]
    TrailingBytes(usize),
}

const MAJOR_UNSIGNED: u8 = 0;
const MAJOR_NEGATIVE: u8 = 1;
const MAJOR_BYTES: u8 = 2;
const MAJOR_TEXT: u8 = 3;
const MAJOR_ARRAY: u8 = 4;
const MAJOR_MAP: u8 = 5;

const SIMPLE_FALSE: u8 = 0xf4;
const SIMPLE_TRUE: u8 = 0xf5;
const FLOAT64: u8 = 0xfb;

/// Encodes a value to bytes.
#[must_use]
pub fn encode(value: &Value) -> Vec<u8> {
    let mut bytes = Vec::new();
    encode_into(value, &mut bytes);
    bytes
}

fn encode_into(value: &Value, bytes: &mut Vec<u8>) {
    match value {
        Value::Bool(b) => bytes.push(if *b { SIMPLE_TRUE } else { SIMPLE_FALSE }),
        Value::Int(i) => {
            if *i >= 0 {
                encode_head(MAJOR_UNSIGNED, u64::try_from(*i).expect("value is non-negative"), bytes);
            } else {
                let magnitude = u64::try_from(-1 - *i).expect("value is negative");
                encode_head(MAJOR_NEGATIVE, magnitude, bytes);
            }
        }
        Value::Float(f) => {
            bytes.push(FLOAT64);
            bytes.extend_from_slice(&f.to_bits().to_be_bytes());
        }
        Value::Text(s) => {
            encode_head(MAJOR_TEXT, s.len() as u64, bytes);
            bytes.extend_from_slice(s.as_bytes());
        }
        Value::Bytes(b) => {
            encode_head(MAJOR_BYTES, b.len() as u64, bytes);
            bytes.extend_from_slice(b);
        }
        Value::Array(items) => {
            encode_head(MAJOR_ARRAY, items.len() as u64, bytes);
            for item in items {
                encode_into(item, bytes);
            }
        }
        Value::Map(entries) => {
            encode_head(MAJOR_MAP, entries.len() as u64, bytes);
            for (key, item) in entries {
                encode_head(MAJOR_TEXT, key.len() as u64, bytes);
                bytes.extend_from_slice(key.as_bytes());
                encode_into(item, bytes);
            }
        }
    }
}

fn encode_head(major: u8, argument: u64, bytes: &mut Vec<u8>) {
    let major = major << 5;
    if argument < 24 {
        bytes.push(major | u8::try_from(argument).expect("argument is below 24"));
    } else if argument <= u64::from(u8::MAX) {
        bytes.push(major | 24);
        bytes.push(u8::try_from(argument).expect("argument fits in u8"));
    } else if argument <= u64::from(u16::MAX) {
        bytes.push(major | 25);
        bytes.extend_from_slice(&u16::try_from(argument).expect("argument fits in u16").to_be_bytes());
    } else if argument <= u64::from(u32::MAX) {
        bytes.push(major | 26);
        bytes.extend_from_slice(&u32::try_from(argument).expect("argument fits in u32").to_be_bytes());
    } else {
        bytes.push(major | 27);
        bytes.extend_from_slice(&argument.to_be_bytes());
    }
}

/// Decodes a single top-level value from bytes.
pub fn decode(bytes: &[u8]) -> Result<Value, Error> {
    let mut reader = Reader { bytes, pos: 0 };
    let value = reader.item()?;
    if reader.pos != bytes.len() {
        return Err(Error::TrailingBytes(reader.pos));
    }
    Ok(value)
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn item(&mut self) -> Result<Value, Error> {
        let header = self.byte()?;
        match header {
            SIMPLE_FALSE => return Ok(Value::Bool(false)),
            SIMPLE_TRUE => return Ok(Value::Bool(true)),
            FLOAT64 => {
                let bits = u64::from_be_bytes(self.take(8)?.try_into().expect("slice is 8 bytes"));
                return Ok(Value::Float(f64::from_bits(bits)));
            }
            _ => {}
        }

        let major = header >> 5;
        let argument = self.argument(header)?;
        match major {
            MAJOR_UNSIGNED => i64::try_from(argument)
                .map(Value::Int)
                .map_err(|_| Error::Unsupported(header, self.pos)),
            MAJOR_NEGATIVE => i64::try_from(argument)
                .map(|magnitude| Value::Int(-1 - magnitude))
                .map_err(|_| Error::Unsupported(header, self.pos)),
            MAJOR_BYTES => {
                let len = self.length(argument)?;
                Ok(Value::Bytes(self.take(len)?.to_vec()))
            }
            MAJOR_TEXT => {
                let len = self.length(argument)?;
                self.text(len).map(Value::Text)
            }
            MAJOR_ARRAY => {
                let len = self.length(argument)?;
                let mut items = Vec::with_capacity(len.min(64));
                for _ in 0..len {
                    items.push(self.item()?);
                }
                Ok(Value::Array(items))
            }
            MAJOR_MAP => {
                let len = self.length(argument)?;
                let mut entries = Vec::with_capacity(len.min(64));
                for _ in 0..len {
                    let key_header = self.byte()?;
                    if key_header >> 5 != MAJOR_TEXT {
                        return Err(Error::NonTextKey(self.pos - 1));
                    }
                    let key_argument = self.argument(key_header)?;
                    let key_len = self.length(key_argument)?;
                    let key = self.text(key_len)?;
                    entries.push((key, self.item()?));
                }
                Ok(Value::Map(entries))
            }
            _ => Err(Error::Unsupported(header, self.pos - 1)),
        }
    }

    fn argument(&mut self, header: u8) -> Result<u64, Error> {
        let info = header & 0x1f;
        match info {
            0..=23 => Ok(u64::from(info)),
            24 => Ok(u64::from(self.byte()?)),
            25 => Ok(u64::from(u16::from_be_bytes(
                self.take(2)?.try_into().expect("slice is 2 bytes"),
            ))),
            26 => Ok(u64::from(u32::from_be_bytes(
                self.take(4)?.try_into().expect("slice is 4 bytes"),
            ))),
            27 => Ok(u64::from_be_bytes(
                self.take(8)?.try_into().expect("slice is 8 bytes"),
            )),
            _ => Err(Error::Unsupported(header, self.pos - 1)),
        }
    }

    fn length(&self, argument: u64) -> Result<usize, Error> {
        usize::try_from(argument).map_err(|_| Error::UnexpectedEof(self.pos))
    }

    fn text(&mut self, len: usize) -> Result<String, Error> {
        let start = self.pos;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| Error::InvalidUtf8(start))
    }

    fn byte(&mut self) -> Result<u8, Error> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or(Error::UnexpectedEof(self.pos))?;
        self.pos += 1;
        Ok(byte)
    }

    fn take(&mut self, len: usize) -> Result<&[u8], Error> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(Error::UnexpectedEof(self.pos))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Bytes(b) => write!(f, "{} bytes", b.len()),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {item}")?;
                }
                f.write_str("}")
            }
        }
    }
}
