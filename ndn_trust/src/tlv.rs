// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! NDN Type-Length-Value codec.
//!
//! Both TLV-TYPE and TLV-LENGTH use the VAR-NUMBER encoding:
//!
//! ```text
//! first byte < 253   -> the byte itself
//! first byte == 253  -> followed by a 2-byte big-endian number
//! first byte == 254  -> followed by a 4-byte big-endian number
//! first byte == 255  -> followed by an 8-byte big-endian number
//! ```
//!
//! Only the subset needed by the validation core is provided: element
//! parsing over borrowed input and element encoding into a `BytesMut`.

extern crate alloc;

use alloc::vec::Vec;
use bytes::{BufMut, BytesMut};

use crate::error::TlvError;

/// TLV-TYPE numbers used by this crate
pub mod types {
    pub const INTEREST: u64 = 0x05;
    pub const DATA: u64 = 0x06;
    pub const NAME: u64 = 0x07;
    pub const IMPLICIT_SHA256_DIGEST_COMPONENT: u64 = 0x01;
    pub const PARAMETERS_SHA256_DIGEST_COMPONENT: u64 = 0x02;
    pub const GENERIC_NAME_COMPONENT: u64 = 0x08;
    pub const CAN_BE_PREFIX: u64 = 0x21;
    pub const MUST_BE_FRESH: u64 = 0x12;
    pub const NONCE: u64 = 0x0a;
    pub const INTEREST_LIFETIME: u64 = 0x0c;
    pub const APPLICATION_PARAMETERS: u64 = 0x24;
    pub const INTEREST_SIGNATURE_INFO: u64 = 0x2c;
    pub const INTEREST_SIGNATURE_VALUE: u64 = 0x2e;
    pub const SIGNATURE_TIME: u64 = 0x28;
    pub const META_INFO: u64 = 0x14;
    pub const CONTENT: u64 = 0x15;
    pub const SIGNATURE_INFO: u64 = 0x16;
    pub const SIGNATURE_VALUE: u64 = 0x17;
    pub const CONTENT_TYPE: u64 = 0x18;
    pub const FRESHNESS_PERIOD: u64 = 0x19;
    pub const SIGNATURE_TYPE: u64 = 0x1b;
    pub const KEY_LOCATOR: u64 = 0x1c;
    pub const KEY_DIGEST: u64 = 0x1d;
    pub const VALIDITY_PERIOD: u64 = 0xfd;
    pub const NOT_BEFORE: u64 = 0xfe;
    pub const NOT_AFTER: u64 = 0xff;
}

/// Number of bytes the VAR-NUMBER encoding of `n` occupies
pub fn varnum_size(n: u64) -> usize {
    if n < 253 {
        1
    } else if n <= u16::MAX as u64 {
        3
    } else if n <= u32::MAX as u64 {
        5
    } else {
        9
    }
}

/// Append the VAR-NUMBER encoding of `n`
pub fn write_varnum(buf: &mut BytesMut, n: u64) {
    if n < 253 {
        buf.put_u8(n as u8);
    } else if n <= u16::MAX as u64 {
        buf.put_u8(253);
        buf.put_u16(n as u16);
    } else if n <= u32::MAX as u64 {
        buf.put_u8(254);
        buf.put_u32(n as u32);
    } else {
        buf.put_u8(255);
        buf.put_u64(n);
    }
}

/// Read a VAR-NUMBER, returning the number and the bytes consumed
pub fn read_varnum(input: &[u8]) -> Result<(u64, usize), TlvError> {
    let first = *input.first().ok_or(TlvError::UnexpectedEof)?;
    let width = match first {
        0..=252 => return Ok((first as u64, 1)),
        253 => 2,
        254 => 4,
        255 => 8,
    };
    if input.len() < 1 + width {
        return Err(TlvError::UnexpectedEof);
    }
    let mut n = 0u64;
    for b in &input[1..1 + width] {
        n = (n << 8) | (*b as u64);
    }
    Ok((n, 1 + width))
}

/// Append a complete TLV element
pub fn encode_tlv(buf: &mut BytesMut, typ: u64, value: &[u8]) {
    buf.reserve(varnum_size(typ) + varnum_size(value.len() as u64) + value.len());
    write_varnum(buf, typ);
    write_varnum(buf, value.len() as u64);
    buf.put_slice(value);
}

/// Encode a complete TLV element into a fresh buffer
pub fn make_tlv(typ: u64, value: &[u8]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    encode_tlv(&mut buf, typ, value);
    buf.to_vec()
}

/// Shortest NonNegativeInteger encoding (1, 2, 4 or 8 bytes)
pub fn encode_nonneg(n: u64) -> Vec<u8> {
    if n <= u8::MAX as u64 {
        alloc::vec![n as u8]
    } else if n <= u16::MAX as u64 {
        (n as u16).to_be_bytes().to_vec()
    } else if n <= u32::MAX as u64 {
        (n as u32).to_be_bytes().to_vec()
    } else {
        n.to_be_bytes().to_vec()
    }
}

/// Decode a NonNegativeInteger value
pub fn decode_nonneg(value: &[u8]) -> Result<u64, TlvError> {
    match value.len() {
        1 | 2 | 4 | 8 => Ok(value.iter().fold(0u64, |n, b| (n << 8) | (*b as u64))),
        _ => Err(TlvError::InvalidNumber),
    }
}

/// A parsed TLV element borrowing from its input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element<'a> {
    /// TLV-TYPE
    pub typ: u64,
    /// TLV-VALUE
    pub value: &'a [u8],
    /// Full element encoding (type, length and value)
    pub wire: &'a [u8],
}

impl<'a> Element<'a> {
    /// Parse one element from the front of `input`, returning it and the rest
    pub fn parse(input: &'a [u8]) -> Result<(Element<'a>, &'a [u8]), TlvError> {
        let (typ, t_len) = read_varnum(input)?;
        let (len, l_len) = read_varnum(&input[t_len..])?;
        let header = t_len + l_len;
        let len = usize::try_from(len).map_err(|_| TlvError::UnexpectedEof)?;
        let total = header.checked_add(len).ok_or(TlvError::UnexpectedEof)?;
        if input.len() < total {
            return Err(TlvError::UnexpectedEof);
        }
        Ok((
            Element {
                typ,
                value: &input[header..total],
                wire: &input[..total],
            },
            &input[total..],
        ))
    }

    /// Parse `input` as exactly one element
    pub fn parse_exact(input: &'a [u8]) -> Result<Element<'a>, TlvError> {
        let (element, rest) = Self::parse(input)?;
        if !rest.is_empty() {
            return Err(TlvError::TrailingData(rest.len()));
        }
        Ok(element)
    }

    /// Fail unless this element has TLV-TYPE `expected`
    pub fn expect_type(&self, expected: u64) -> Result<(), TlvError> {
        if self.typ != expected {
            return Err(TlvError::UnexpectedType {
                expected,
                found: self.typ,
            });
        }
        Ok(())
    }

    /// Iterate over the sub-elements in the value
    pub fn children(&self) -> Reader<'a> {
        Reader::new(self.value)
    }

    /// Decode the value as a NonNegativeInteger
    pub fn as_nonneg(&self) -> Result<u64, TlvError> {
        decode_nonneg(self.value)
    }
}

/// Sequential reader over concatenated elements
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    rest: &'a [u8],
}

impl<'a> Reader<'a> {
    /// Create a reader over `input`
    pub fn new(input: &'a [u8]) -> Self {
        Self { rest: input }
    }

    /// Whether all input has been consumed
    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    /// Next element if its type is `typ`, without consuming anything otherwise
    pub fn next_if(&mut self, typ: u64) -> Result<Option<Element<'a>>, TlvError> {
        if self.rest.is_empty() {
            return Ok(None);
        }
        let (peek, _) = read_varnum(self.rest)?;
        if peek != typ {
            return Ok(None);
        }
        self.next().transpose()
    }
}

impl<'a> Iterator for Reader<'a> {
    type Item = Result<Element<'a>, TlvError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        match Element::parse(self.rest) {
            Ok((element, rest)) => {
                self.rest = rest;
                Some(Ok(element))
            }
            Err(e) => {
                self.rest = &[];
                Some(Err(e))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
