// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! NDN names.
//!
//! A [`Name`] is an ordered sequence of opaque [`Component`]s. Names are
//! ordered canonically (component-wise; components by TLV-TYPE, then length,
//! then bytes), so every name sharing a prefix sorts contiguously right after
//! that prefix.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use bytes::BytesMut;
use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use crate::error::TlvError;
use crate::tlv::{self, types, Element};

/// A single name component
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Component {
    typ: u64,
    value: Vec<u8>,
}

impl Component {
    /// Generic component holding `value`
    pub fn generic<V: Into<Vec<u8>>>(value: V) -> Self {
        Self::with_type(types::GENERIC_NAME_COMPONENT, value)
    }

    /// Component with an explicit TLV-TYPE
    pub fn with_type<V: Into<Vec<u8>>>(typ: u64, value: V) -> Self {
        Self {
            typ,
            value: value.into(),
        }
    }

    /// Generic component holding a NonNegativeInteger
    pub fn from_number(n: u64) -> Self {
        Self::generic(tlv::encode_nonneg(n))
    }

    /// TLV-TYPE of the component
    pub fn typ(&self) -> u64 {
        self.typ
    }

    /// Raw component value
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Interpret the value as a NonNegativeInteger
    pub fn to_number(&self) -> Result<u64, TlvError> {
        tlv::decode_nonneg(&self.value)
    }

    /// Append the component TLV to `buf`
    pub fn encode_into(&self, buf: &mut BytesMut) {
        tlv::encode_tlv(buf, self.typ, &self.value);
    }

    /// Component TLV encoding
    pub fn to_wire(&self) -> Vec<u8> {
        tlv::make_tlv(self.typ, &self.value)
    }

    fn from_uri_part(part: &str) -> Result<Self, TlvError> {
        let (typ, text) = match part.split_once('=') {
            Some((t, rest)) if !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit()) => {
                let typ = t
                    .parse::<u64>()
                    .map_err(|_| TlvError::InvalidValue(part.to_string()))?;
                (typ, rest)
            }
            _ => (types::GENERIC_NAME_COMPONENT, part),
        };
        let mut value = percent_decode(text).ok_or_else(|| TlvError::InvalidValue(part.to_string()))?;
        if value.iter().all(|b| *b == b'.') {
            // "..." escapes a value made only of periods
            if value.len() < 3 {
                return Err(TlvError::InvalidValue(part.to_string()));
            }
            value.truncate(value.len() - 3);
        }
        Ok(Self::with_type(typ, value))
    }
}

impl PartialOrd for Component {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Component {
    fn cmp(&self, other: &Self) -> Ordering {
        self.typ
            .cmp(&other.typ)
            .then(self.value.len().cmp(&other.value.len()))
            .then_with(|| self.value.cmp(&other.value))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.typ != types::GENERIC_NAME_COMPONENT {
            write!(f, "{}=", self.typ)?;
        }
        if self.value.iter().all(|b| *b == b'.') {
            f.write_str("...")?;
        }
        for b in &self.value {
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
                write!(f, "{}", *b as char)?;
            } else {
                write!(f, "%{:02X}", b)?;
            }
        }
        Ok(())
    }
}

fn percent_decode(text: &str) -> Option<Vec<u8>> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = text.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Some(out)
}

/// An NDN name
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name {
    components: Vec<Component>,
}

impl Name {
    /// The empty name `/`
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a name from components
    pub fn from_components(components: Vec<Component>) -> Self {
        Self { components }
    }

    /// Parse an NDN URI such as `/a/b/KEY/%01`
    pub fn from_uri(uri: &str) -> Result<Self, TlvError> {
        let path = uri.strip_prefix("ndn:").unwrap_or(uri);
        let components = path
            .split('/')
            .filter(|part| !part.is_empty())
            .map(Component::from_uri_part)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { components })
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether this is the empty name
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// All components
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Iterate over the components
    pub fn iter(&self) -> core::slice::Iter<'_, Component> {
        self.components.iter()
    }

    fn resolve_index(&self, i: isize) -> Option<usize> {
        if i >= 0 {
            let i = i as usize;
            (i < self.len()).then_some(i)
        } else {
            self.len().checked_sub(i.unsigned_abs())
        }
    }

    /// Component at `i`; negative indexes count from the end (-1 is the last)
    pub fn get(&self, i: isize) -> Option<&Component> {
        self.resolve_index(i).map(|i| &self.components[i])
    }

    /// First `n` components; a negative `n` drops `|n|` components from the end
    pub fn prefix(&self, n: isize) -> Name {
        let end = if n >= 0 {
            (n as usize).min(self.len())
        } else {
            self.len().saturating_sub(n.unsigned_abs())
        };
        Name::from_components(self.components[..end].to_vec())
    }

    /// Up to `count` components starting at `start` (negative counts from the end)
    pub fn sub_name(&self, start: isize, count: Option<usize>) -> Name {
        let start = if start >= 0 {
            (start as usize).min(self.len())
        } else {
            self.len().saturating_sub(start.unsigned_abs())
        };
        let end = match count {
            Some(count) => start.saturating_add(count).min(self.len()),
            None => self.len(),
        };
        Name::from_components(self.components[start..end].to_vec())
    }

    /// Whether `self` is a prefix of (or equal to) `other`
    pub fn is_prefix_of(&self, other: &Name) -> bool {
        self.len() <= other.len() && self.components[..] == other.components[..self.len()]
    }

    /// Append a component, builder style
    pub fn append(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// Append a generic component from a string, builder style
    pub fn append_str(self, value: &str) -> Self {
        self.append(Component::generic(value.as_bytes()))
    }

    /// Append a generic NonNegativeInteger component, builder style
    pub fn append_number(self, n: u64) -> Self {
        self.append(Component::from_number(n))
    }

    /// Append every component of `other`, builder style
    pub fn append_name(mut self, other: &Name) -> Self {
        self.components.extend(other.components.iter().cloned());
        self
    }

    /// Push a component in place
    pub fn push(&mut self, component: Component) {
        self.components.push(component);
    }

    /// Append the Name TLV to `buf`
    pub fn encode_into(&self, buf: &mut BytesMut) {
        let mut value = BytesMut::new();
        self.encode_components_into(&mut value);
        tlv::encode_tlv(buf, types::NAME, &value);
    }

    /// Append only the concatenated component TLVs (the Name TLV-VALUE)
    pub fn encode_components_into(&self, buf: &mut BytesMut) {
        for component in &self.components {
            component.encode_into(buf);
        }
    }

    /// Name TLV encoding
    pub fn to_wire(&self) -> Vec<u8> {
        let mut buf = BytesMut::new();
        self.encode_into(&mut buf);
        buf.to_vec()
    }

    /// Decode from a Name element
    pub fn from_element(element: &Element<'_>) -> Result<Self, TlvError> {
        element.expect_type(types::NAME)?;
        let components = element
            .children()
            .map(|c| c.map(|c| Component::with_type(c.typ, c.value)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { components })
    }

    /// Decode from a complete Name TLV
    pub fn from_wire(wire: &[u8]) -> Result<Self, TlvError> {
        Self::from_element(&Element::parse_exact(wire)?)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_str("/");
        }
        for component in &self.components {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

impl FromStr for Name {
    type Err = TlvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Name::from_uri(s)
    }
}

impl From<Vec<Component>> for Name {
    fn from(components: Vec<Component>) -> Self {
        Name::from_components(components)
    }
}

impl<'a> IntoIterator for &'a Name {
    type Item = &'a Component;
    type IntoIter = core::slice::Iter<'a, Component>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

impl Name {
    /// URI form of the name
    pub fn to_uri(&self) -> String {
        self.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
