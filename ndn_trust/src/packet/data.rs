// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Data packet.
//!
//! ```text
//! Data = DATA-TYPE TLV-LENGTH
//!          Name
//!          [MetaInfo]
//!          [Content]
//!          SignatureInfo
//!          SignatureValue
//! ```
//!
//! The signed portion is everything from Name through SignatureInfo. It is
//! never materialized by the validator: `write_signed_portion` re-serializes
//! it piece by piece into a [`Transform`] stage.

extern crate alloc;

use alloc::vec::Vec;
use bytes::BytesMut;

use crate::error::{Result, TlvError};
use crate::name::Name;
use crate::packet::SignatureInfo;
use crate::tlv::{self, types, Element};
use crate::transform::{BufferSink, Transform};

/// ContentType values
pub mod content_type {
    pub const BLOB: u64 = 0;
    pub const LINK: u64 = 1;
    pub const KEY: u64 = 2;
    pub const NACK: u64 = 3;
}

/// A Data packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data {
    pub name: Name,
    pub content_type: u64,
    /// FreshnessPeriod in milliseconds
    pub freshness_period: Option<u64>,
    pub content: Vec<u8>,
    pub signature_info: Option<SignatureInfo>,
    pub signature_value: Option<Vec<u8>>,
}

impl Data {
    /// Unsigned Data with empty BLOB content
    pub fn new(name: Name) -> Self {
        Self {
            name,
            content_type: content_type::BLOB,
            freshness_period: None,
            content: Vec::new(),
            signature_info: None,
            signature_value: None,
        }
    }

    pub fn with_content<C: Into<Vec<u8>>>(mut self, content: C) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_content_type(mut self, content_type: u64) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn with_freshness_period(mut self, millis: u64) -> Self {
        self.freshness_period = Some(millis);
        self
    }

    pub fn with_signature_info(mut self, info: SignatureInfo) -> Self {
        self.signature_info = Some(info);
        self
    }

    pub fn with_signature_value<V: Into<Vec<u8>>>(mut self, value: V) -> Self {
        self.signature_value = Some(value.into());
        self
    }

    fn encode_meta_info_into(&self, buf: &mut BytesMut) {
        if self.content_type == content_type::BLOB && self.freshness_period.is_none() {
            return;
        }
        let mut value = BytesMut::new();
        if self.content_type != content_type::BLOB {
            tlv::encode_tlv(&mut value, types::CONTENT_TYPE, &tlv::encode_nonneg(self.content_type));
        }
        if let Some(freshness) = self.freshness_period {
            tlv::encode_tlv(&mut value, types::FRESHNESS_PERIOD, &tlv::encode_nonneg(freshness));
        }
        tlv::encode_tlv(buf, types::META_INFO, &value);
    }

    /// Stream Name, MetaInfo, Content and SignatureInfo into `sink`.
    ///
    /// The content is written straight from the packet without copying it
    /// into an intermediate buffer. The caller decides when to `end` the sink.
    pub fn write_signed_portion<T: Transform + ?Sized>(&self, sink: &mut T) -> Result<()> {
        let info = self
            .signature_info
            .as_ref()
            .ok_or(TlvError::MissingElement("SignatureInfo"))?;

        let mut head = BytesMut::new();
        self.name.encode_into(&mut head);
        self.encode_meta_info_into(&mut head);
        tlv::write_varnum(&mut head, types::CONTENT);
        tlv::write_varnum(&mut head, self.content.len() as u64);
        sink.write(&head)?;
        sink.write(&self.content)?;

        let mut tail = BytesMut::new();
        info.encode_as(types::SIGNATURE_INFO, &mut tail);
        sink.write(&tail)?;
        Ok(())
    }

    /// The signed portion as one buffer
    pub fn signed_portion(&self) -> Result<Vec<u8>> {
        let mut sink = BufferSink::new();
        self.write_signed_portion(&mut sink)?;
        sink.end()?;
        Ok(sink.into_bytes())
    }

    /// Full Data TLV. Signature fields are omitted when unset.
    pub fn to_wire(&self) -> Vec<u8> {
        let mut value = BytesMut::new();
        self.name.encode_into(&mut value);
        self.encode_meta_info_into(&mut value);
        tlv::encode_tlv(&mut value, types::CONTENT, &self.content);
        if let Some(info) = &self.signature_info {
            info.encode_as(types::SIGNATURE_INFO, &mut value);
        }
        if let Some(sig) = &self.signature_value {
            tlv::encode_tlv(&mut value, types::SIGNATURE_VALUE, sig);
        }
        tlv::make_tlv(types::DATA, &value)
    }

    /// Decode from a Data element
    pub fn from_element(element: &Element<'_>) -> core::result::Result<Self, TlvError> {
        element.expect_type(types::DATA)?;
        let mut children = element.children();

        let name = children
            .next_if(types::NAME)?
            .ok_or(TlvError::MissingElement("Name"))?;
        let mut data = Data::new(Name::from_element(&name)?);

        if let Some(meta) = children.next_if(types::META_INFO)? {
            let mut fields = meta.children();
            if let Some(ct) = fields.next_if(types::CONTENT_TYPE)? {
                data.content_type = ct.as_nonneg()?;
            }
            if let Some(fp) = fields.next_if(types::FRESHNESS_PERIOD)? {
                data.freshness_period = Some(fp.as_nonneg()?);
            }
        }
        if let Some(content) = children.next_if(types::CONTENT)? {
            data.content = content.value.to_vec();
        }
        if let Some(info) = children.next_if(types::SIGNATURE_INFO)? {
            data.signature_info = Some(SignatureInfo::from_element(&info)?);
        }
        if let Some(sig) = children.next_if(types::SIGNATURE_VALUE)? {
            data.signature_value = Some(sig.value.to_vec());
        }
        if let Some(extra) = children.next() {
            let extra = extra?;
            return Err(TlvError::InvalidValue(alloc::format!(
                "unexpected element of TLV-TYPE {} in Data",
                extra.typ
            )));
        }

        Ok(data)
    }

    /// Decode from a complete Data TLV
    pub fn from_wire(wire: &[u8]) -> core::result::Result<Self, TlvError> {
        Self::from_element(&Element::parse_exact(wire)?)
    }
}
