// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Interest packet and the two signed Interest formats.
//!
//! Format v0.3 carries the signature in dedicated fields:
//!
//! ```text
//! Interest = INTEREST-TYPE TLV-LENGTH
//!              Name
//!              [CanBePrefix] [MustBeFresh] [Nonce] [InterestLifetime]
//!              [ApplicationParameters [InterestSignatureInfo InterestSignatureValue]]
//! ```
//!
//! The legacy format v0.2 appends them to the name instead:
//!
//! ```text
//! /<prefix>/<timestamp>/<random>/<SignatureInfo>/<SignatureValue>
//!                                      -2               -1
//! ```

extern crate alloc;

use alloc::vec::Vec;
use bytes::BytesMut;
use core::time::Duration;

use crate::error::{Result, TlvError};
use crate::name::Name;
use crate::packet::SignatureInfo;
use crate::tlv::{self, types, Element};
use crate::transform::{BufferSink, Transform};

/// Layout of the v0.2 signed Interest name
pub mod signed_interest {
    /// Fewest components a v0.2 signed Interest name may have
    pub const MIN_SIZE: usize = 2;
    /// Component holding the SignatureInfo TLV
    pub const POS_SIG_INFO: isize = -2;
    /// Component holding the SignatureValue TLV
    pub const POS_SIG_VALUE: isize = -1;
}

/// Layout of a v0.2 command Interest name
pub mod command_interest {
    /// Fewest components a command Interest name may have
    pub const MIN_SIZE: usize = 4;
    /// Component holding the timestamp in milliseconds
    pub const POS_TIMESTAMP: isize = -4;
}

/// Which signed Interest encoding a packet uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignedInterestFormat {
    /// Signature in the name (Packet Format v0.2)
    V02,
    /// Signature in InterestSignatureInfo / InterestSignatureValue
    V03,
}

/// An Interest packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interest {
    pub name: Name,
    pub can_be_prefix: bool,
    pub must_be_fresh: bool,
    pub nonce: Option<u32>,
    pub lifetime: Option<Duration>,
    pub app_parameters: Option<Vec<u8>>,
    pub signature_info: Option<SignatureInfo>,
    pub signature_value: Option<Vec<u8>>,
}

impl Interest {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            can_be_prefix: false,
            must_be_fresh: false,
            nonce: None,
            lifetime: None,
            app_parameters: None,
            signature_info: None,
            signature_value: None,
        }
    }

    pub fn with_can_be_prefix(mut self, can_be_prefix: bool) -> Self {
        self.can_be_prefix = can_be_prefix;
        self
    }

    pub fn with_must_be_fresh(mut self, must_be_fresh: bool) -> Self {
        self.must_be_fresh = must_be_fresh;
        self
    }

    pub fn with_nonce(mut self, nonce: u32) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    pub fn with_app_parameters<P: Into<Vec<u8>>>(mut self, params: P) -> Self {
        self.app_parameters = Some(params.into());
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

    /// v0.3 when InterestSignatureInfo is present, v0.2 otherwise
    pub fn signed_format(&self) -> SignedInterestFormat {
        if self.signature_info.is_some() {
            SignedInterestFormat::V03
        } else {
            SignedInterestFormat::V02
        }
    }

    /// Stream the v0.3 signed portion: the name components other than
    /// ParametersSha256DigestComponent, ApplicationParameters and
    /// InterestSignatureInfo.
    pub fn write_signed_portion_v03<T: Transform + ?Sized>(&self, sink: &mut T) -> Result<()> {
        let info = self
            .signature_info
            .as_ref()
            .ok_or(TlvError::MissingElement("InterestSignatureInfo"))?;

        for component in self.name.iter() {
            if component.typ() == types::PARAMETERS_SHA256_DIGEST_COMPONENT {
                continue;
            }
            sink.write(&component.to_wire())?;
        }

        let params: &[u8] = self.app_parameters.as_deref().unwrap_or(&[]);
        let mut head = BytesMut::new();
        tlv::write_varnum(&mut head, types::APPLICATION_PARAMETERS);
        tlv::write_varnum(&mut head, params.len() as u64);
        sink.write(&head)?;
        sink.write(params)?;

        let mut tail = BytesMut::new();
        info.encode_as(types::INTEREST_SIGNATURE_INFO, &mut tail);
        sink.write(&tail)?;
        Ok(())
    }

    /// Stream the v0.2 signed portion: every name component but the last
    pub fn write_signed_portion_v02<T: Transform + ?Sized>(&self, sink: &mut T) -> Result<()> {
        if self.name.len() < signed_interest::MIN_SIZE {
            return Err(TlvError::MissingElement("SignatureValue name component").into());
        }
        for component in self.name.iter().take(self.name.len() - 1) {
            sink.write(&component.to_wire())?;
        }
        Ok(())
    }

    /// Signed portion of the format this Interest uses, as one buffer
    pub fn signed_portion(&self) -> Result<Vec<u8>> {
        let mut sink = BufferSink::new();
        match self.signed_format() {
            SignedInterestFormat::V03 => self.write_signed_portion_v03(&mut sink)?,
            SignedInterestFormat::V02 => self.write_signed_portion_v02(&mut sink)?,
        }
        sink.end()?;
        Ok(sink.into_bytes())
    }

    /// SignatureInfo decoded from name component -2 (v0.2)
    pub fn signature_info_v02(&self) -> core::result::Result<SignatureInfo, TlvError> {
        let component = self
            .name
            .get(signed_interest::POS_SIG_INFO)
            .ok_or(TlvError::MissingElement("SignatureInfo name component"))?;
        SignatureInfo::from_wire(component.value())
    }

    /// Signature bits decoded from name component -1 (v0.2)
    pub fn signature_value_v02(&self) -> core::result::Result<Vec<u8>, TlvError> {
        let component = self
            .name
            .get(signed_interest::POS_SIG_VALUE)
            .ok_or(TlvError::MissingElement("SignatureValue name component"))?;
        let element = Element::parse_exact(component.value())?;
        element.expect_type(types::SIGNATURE_VALUE)?;
        Ok(element.value.to_vec())
    }

    /// Full Interest TLV
    pub fn to_wire(&self) -> Vec<u8> {
        let mut value = BytesMut::new();
        self.name.encode_into(&mut value);
        if self.can_be_prefix {
            tlv::encode_tlv(&mut value, types::CAN_BE_PREFIX, &[]);
        }
        if self.must_be_fresh {
            tlv::encode_tlv(&mut value, types::MUST_BE_FRESH, &[]);
        }
        if let Some(nonce) = self.nonce {
            tlv::encode_tlv(&mut value, types::NONCE, &nonce.to_be_bytes());
        }
        if let Some(lifetime) = self.lifetime {
            let millis = u64::try_from(lifetime.as_millis()).unwrap_or(u64::MAX);
            tlv::encode_tlv(&mut value, types::INTEREST_LIFETIME, &tlv::encode_nonneg(millis));
        }
        if self.app_parameters.is_some() || self.signature_info.is_some() {
            let params: &[u8] = self.app_parameters.as_deref().unwrap_or(&[]);
            tlv::encode_tlv(&mut value, types::APPLICATION_PARAMETERS, params);
        }
        if let Some(info) = &self.signature_info {
            info.encode_as(types::INTEREST_SIGNATURE_INFO, &mut value);
        }
        if let Some(sig) = &self.signature_value {
            tlv::encode_tlv(&mut value, types::INTEREST_SIGNATURE_VALUE, sig);
        }
        tlv::make_tlv(types::INTEREST, &value)
    }

    /// Decode from an Interest element. Unrecognized elements are skipped.
    pub fn from_element(element: &Element<'_>) -> core::result::Result<Self, TlvError> {
        element.expect_type(types::INTEREST)?;
        let mut children = element.children();
        let name = children
            .next_if(types::NAME)?
            .ok_or(TlvError::MissingElement("Name"))?;
        let mut interest = Interest::new(Name::from_element(&name)?);

        for child in children {
            let child = child?;
            match child.typ {
                types::CAN_BE_PREFIX => interest.can_be_prefix = true,
                types::MUST_BE_FRESH => interest.must_be_fresh = true,
                types::NONCE => {
                    let bytes: [u8; 4] = child
                        .value
                        .try_into()
                        .map_err(|_| TlvError::InvalidValue("Nonce must be 4 bytes".into()))?;
                    interest.nonce = Some(u32::from_be_bytes(bytes));
                }
                types::INTEREST_LIFETIME => {
                    interest.lifetime = Some(Duration::from_millis(child.as_nonneg()?));
                }
                types::APPLICATION_PARAMETERS => {
                    interest.app_parameters = Some(child.value.to_vec());
                }
                types::INTEREST_SIGNATURE_INFO => {
                    interest.signature_info = Some(SignatureInfo::from_element(&child)?);
                }
                types::INTEREST_SIGNATURE_VALUE => {
                    interest.signature_value = Some(child.value.to_vec());
                }
                _ => {}
            }
        }

        Ok(interest)
    }

    /// Decode from a complete Interest TLV
    pub fn from_wire(wire: &[u8]) -> core::result::Result<Self, TlvError> {
        Self::from_element(&Element::parse_exact(wire)?)
    }
}
