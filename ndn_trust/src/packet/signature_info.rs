// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! SignatureInfo and KeyLocator.
//!
//! ```text
//! SignatureInfo = SIGNATURE-INFO-TYPE TLV-LENGTH
//!                   SignatureType
//!                   [KeyLocator]
//!                   [ValidityPeriod]
//!                   [SignatureTime]
//! ```
//!
//! The same structure is carried by Data (TLV-TYPE 0x16) and by signed
//! Interests (InterestSignatureInfo, TLV-TYPE 0x2c).

extern crate alloc;

use alloc::vec::Vec;
use bytes::BytesMut;
use core::fmt;

use crate::error::TlvError;
use crate::name::Name;
use crate::time::ValidityPeriod;
use crate::tlv::{self, types, Element};

/// Signature algorithm tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureType {
    /// SHA-256 digest, no key involved
    DigestSha256,
    /// RSA PKCS#1 v1.5 over SHA-256
    Sha256WithRsa,
    /// ECDSA over SHA-256
    Sha256WithEcdsa,
    /// HMAC-SHA-256
    HmacWithSha256,
    /// Ed25519
    Ed25519,
    /// Any other assigned number
    Other(u64),
}

impl SignatureType {
    /// Map the assigned number to a signature type
    pub fn from_u64(n: u64) -> Self {
        match n {
            0 => SignatureType::DigestSha256,
            1 => SignatureType::Sha256WithRsa,
            3 => SignatureType::Sha256WithEcdsa,
            4 => SignatureType::HmacWithSha256,
            5 => SignatureType::Ed25519,
            n => SignatureType::Other(n),
        }
    }

    /// Assigned number of this signature type
    pub fn to_u64(self) -> u64 {
        match self {
            SignatureType::DigestSha256 => 0,
            SignatureType::Sha256WithRsa => 1,
            SignatureType::Sha256WithEcdsa => 3,
            SignatureType::HmacWithSha256 => 4,
            SignatureType::Ed25519 => 5,
            SignatureType::Other(n) => n,
        }
    }
}

impl fmt::Display for SignatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureType::DigestSha256 => write!(f, "DigestSha256"),
            SignatureType::Sha256WithRsa => write!(f, "SignatureSha256WithRsa"),
            SignatureType::Sha256WithEcdsa => write!(f, "SignatureSha256WithEcdsa"),
            SignatureType::HmacWithSha256 => write!(f, "SignatureHmacWithSha256"),
            SignatureType::Ed25519 => write!(f, "SignatureEd25519"),
            SignatureType::Other(n) => write!(f, "Unknown({})", n),
        }
    }
}

/// Identifies the key that produced a signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyLocator {
    /// Key or certificate name
    Name(Name),
    /// Digest of the public key
    KeyDigest(Vec<u8>),
}

impl KeyLocator {
    /// Append the KeyLocator TLV to `buf`
    pub fn encode_into(&self, buf: &mut BytesMut) {
        let mut value = BytesMut::new();
        match self {
            KeyLocator::Name(name) => name.encode_into(&mut value),
            KeyLocator::KeyDigest(digest) => tlv::encode_tlv(&mut value, types::KEY_DIGEST, digest),
        }
        tlv::encode_tlv(buf, types::KEY_LOCATOR, &value);
    }

    /// Decode from a KeyLocator element
    pub fn from_element(element: &Element<'_>) -> Result<Self, TlvError> {
        element.expect_type(types::KEY_LOCATOR)?;
        let inner = Element::parse_exact(element.value)?;
        match inner.typ {
            types::NAME => Ok(KeyLocator::Name(Name::from_element(&inner)?)),
            types::KEY_DIGEST => Ok(KeyLocator::KeyDigest(inner.value.to_vec())),
            found => Err(TlvError::UnexpectedType {
                expected: types::NAME,
                found,
            }),
        }
    }
}

/// Signature metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureInfo {
    /// Signature algorithm
    pub signature_type: SignatureType,
    /// Signing key, absent for digest signatures
    pub key_locator: Option<KeyLocator>,
    /// Validity of the signed object (certificates)
    pub validity_period: Option<ValidityPeriod>,
    /// Signing time in milliseconds since the Unix epoch (signed Interests)
    pub signature_time: Option<u64>,
}

impl SignatureInfo {
    /// SignatureInfo with only a signature type
    pub fn new(signature_type: SignatureType) -> Self {
        Self {
            signature_type,
            key_locator: None,
            validity_period: None,
            signature_time: None,
        }
    }

    /// Set a Name key locator, builder style
    pub fn with_key_locator(mut self, name: Name) -> Self {
        self.key_locator = Some(KeyLocator::Name(name));
        self
    }

    /// Set a KeyDigest key locator, builder style
    pub fn with_key_digest(mut self, digest: Vec<u8>) -> Self {
        self.key_locator = Some(KeyLocator::KeyDigest(digest));
        self
    }

    /// Set the validity period, builder style
    pub fn with_validity_period(mut self, validity: ValidityPeriod) -> Self {
        self.validity_period = Some(validity);
        self
    }

    /// Set the signing time, builder style
    pub fn with_signature_time(mut self, millis: u64) -> Self {
        self.signature_time = Some(millis);
        self
    }

    /// Whether a key locator is present
    pub fn has_key_locator(&self) -> bool {
        self.key_locator.is_some()
    }

    /// Append the TLV with the given outer TLV-TYPE (0x16 or 0x2c)
    pub fn encode_as(&self, typ: u64, buf: &mut BytesMut) {
        let mut value = BytesMut::new();
        tlv::encode_tlv(
            &mut value,
            types::SIGNATURE_TYPE,
            &tlv::encode_nonneg(self.signature_type.to_u64()),
        );
        if let Some(locator) = &self.key_locator {
            locator.encode_into(&mut value);
        }
        if let Some(validity) = &self.validity_period {
            validity.encode_into(&mut value);
        }
        if let Some(time) = self.signature_time {
            tlv::encode_tlv(&mut value, types::SIGNATURE_TIME, &tlv::encode_nonneg(time));
        }
        tlv::encode_tlv(buf, typ, &value);
    }

    /// Data-carried SignatureInfo TLV
    pub fn to_data_wire(&self) -> Vec<u8> {
        let mut buf = BytesMut::new();
        self.encode_as(types::SIGNATURE_INFO, &mut buf);
        buf.to_vec()
    }

    /// Interest-carried InterestSignatureInfo TLV
    pub fn to_interest_wire(&self) -> Vec<u8> {
        let mut buf = BytesMut::new();
        self.encode_as(types::INTEREST_SIGNATURE_INFO, &mut buf);
        buf.to_vec()
    }

    /// Decode from a SignatureInfo or InterestSignatureInfo element
    pub fn from_element(element: &Element<'_>) -> Result<Self, TlvError> {
        if element.typ != types::SIGNATURE_INFO && element.typ != types::INTEREST_SIGNATURE_INFO {
            return Err(TlvError::UnexpectedType {
                expected: types::SIGNATURE_INFO,
                found: element.typ,
            });
        }

        let mut children = element.children();
        let signature_type = children
            .next_if(types::SIGNATURE_TYPE)?
            .ok_or(TlvError::MissingElement("SignatureType"))?
            .as_nonneg()?;
        let mut info = SignatureInfo::new(SignatureType::from_u64(signature_type));

        for child in children {
            let child = child?;
            match child.typ {
                types::KEY_LOCATOR if info.key_locator.is_none() => {
                    info.key_locator = Some(KeyLocator::from_element(&child)?);
                }
                types::VALIDITY_PERIOD if info.validity_period.is_none() => {
                    info.validity_period = Some(ValidityPeriod::from_element(&child)?);
                }
                types::SIGNATURE_TIME if info.signature_time.is_none() => {
                    info.signature_time = Some(child.as_nonneg()?);
                }
                types::KEY_LOCATOR | types::VALIDITY_PERIOD | types::SIGNATURE_TIME => {
                    return Err(TlvError::InvalidValue(alloc::format!(
                        "duplicate element of TLV-TYPE {}",
                        child.typ
                    )));
                }
                // unrecognized non-critical elements are skipped
                _ => {}
            }
        }

        Ok(info)
    }

    /// Decode from a complete TLV
    pub fn from_wire(wire: &[u8]) -> Result<Self, TlvError> {
        Self::from_element(&Element::parse_exact(wire)?)
    }
}
