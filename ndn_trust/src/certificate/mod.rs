// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! NDN certificates.
//!
//! A certificate is a Data packet whose ContentType is KEY, whose content is
//! a DER SubjectPublicKeyInfo, and whose name follows the key naming
//! convention:
//!
//! ```text
//! /<identity>/KEY/<key-id>/<issuer-id>/<version>
//!             -4     -3        -2         -1
//! \_______ key name ______/
//! ```
//!
//! The SignatureInfo of a certificate must carry a ValidityPeriod.

extern crate alloc;

use alloc::format;
use alloc::vec::Vec;
use core::convert::TryFrom;

use crate::crypto_backend::PublicKey;
use crate::error::{CryptoError, Result, ValidationError, ValidationErrorCode};
use crate::name::{Component, Name};
use crate::packet::{content_type, Data, KeyLocator, SignatureInfo};
use crate::time::{Time, ValidityPeriod};

/// Value of the marker component separating identity and key id
pub const KEY_COMPONENT: &[u8] = b"KEY";

/// Position of the `KEY` marker in a certificate name
pub const KEY_COMPONENT_OFFSET: isize = -4;

/// How many trailing components of a key-locator name are searched for the
/// `KEY` marker. The search never walks further back than this, whatever the
/// length of the name.
pub const KEY_COMPONENT_SCAN_WINDOW: usize = 4;

/// `/<identity>/KEY/<key-id>/<issuer-id>/<version>` has at least 4 components
pub const MIN_CERT_NAME_LENGTH: usize = 4;

/// `/<identity>/KEY/<key-id>` has at least 2 components
pub const MIN_KEY_NAME_LENGTH: usize = 2;

/// The `KEY` marker as a generic name component
pub fn key_component() -> Component {
    Component::generic(KEY_COMPONENT)
}

/// Whether `component` is the `KEY` marker
pub fn is_key_component(component: &Component) -> bool {
    *component == key_component()
}

/// Sentinel signer identity for DigestSha256 signatures
pub fn digest_sha256_identity() -> Name {
    Name::new()
        .append_str("localhost")
        .append_str("identity")
        .append_str("digest-sha256")
}

/// Sentinel signer identity for HMAC signatures
pub fn hmac_identity() -> Name {
    Name::new()
        .append_str("localhost")
        .append_str("identity")
        .append_str("hmac")
}

/// `/<identity>/KEY/<key-id>`
pub fn construct_key_name(identity: &Name, key_id: Component) -> Name {
    identity.clone().append(key_component()).append(key_id)
}

/// `/<key-name>/<issuer-id>/<version>`
pub fn construct_certificate_name(key_name: &Name, issuer_id: Component, version: u64) -> Name {
    key_name.clone().append(issuer_id).append_number(version)
}

/// Whether `name` is shaped like a certificate name
pub fn is_valid_certificate_name(name: &Name) -> bool {
    name.len() >= MIN_CERT_NAME_LENGTH
        && name.get(KEY_COMPONENT_OFFSET).is_some_and(is_key_component)
}

/// Whether `name` is shaped like a key name
pub fn is_valid_key_name(name: &Name) -> bool {
    name.len() >= MIN_KEY_NAME_LENGTH && name.get(-2).is_some_and(is_key_component)
}

/// A certificate: a Data packet carrying a public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    data: Data,
    info: SignatureInfo,
    validity: ValidityPeriod,
}

impl Certificate {
    fn malformed(data: &Data, what: &str) -> ValidationError {
        ValidationError::new(
            ValidationErrorCode::MalformedCert,
            format!("`{}` is not a certificate: {}", data.name, what),
        )
    }

    /// Check the certificate format of `data`
    pub fn from_data(data: Data) -> core::result::Result<Self, ValidationError> {
        if !is_valid_certificate_name(&data.name) {
            return Err(Self::malformed(&data, "name does not follow the naming convention"));
        }
        if data.content_type != content_type::KEY {
            return Err(Self::malformed(&data, "ContentType is not KEY"));
        }
        if data.content.is_empty() {
            return Err(Self::malformed(&data, "public key is empty"));
        }
        let info = match data.signature_info.clone() {
            Some(info) => info,
            None => return Err(Self::malformed(&data, "SignatureInfo is missing")),
        };
        let validity = match info.validity_period {
            Some(validity) => validity,
            None => return Err(Self::malformed(&data, "ValidityPeriod is missing")),
        };
        if data.signature_value.is_none() {
            return Err(Self::malformed(&data, "SignatureValue is missing"));
        }
        Ok(Self {
            data,
            info,
            validity,
        })
    }

    /// Decode a certificate from a Data TLV
    pub fn from_wire(wire: &[u8]) -> Result<Self> {
        let data = Data::from_wire(wire)?;
        Ok(Self::from_data(data)?)
    }

    /// Full certificate name
    pub fn name(&self) -> &Name {
        &self.data.name
    }

    /// Identity the key belongs to
    pub fn identity(&self) -> Name {
        self.data.name.prefix(KEY_COMPONENT_OFFSET)
    }

    /// `/<identity>/KEY/<key-id>`
    pub fn key_name(&self) -> Name {
        self.data.name.prefix(-2)
    }

    pub fn key_id(&self) -> &Component {
        &self.data.name.components()[self.data.name.len() - 3]
    }

    pub fn issuer_id(&self) -> &Component {
        &self.data.name.components()[self.data.name.len() - 2]
    }

    pub fn version(&self) -> &Component {
        &self.data.name.components()[self.data.name.len() - 1]
    }

    /// DER SubjectPublicKeyInfo bytes
    pub fn public_key_bits(&self) -> &[u8] {
        &self.data.content
    }

    /// Parsed public key
    pub fn public_key(&self) -> core::result::Result<PublicKey, CryptoError> {
        PublicKey::from_spki_der(&self.data.content)
    }

    pub fn validity_period(&self) -> &ValidityPeriod {
        &self.validity
    }

    /// Whether the validity period covers `time`
    pub fn is_valid_at(&self, time: &Time) -> bool {
        self.validity.is_valid_at(time)
    }

    pub fn signature_info(&self) -> &SignatureInfo {
        &self.info
    }

    pub fn signature_value(&self) -> &[u8] {
        self.data.signature_value.as_deref().unwrap_or(&[])
    }

    /// Name in the KeyLocator, if it is a Name
    pub fn issuer_key_locator(&self) -> Option<&Name> {
        match self.signature_info().key_locator.as_ref()? {
            KeyLocator::Name(name) => Some(name),
            KeyLocator::KeyDigest(_) => None,
        }
    }

    /// Whether the certificate is signed by its own key
    pub fn is_self_signed(&self) -> bool {
        match self.issuer_key_locator() {
            Some(locator) => locator.is_prefix_of(&self.data.name) && locator.len() >= self.data.name.len() - 2,
            None => false,
        }
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn into_data(self) -> Data {
        self.data
    }

    /// Wire encoding of the underlying Data
    pub fn to_wire(&self) -> Vec<u8> {
        self.data.to_wire()
    }
}

impl TryFrom<Data> for Certificate {
    type Error = ValidationError;

    fn try_from(data: Data) -> core::result::Result<Self, Self::Error> {
        Self::from_data(data)
    }
}

impl From<Certificate> for Data {
    fn from(cert: Certificate) -> Data {
        cert.data
    }
}
