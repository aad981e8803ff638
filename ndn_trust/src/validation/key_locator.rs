// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Resolving the claimed signer of a packet.

extern crate alloc;

use alloc::format;

use crate::certificate::{
    digest_sha256_identity, hmac_identity, is_key_component, KEY_COMPONENT_SCAN_WINDOW,
};
use crate::error::{Defect, ValidationError};
use crate::name::Name;
use crate::packet::{signed_interest, Interest, KeyLocator, SignatureInfo, SignatureType, SignedInterestFormat};
use crate::validation::policy::PacketRef;
use crate::validation::ValidationState;

/// Name of the certificate that signed a packet.
///
/// DigestSha256 signatures resolve to the digest sentinel identity. Any
/// other signature needs a KeyLocator of Name type.
pub fn key_locator_name(info: &SignatureInfo) -> Result<Name, ValidationError> {
    if info.signature_type == SignatureType::DigestSha256 {
        return Ok(digest_sha256_identity());
    }

    match &info.key_locator {
        None => Err(ValidationError::invalid_key_locator("KeyLocator is missing")),
        Some(KeyLocator::Name(name)) => Ok(name.clone()),
        Some(KeyLocator::KeyDigest(_)) => Err(ValidationError::invalid_key_locator(
            "KeyLocator type is not Name",
        )),
    }
}

/// SignatureInfo of an Interest in the format recorded on `state`.
///
/// The v0.2 format keeps it in name component -2, so the name must have at
/// least [`signed_interest::MIN_SIZE`] components.
pub fn signature_info_of_interest(
    interest: &Interest,
    state: &ValidationState,
) -> Result<SignatureInfo, ValidationError> {
    let format = state
        .tag::<SignedInterestFormat>()
        .copied()
        .unwrap_or_else(|| interest.signed_format());

    if format == SignedInterestFormat::V03 {
        return interest
            .signature_info
            .clone()
            .ok_or_else(|| ValidationError::no_signature("Interest lacks InterestSignatureInfo"));
    }

    let name = &interest.name;
    if name.len() < signed_interest::MIN_SIZE {
        return Err(ValidationError::malformed_signature(format!(
            "Interest name too short `{}`",
            name
        )));
    }

    interest.signature_info_v02().map_err(|e| {
        ValidationError::malformed_signature(format!("Malformed SignatureInfo in `{}`: {}", name, e))
    })
}

/// SignatureInfo of any packet handed to a policy
pub fn signature_info_of(
    packet: PacketRef<'_>,
    state: &ValidationState,
) -> Result<SignatureInfo, ValidationError> {
    match packet {
        PacketRef::Data(data) => data.signature_info.clone().ok_or_else(|| {
            ValidationError::no_signature(format!("Data `{}` lacks SignatureInfo", data.name))
        }),
        PacketRef::Certificate(cert) => Ok(cert.signature_info().clone()),
        PacketRef::Interest(interest) => signature_info_of_interest(interest, state),
    }
}

/// Key-locator name of any packet handed to a policy
pub fn key_locator_name_of(
    packet: PacketRef<'_>,
    state: &ValidationState,
) -> Result<Name, ValidationError> {
    key_locator_name(&signature_info_of(packet, state)?)
}

/// Index of the `KEY` marker among the last [`KEY_COMPONENT_SCAN_WINDOW`] components
fn find_key_component(name: &Name) -> Option<usize> {
    let lower_bound = name.len().saturating_sub(KEY_COMPONENT_SCAN_WINDOW);
    (lower_bound..name.len())
        .rev()
        .find(|&i| is_key_component(&name.components()[i]))
}

/// Whether a `KEY` marker sits within the scan window of `name`
pub fn has_key_component(name: &Name) -> bool {
    find_key_component(name).is_some()
}

/// Identity part of a key-locator name.
///
/// The two sentinel identities come back unchanged. Any other name must
/// carry the `KEY` marker within its last [`KEY_COMPONENT_SCAN_WINDOW`]
/// components; everything before the marker is the identity.
pub fn extract_identity_from_key_locator(key_locator: &Name) -> Result<Name, Defect> {
    if *key_locator == digest_sha256_identity() || *key_locator == hmac_identity() {
        return Ok(key_locator.clone());
    }

    match find_key_component(key_locator) {
        Some(i) => Ok(key_locator.prefix(i as isize)),
        None => Err(Defect::KeyLocatorNamingViolation(key_locator.clone())),
    }
}
