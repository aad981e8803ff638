// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Packet signature checks with `ring`.

use super::{CryptoBackend, SignatureAlgorithm};
use crate::error::{CryptoError, Result};
use ring::signature::{self, UnparsedPublicKey, VerificationAlgorithm};

/// Checks packet and certificate signatures with `ring`
#[derive(Debug, Default, Clone, Copy)]
pub struct RingBackend;

/// `ring` verifier for a key and signature type pair.
///
/// ECDSA signature values in NDN packets are DER-encoded, hence the ASN.1
/// variants.
fn ring_verifier(algorithm: SignatureAlgorithm) -> &'static dyn VerificationAlgorithm {
    match algorithm {
        SignatureAlgorithm::EcdsaP256Sha256 => &signature::ECDSA_P256_SHA256_ASN1,
        SignatureAlgorithm::EcdsaP384Sha256 => &signature::ECDSA_P384_SHA256_ASN1,
        SignatureAlgorithm::RsaPkcs1Sha256 => &signature::RSA_PKCS1_2048_8192_SHA256,
        SignatureAlgorithm::Ed25519 => &signature::ED25519,
    }
}

impl CryptoBackend for RingBackend {
    fn verify_signature(
        &self,
        algorithm: SignatureAlgorithm,
        signed_data: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<()> {
        log::trace!(
            "{:?}: {}-byte signed portion, {}-byte SignatureValue",
            algorithm,
            signed_data.len(),
            signature.len()
        );

        UnparsedPublicKey::new(ring_verifier(algorithm), public_key)
            .verify(signed_data, signature)
            .map_err(|_| {
                log::debug!("{:?} SignatureValue does not match the signer key", algorithm);
                CryptoError::VerificationFailed.into()
            })
    }
}
