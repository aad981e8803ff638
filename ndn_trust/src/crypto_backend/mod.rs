// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Cryptographic backend abstraction for signature verification.
//!
//! Certificates carry their key as a DER SubjectPublicKeyInfo. The key type
//! found there, together with the SignatureType of the packet being checked,
//! selects a [`SignatureAlgorithm`]; the backend then performs the check.

extern crate alloc;

use alloc::string::ToString;
use alloc::vec::Vec;
use const_oid::ObjectIdentifier;
use der::Decode;
use spki::SubjectPublicKeyInfoOwned;

use crate::error::{CryptoError, Result};
use crate::packet::SignatureType;

#[cfg(feature = "ring-backend")]
mod ring;
#[cfg(feature = "ring-backend")]
pub use self::ring::*;

/// id-ecPublicKey
pub const EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
/// rsaEncryption
pub const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
/// id-Ed25519
pub const ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");
/// secp256r1
pub const SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
/// secp384r1
pub const SECP384R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");

/// Signature algorithm identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// ECDSA with P-256 curve and SHA-256
    EcdsaP256Sha256,
    /// ECDSA with P-384 curve and SHA-256
    EcdsaP384Sha256,
    /// RSA PKCS#1 v1.5 with SHA-256
    RsaPkcs1Sha256,
    /// EdDSA Ed25519 (hash is built-in to the algorithm)
    Ed25519,
}

impl SignatureAlgorithm {
    /// Combine a packet SignatureType with the signer's key type.
    ///
    /// DigestSha256 and HMAC signatures involve no public key and are
    /// rejected here.
    pub fn from_signature_type(
        sig_type: SignatureType,
        key: &PublicKey,
    ) -> core::result::Result<Self, CryptoError> {
        match sig_type {
            SignatureType::Sha256WithEcdsa => {
                if key.algorithm != EC_PUBLIC_KEY {
                    return Err(CryptoError::UnsupportedAlgorithm(alloc::format!(
                        "ECDSA signature with {} key",
                        key.algorithm
                    )));
                }
                match key.curve {
                    Some(SECP256R1) => Ok(SignatureAlgorithm::EcdsaP256Sha256),
                    Some(SECP384R1) => Ok(SignatureAlgorithm::EcdsaP384Sha256),
                    Some(oid) => Err(CryptoError::UnsupportedAlgorithm(alloc::format!(
                        "ECDSA-SHA256 with unsupported curve OID: {}",
                        oid
                    ))),
                    None => Err(CryptoError::UnsupportedAlgorithm(
                        "ECDSA-SHA256 requires a curve OID in the public key parameters"
                            .to_string(),
                    )),
                }
            }
            SignatureType::Sha256WithRsa if key.algorithm == RSA_ENCRYPTION => {
                Ok(SignatureAlgorithm::RsaPkcs1Sha256)
            }
            SignatureType::Ed25519 if key.algorithm == ED25519 => Ok(SignatureAlgorithm::Ed25519),
            other => Err(CryptoError::UnsupportedAlgorithm(alloc::format!(
                "{} with {} key",
                other,
                key.algorithm
            ))),
        }
    }
}

/// A public key taken from a certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    /// Key algorithm OID
    pub algorithm: ObjectIdentifier,
    /// Named curve for EC keys
    pub curve: Option<ObjectIdentifier>,
    /// Contents of the subjectPublicKey BIT STRING
    pub key_bytes: Vec<u8>,
}

impl PublicKey {
    /// Parse a DER-encoded SubjectPublicKeyInfo
    pub fn from_spki_der(der: &[u8]) -> core::result::Result<Self, CryptoError> {
        let spki = SubjectPublicKeyInfoOwned::from_der(der)?;

        // RSA parameters are NULL; only EC keys carry a curve OID
        let curve = if spki.algorithm.oid == EC_PUBLIC_KEY {
            let params = spki.algorithm.parameters.as_ref().ok_or_else(|| {
                CryptoError::InvalidPublicKey("EC key without curve parameters".to_string())
            })?;
            Some(params.decode_as::<ObjectIdentifier>()?)
        } else {
            None
        };

        let key_bytes = spki
            .subject_public_key
            .as_bytes()
            .ok_or_else(|| CryptoError::InvalidPublicKey("unused bits in key".to_string()))?
            .to_vec();

        Ok(Self {
            algorithm: spki.algorithm.oid,
            curve,
            key_bytes,
        })
    }
}

/// Crypto backend trait for signature verification.
///
/// Implementations of this trait provide the cryptographic operations needed
/// to check packet and certificate signatures, allowing different crypto
/// libraries to be used.
pub trait CryptoBackend: Send + Sync {
    /// Verify `signature` over `signed_data`.
    fn verify_signature(
        &self,
        algorithm: SignatureAlgorithm,
        signed_data: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<()>;
}

impl<B: CryptoBackend + ?Sized> CryptoBackend for &B {
    fn verify_signature(
        &self,
        algorithm: SignatureAlgorithm,
        signed_data: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<()> {
        (**self).verify_signature(algorithm, signed_data, signature, public_key)
    }
}
