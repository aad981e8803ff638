// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Key pairs generated at test time.

use std::sync::atomic::{AtomicUsize, Ordering};

use ndn_trust::certificate::construct_key_name;
use ndn_trust::packet::SignatureType;
use ndn_trust::{Component, Name};
use ring::rand::SystemRandom;
use ring::signature::{EcdsaKeyPair, Ed25519KeyPair, KeyPair, ECDSA_P256_SHA256_ASN1_SIGNING};

/// SubjectPublicKeyInfo header of an Ed25519 key
const ED25519_SPKI_PREFIX: [u8; 12] = [
    0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00,
];

/// SubjectPublicKeyInfo header of an uncompressed P-256 key
const P256_SPKI_PREFIX: [u8; 26] = [
    0x30, 0x59, 0x30, 0x13, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06, 0x08, 0x2a,
    0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07, 0x03, 0x42, 0x00,
];

static KEY_COUNTER: AtomicUsize = AtomicUsize::new(0);

enum Pair {
    Ed25519(Ed25519KeyPair),
    Ecdsa(EcdsaKeyPair),
}

/// A named signing key
pub struct TestKey {
    identity: Name,
    key_name: Name,
    pair: Pair,
    rng: SystemRandom,
}

impl TestKey {
    /// Generate a key for `identity` with the algorithm chosen by [`super::use_ecdsa`]
    pub fn generate(identity: &str) -> Self {
        if super::use_ecdsa() {
            Self::generate_ecdsa(identity)
        } else {
            Self::generate_ed25519(identity)
        }
    }

    pub fn generate_ed25519(identity: &str) -> Self {
        let rng = SystemRandom::new();
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&rng).expect("Ed25519 key generation");
        let pair = Ed25519KeyPair::from_pkcs8(pkcs8.as_ref()).expect("Ed25519 key parsing");
        Self::with_pair(identity, Pair::Ed25519(pair), rng)
    }

    pub fn generate_ecdsa(identity: &str) -> Self {
        let rng = SystemRandom::new();
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, &rng)
            .expect("P-256 key generation");
        let pair = EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, pkcs8.as_ref(), &rng)
            .expect("P-256 key parsing");
        Self::with_pair(identity, Pair::Ecdsa(pair), rng)
    }

    fn with_pair(identity: &str, pair: Pair, rng: SystemRandom) -> Self {
        let identity = Name::from_uri(identity).expect("identity URI");
        let n = KEY_COUNTER.fetch_add(1, Ordering::Relaxed);
        let key_id = Component::generic(format!("k{}", n).into_bytes());
        let key_name = construct_key_name(&identity, key_id);
        Self {
            identity,
            key_name,
            pair,
            rng,
        }
    }

    pub fn identity(&self) -> &Name {
        &self.identity
    }

    /// `/<identity>/KEY/<key-id>`
    pub fn key_name(&self) -> &Name {
        &self.key_name
    }

    pub fn signature_type(&self) -> SignatureType {
        match self.pair {
            Pair::Ed25519(_) => SignatureType::Ed25519,
            Pair::Ecdsa(_) => SignatureType::Sha256WithEcdsa,
        }
    }

    /// DER SubjectPublicKeyInfo, the content of a certificate for this key
    pub fn public_key_spki(&self) -> Vec<u8> {
        let (prefix, key): (&[u8], &[u8]) = match &self.pair {
            Pair::Ed25519(pair) => (&ED25519_SPKI_PREFIX, pair.public_key().as_ref()),
            Pair::Ecdsa(pair) => (&P256_SPKI_PREFIX, pair.public_key().as_ref()),
        };
        let mut spki = prefix.to_vec();
        spki.extend_from_slice(key);
        spki
    }

    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        match &self.pair {
            Pair::Ed25519(pair) => pair.sign(message).as_ref().to_vec(),
            Pair::Ecdsa(pair) => pair
                .sign(&self.rng, message)
                .expect("ECDSA signing")
                .as_ref()
                .to_vec(),
        }
    }
}

impl std::fmt::Debug for TestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestKey")
            .field("key_name", &self.key_name)
            .field("signature_type", &self.signature_type())
            .finish()
    }
}
