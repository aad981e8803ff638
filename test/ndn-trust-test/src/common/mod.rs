// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

#![forbid(unsafe_code)]

/// Default signing algorithm of generated keys.
/// Override at runtime with NDN_TRUST_USE_ECDSA env variable.
pub const USE_ECDSA: bool = false;

/// Check if ECDSA P-256 keys should be generated instead of Ed25519.
/// NDN_TRUST_USE_ECDSA=true or 1 -> uses ECDSA
/// NDN_TRUST_USE_ECDSA=false or unset -> uses Ed25519 (default)
pub fn use_ecdsa() -> bool {
    std::env::var("NDN_TRUST_USE_ECDSA")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(USE_ECDSA)
}

pub mod keys;

pub mod chain;

pub mod retriever;
