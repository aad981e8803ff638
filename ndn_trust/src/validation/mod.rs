// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Packet validation: policies, per-request state, certificate retrieval
//! and the validator tying them together.

pub mod fetcher;
pub mod key_locator;
pub mod policy;
pub mod state;
pub mod storage;
pub mod validator;
pub mod verification;

pub use fetcher::{
    CertificateFetcher, CertificateRetriever, NetworkFetcher, NetworkFetcherOptions, OfflineFetcher,
    Retrieval,
};
pub use policy::{
    AcceptAllPolicy, CertificateRequest, CommandInterestOptions, CommandInterestPolicy, InnerPolicy,
    PacketRef, PolicyDecision, PrefixPolicy, RejectAllPolicy, SignedByPolicy, SimpleHierarchyPolicy,
    ValidationContext, ValidationPolicy,
};
pub use state::{OriginalPacket, Outcome, ValidationState};
pub use storage::{CertificateCache, TrustAnchorContainer};
pub use validator::{Validator, ValidatorOptions};
