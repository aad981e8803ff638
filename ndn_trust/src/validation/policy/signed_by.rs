// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Policies that pin the signer of a namespace.

extern crate alloc;

use alloc::format;

use super::{CertificateRequest, InnerPolicy, PacketRef, PolicyDecision, ValidationContext, ValidationPolicy};
use crate::certificate::digest_sha256_identity;
use crate::error::{Result, ValidationError};
use crate::name::Name;
use crate::validation::key_locator::{extract_identity_from_key_locator, has_key_component, key_locator_name_of};
use crate::validation::ValidationState;

/// Hand the packet to the inner policy, or reject it when this node is last
fn delegate_or_reject<P: ValidationPolicy + ?Sized>(
    policy: &P,
    packet: PacketRef<'_>,
    state: &mut ValidationState,
    ctx: &dyn ValidationContext,
    reason: impl FnOnce() -> alloc::string::String,
) -> Result<PolicyDecision> {
    if policy.has_inner_policy() {
        policy.check_inner(packet, state, ctx)
    } else {
        Err(ValidationError::policy_rejected(reason()).into())
    }
}

/// Identity the key locator claims, or `None` if the locator is not a key name
fn claimed_identity(key_locator: &Name) -> Result<Option<Name>> {
    if *key_locator == digest_sha256_identity() {
        return Ok(Some(key_locator.clone()));
    }
    if !has_key_component(key_locator) {
        return Ok(None);
    }
    Ok(Some(extract_identity_from_key_locator(key_locator)?))
}

/// Accepts packets signed by one fixed identity.
///
/// With [`digest_sha256_identity`] as the signer this accepts digest-only
/// signatures, and the validator then checks the digest without retrieving
/// any certificate. Packets signed by anyone else go to the inner policy.
#[derive(Debug)]
pub struct SignedByPolicy {
    signer: Name,
    inner: InnerPolicy,
}

impl SignedByPolicy {
    pub fn new(signer: Name) -> Self {
        Self {
            signer,
            inner: InnerPolicy::new(),
        }
    }

    /// Accept digest-only signatures
    pub fn digest() -> Self {
        Self::new(digest_sha256_identity())
    }

    pub fn signer(&self) -> &Name {
        &self.signer
    }
}

impl ValidationPolicy for SignedByPolicy {
    fn policy_name(&self) -> &'static str {
        "SignedByPolicy"
    }

    fn check_policy(
        &self,
        packet: PacketRef<'_>,
        state: &mut ValidationState,
        ctx: &dyn ValidationContext,
    ) -> Result<PolicyDecision> {
        let key_locator = key_locator_name_of(packet, state)?;
        if claimed_identity(&key_locator)?.as_ref() == Some(&self.signer) {
            log::trace!("{} is signed by {}", packet.name(), self.signer);
            return Ok(PolicyDecision::Fetch(CertificateRequest::new(key_locator)));
        }

        delegate_or_reject(self, packet, state, ctx, || {
            format!(
                "`{}` is signed by `{}`, expected a key of `{}`",
                packet.name(),
                key_locator,
                self.signer
            )
        })
    }

    fn inner_slot(&self) -> &InnerPolicy {
        &self.inner
    }

    fn inner_slot_mut(&mut self) -> &mut InnerPolicy {
        &mut self.inner
    }
}

/// Packets under `packet_prefix` must be signed by a key under `key_prefix`.
///
/// Packets outside `packet_prefix` go to the inner policy.
#[derive(Debug)]
pub struct PrefixPolicy {
    packet_prefix: Name,
    key_prefix: Name,
    inner: InnerPolicy,
}

impl PrefixPolicy {
    pub fn new(packet_prefix: Name, key_prefix: Name) -> Self {
        Self {
            packet_prefix,
            key_prefix,
            inner: InnerPolicy::new(),
        }
    }

    pub fn packet_prefix(&self) -> &Name {
        &self.packet_prefix
    }

    pub fn key_prefix(&self) -> &Name {
        &self.key_prefix
    }
}

impl ValidationPolicy for PrefixPolicy {
    fn policy_name(&self) -> &'static str {
        "PrefixPolicy"
    }

    fn check_policy(
        &self,
        packet: PacketRef<'_>,
        state: &mut ValidationState,
        ctx: &dyn ValidationContext,
    ) -> Result<PolicyDecision> {
        if !self.packet_prefix.is_prefix_of(packet.name()) {
            return delegate_or_reject(self, packet, state, ctx, || {
                format!("No rule matches {} `{}`", packet.kind(), packet.name())
            });
        }

        let key_locator = key_locator_name_of(packet, state)?;
        if self.key_prefix.is_prefix_of(&key_locator) && has_key_component(&key_locator) {
            log::trace!("{} signed by {} under {}", packet.name(), key_locator, self.key_prefix);
            Ok(PolicyDecision::Fetch(CertificateRequest::new(key_locator)))
        } else {
            Err(ValidationError::policy_rejected(format!(
                "Key `{}` is not allowed to sign `{}`",
                key_locator,
                packet.name()
            ))
            .into())
        }
    }

    fn inner_slot(&self) -> &InnerPolicy {
        &self.inner
    }

    fn inner_slot_mut(&mut self) -> &mut InnerPolicy {
        &mut self.inner
    }
}
