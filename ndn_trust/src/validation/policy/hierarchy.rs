// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Hierarchical trust: a key may only sign names under its own identity.

extern crate alloc;

use alloc::format;

use super::{CertificateRequest, InnerPolicy, PacketRef, PolicyDecision, ValidationContext, ValidationPolicy};
use crate::error::{Result, ValidationError};
use crate::validation::key_locator::{extract_identity_from_key_locator, has_key_component, key_locator_name_of};
use crate::validation::ValidationState;

/// Accepts a packet when the identity of its signing key is a prefix of the
/// packet name.
///
/// `/a/b/data` signed by `/a/KEY/k1` passes, `/c/data` signed by the same key
/// does not. Certificates are held to the same rule as they are retrieved,
/// so every link of the chain sits at or above the one below it.
#[derive(Debug, Default)]
pub struct SimpleHierarchyPolicy {
    inner: InnerPolicy,
}

impl SimpleHierarchyPolicy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ValidationPolicy for SimpleHierarchyPolicy {
    fn policy_name(&self) -> &'static str {
        "SimpleHierarchyPolicy"
    }

    fn check_policy(
        &self,
        packet: PacketRef<'_>,
        state: &mut ValidationState,
        _ctx: &dyn ValidationContext,
    ) -> Result<PolicyDecision> {
        let key_locator = key_locator_name_of(packet, state)?;
        let violation = || {
            ValidationError::policy_rejected(format!(
                "{} signing policy violation for `{}` by `{}`",
                match packet {
                    PacketRef::Interest(_) => "Interest",
                    _ => "Data",
                },
                packet.name(),
                key_locator
            ))
        };

        // the locator comes from the packet, so screen it before extraction
        if !has_key_component(&key_locator) {
            return Err(violation().into());
        }
        let identity = extract_identity_from_key_locator(&key_locator)?;

        if identity.is_prefix_of(packet.name()) {
            log::trace!("{} is under {}", packet.name(), identity);
            Ok(PolicyDecision::Fetch(CertificateRequest::new(key_locator)))
        } else {
            Err(violation().into())
        }
    }

    fn inner_slot(&self) -> &InnerPolicy {
        &self.inner
    }

    fn inner_slot_mut(&mut self) -> &mut InnerPolicy {
        &mut self.inner
    }
}
