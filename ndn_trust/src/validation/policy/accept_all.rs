// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Terminal policies that decide without looking at the signer.

extern crate alloc;

use alloc::format;

use super::{InnerPolicy, PacketRef, PolicyDecision, ValidationContext, ValidationPolicy};
use crate::error::{Result, ValidationError};
use crate::validation::ValidationState;

/// Accepts every packet without checking its signature.
///
/// Only meant for testing and for namespaces that carry no trust.
#[derive(Debug, Default)]
pub struct AcceptAllPolicy {
    inner: InnerPolicy,
}

impl AcceptAllPolicy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ValidationPolicy for AcceptAllPolicy {
    fn policy_name(&self) -> &'static str {
        "AcceptAllPolicy"
    }

    fn check_policy(
        &self,
        packet: PacketRef<'_>,
        _state: &mut ValidationState,
        _ctx: &dyn ValidationContext,
    ) -> Result<PolicyDecision> {
        log::trace!("accepting {} {} unconditionally", packet.kind(), packet.name());
        Ok(PolicyDecision::Bypass)
    }

    fn inner_slot(&self) -> &InnerPolicy {
        &self.inner
    }

    fn inner_slot_mut(&mut self) -> &mut InnerPolicy {
        &mut self.inner
    }
}

/// Rejects every packet
#[derive(Debug, Default)]
pub struct RejectAllPolicy {
    inner: InnerPolicy,
}

impl RejectAllPolicy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ValidationPolicy for RejectAllPolicy {
    fn policy_name(&self) -> &'static str {
        "RejectAllPolicy"
    }

    fn check_policy(
        &self,
        packet: PacketRef<'_>,
        _state: &mut ValidationState,
        _ctx: &dyn ValidationContext,
    ) -> Result<PolicyDecision> {
        Err(ValidationError::policy_rejected(format!(
            "{} `{}` is not allowed by any rule",
            packet.kind(),
            packet.name()
        ))
        .into())
    }

    fn inner_slot(&self) -> &InnerPolicy {
        &self.inner
    }

    fn inner_slot_mut(&mut self) -> &mut InnerPolicy {
        &mut self.inner
    }
}
