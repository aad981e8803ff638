// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Validation policies and their composition.
//!
//! Policies form a singly linked chain. Every node owns at most one inner
//! node, the validator owns the outermost one, and evaluation starts there.
//! A node either decides (fetch a certificate, bypass, or reject) or hands
//! the same request to its inner node.
//!
//! ```text
//! Validator -> CommandInterestPolicy -> SignedByPolicy -> SimpleHierarchyPolicy
//! ```
//!
//! Attaching a policy to a node that already has an inner one attaches it at
//! the innermost node instead, so repeated single insertions always yield a
//! list.

extern crate alloc;

use alloc::boxed::Box;
use core::time::Duration;

use crate::certificate::Certificate;
use crate::error::{Defect, Result, TimeError};
use crate::name::Name;
use crate::packet::{Data, Interest};
use crate::validation::ValidationState;

mod accept_all;
mod command_interest;
mod hierarchy;
mod signed_by;

pub use accept_all::{AcceptAllPolicy, RejectAllPolicy};
pub use command_interest::{CommandInterestOptions, CommandInterestPolicy};
pub use hierarchy::SimpleHierarchyPolicy;
pub use signed_by::{PrefixPolicy, SignedByPolicy};

/// A packet being checked by a policy
#[derive(Debug, Clone, Copy)]
pub enum PacketRef<'a> {
    Data(&'a Data),
    Interest(&'a Interest),
    /// A certificate retrieved while climbing the chain
    Certificate(&'a Certificate),
}

impl<'a> PacketRef<'a> {
    pub fn name(&self) -> &'a Name {
        match self {
            PacketRef::Data(data) => &data.name,
            PacketRef::Interest(interest) => &interest.name,
            PacketRef::Certificate(cert) => cert.name(),
        }
    }

    /// Short packet kind for log and error messages
    pub fn kind(&self) -> &'static str {
        match self {
            PacketRef::Data(_) => "Data",
            PacketRef::Interest(_) => "Interest",
            PacketRef::Certificate(_) => "Certificate",
        }
    }
}

/// Request to retrieve the certificate named by a key locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRequest {
    interest: Interest,
}

impl CertificateRequest {
    pub fn new(name: Name) -> Self {
        Self {
            interest: Interest::new(name).with_can_be_prefix(true),
        }
    }

    pub fn name(&self) -> &Name {
        &self.interest.name
    }

    pub fn interest(&self) -> &Interest {
        &self.interest
    }
}

/// What a policy decided about a packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    /// Accept pending verification by the named certificate
    Fetch(CertificateRequest),
    /// Accept without any signature check
    Bypass,
}

/// What policies may ask of the validator driving them
pub trait ValidationContext: Sync {
    /// Time since the Unix epoch
    fn now(&self) -> core::result::Result<Duration, TimeError> {
        crate::time::unix_now()
    }
}

/// The inner-policy slot of a chain node
#[derive(Default)]
pub struct InnerPolicy(Option<Box<dyn ValidationPolicy>>);

impl InnerPolicy {
    pub fn new() -> Self {
        Self(None)
    }

    /// Attach `policy` here, or at the innermost node if this slot is taken
    pub fn attach(&mut self, policy: Option<Box<dyn ValidationPolicy>>) -> core::result::Result<(), Defect> {
        let policy = policy.ok_or(Defect::NullInnerPolicy)?;
        match self.0.as_mut() {
            Some(inner) => inner.set_inner_policy(Some(policy)),
            None => {
                self.0 = Some(policy);
                Ok(())
            }
        }
    }

    pub fn get(&self) -> Option<&dyn ValidationPolicy> {
        self.0.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Delegate a check to the inner policy
    pub fn check(
        &self,
        packet: PacketRef<'_>,
        state: &mut ValidationState,
        ctx: &dyn ValidationContext,
    ) -> Result<PolicyDecision> {
        match self.get() {
            Some(inner) => {
                log::trace!("{} delegating {} to {}", packet.kind(), packet.name(), inner.policy_name());
                inner.check_policy(packet, state, ctx)
            }
            None => Err(Defect::MissingInnerPolicy.into()),
        }
    }
}

impl core::fmt::Debug for InnerPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.get() {
            Some(inner) => write!(f, "InnerPolicy({})", inner.policy_name()),
            None => write!(f, "InnerPolicy(None)"),
        }
    }
}

/// A node of the policy chain.
///
/// `check_policy` returns `Ok(PolicyDecision)` to accept, an
/// `Err(Error::Validation)` to reject, or the result of
/// [`check_inner`](ValidationPolicy::check_inner) to delegate. The `ctx`
/// argument is the validator that owns the chain; delegating nodes pass the
/// same reference inward.
pub trait ValidationPolicy: Send + Sync {
    /// Short name for logs
    fn policy_name(&self) -> &'static str;

    fn check_policy(
        &self,
        packet: PacketRef<'_>,
        state: &mut ValidationState,
        ctx: &dyn ValidationContext,
    ) -> Result<PolicyDecision>;

    fn inner_slot(&self) -> &InnerPolicy;

    fn inner_slot_mut(&mut self) -> &mut InnerPolicy;

    /// Attach a policy at the end of the chain starting here
    fn set_inner_policy(&mut self, policy: Option<Box<dyn ValidationPolicy>>) -> core::result::Result<(), Defect> {
        self.inner_slot_mut().attach(policy)
    }

    fn inner_policy(&self) -> Option<&dyn ValidationPolicy> {
        self.inner_slot().get()
    }

    fn has_inner_policy(&self) -> bool {
        self.inner_slot().is_set()
    }

    /// Forward the unchanged request to the inner policy
    fn check_inner(
        &self,
        packet: PacketRef<'_>,
        state: &mut ValidationState,
        ctx: &dyn ValidationContext,
    ) -> Result<PolicyDecision> {
        self.inner_slot().check(packet, state, ctx)
    }
}

/// Chain built by attaching each policy in order, the first outermost
pub fn chain<I>(policies: I) -> core::result::Result<Option<Box<dyn ValidationPolicy>>, Defect>
where
    I: IntoIterator<Item = Box<dyn ValidationPolicy>>,
{
    let mut policies = policies.into_iter();
    let Some(mut head) = policies.next() else {
        return Ok(None);
    };
    for policy in policies {
        head.set_inner_policy(Some(policy))?;
    }
    Ok(Some(head))
}
