// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Per-request validation state.

extern crate alloc;

use alloc::boxed::Box;
use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;

use crate::certificate::Certificate;
use crate::crypto_backend::CryptoBackend;
use crate::error::{Defect, ValidationError};
use crate::name::Name;
use crate::packet::{Data, Interest};
use crate::validation::verification;

/// The packet a validation was started for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginalPacket {
    Data(Data),
    Interest(Interest),
}

impl OriginalPacket {
    pub fn name(&self) -> &Name {
        match self {
            OriginalPacket::Data(data) => &data.name,
            OriginalPacket::Interest(interest) => &interest.name,
        }
    }
}

/// Terminal result of a validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(ValidationError),
}

type SuccessHook = Box<dyn FnOnce() + Send + Sync>;

/// State of one top-level validation.
///
/// The chain holds the certificates retrieved so far, the signer of the
/// original packet first. Its length is the current depth. The outcome is
/// written exactly once.
pub struct ValidationState {
    original: Arc<OriginalPacket>,
    chain: Vec<Certificate>,
    seen_names: Vec<Name>,
    tags: Vec<Box<dyn Any + Send + Sync>>,
    success_hooks: Vec<SuccessHook>,
    outcome: Option<Outcome>,
}

impl ValidationState {
    pub fn new(original: OriginalPacket) -> Self {
        Self {
            original: Arc::new(original),
            chain: Vec::new(),
            seen_names: Vec::new(),
            tags: Vec::new(),
            success_hooks: Vec::new(),
            outcome: None,
        }
    }

    pub fn for_data(data: Data) -> Self {
        Self::new(OriginalPacket::Data(data))
    }

    pub fn for_interest(interest: Interest) -> Self {
        Self::new(OriginalPacket::Interest(interest))
    }

    pub fn original(&self) -> &OriginalPacket {
        &self.original
    }

    /// Shared handle to the original packet, usable while the state is borrowed mutably
    pub fn original_handle(&self) -> Arc<OriginalPacket> {
        self.original.clone()
    }

    /// Number of certificates retrieved so far
    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    pub fn chain(&self) -> &[Certificate] {
        &self.chain
    }

    /// Certificate names consumed so far, in order
    pub fn seen_certificate_names(&self) -> &[Name] {
        &self.seen_names
    }

    /// Whether `name` equals or is a prefix of a certificate already in the chain
    pub fn has_seen_certificate_name(&self, name: &Name) -> bool {
        self.seen_names.iter().any(|seen| name.is_prefix_of(seen))
    }

    /// Append a retrieved certificate one level up the chain
    pub fn add_certificate(&mut self, cert: Certificate) {
        log::trace!("chain depth {} -> {}: {}", self.depth(), self.depth() + 1, cert.name());
        self.seen_names.push(cert.name().clone());
        self.chain.push(cert);
    }

    /// Attach a typed tag, replacing any tag of the same type
    pub fn set_tag<T: Any + Send + Sync>(&mut self, tag: T) {
        self.tags.retain(|t| !t.is::<T>());
        self.tags.push(Box::new(tag));
    }

    pub fn tag<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.tags.iter().find_map(|t| t.downcast_ref::<T>())
    }

    /// Run `hook` once if, and only if, the validation succeeds
    pub fn add_after_success<H: FnOnce() + Send + Sync + 'static>(&mut self, hook: H) {
        self.success_hooks.push(Box::new(hook));
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Record a failure
    pub fn fail(&mut self, error: ValidationError) -> Result<(), Defect> {
        if self.outcome.is_some() {
            return Err(Defect::OutcomeAlreadySet);
        }
        log::debug!("validation of {} failed: {}", self.original.name(), error);
        self.success_hooks.clear();
        self.outcome = Some(Outcome::Failure(error));
        Ok(())
    }

    /// Record success and run the after-success hooks
    pub fn succeed(&mut self) -> Result<(), Defect> {
        if self.outcome.is_some() {
            return Err(Defect::OutcomeAlreadySet);
        }
        log::debug!("validation of {} succeeded", self.original.name());
        self.outcome = Some(Outcome::Success);
        for hook in self.success_hooks.drain(..) {
            hook();
        }
        Ok(())
    }

    /// Verify each retrieved certificate with the key of the one above it,
    /// starting from the link signed by `trusted`.
    ///
    /// `on_verified` sees every certificate whose signature checked out. On
    /// success the certificate that signs the original packet is returned
    /// (`trusted` itself when nothing was retrieved). On failure the chain is
    /// cut at the bad link.
    pub fn verify_certificate_chain<B, F>(
        &mut self,
        trusted: &Certificate,
        backend: &B,
        mut on_verified: F,
    ) -> Result<Certificate, ValidationError>
    where
        B: CryptoBackend + ?Sized,
        F: FnMut(&Certificate),
    {
        let mut signer = trusted.clone();
        for i in (0..self.chain.len()).rev() {
            let cert = &self.chain[i];
            if !verification::verify_certificate_signature(cert, &signer, backend) {
                let error = ValidationError::signature_mismatch(format!(
                    "Invalid signature of certificate `{}`",
                    cert.name()
                ));
                log::error!("{}", error);
                self.chain.truncate(i);
                return Err(error);
            }
            on_verified(cert);
            signer = cert.clone();
        }
        Ok(signer)
    }
}

impl core::fmt::Debug for ValidationState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ValidationState")
            .field("original", &self.original.name())
            .field("depth", &self.depth())
            .field("seen_names", &self.seen_names)
            .field("outcome", &self.outcome)
            .finish()
    }
}
