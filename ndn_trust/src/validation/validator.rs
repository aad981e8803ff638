// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Validation orchestration.
//!
//! ```text
//! packet --policy--> key locator --anchor/cache/fetch--> certificate
//!                                                          |
//!              +---------------- policy again <------------+
//!              |
//!           anchored --> verify links top-down --> verify packet --> outcome
//! ```
//!
//! A validation descends from the packet towards a trust anchor, one
//! certificate per level, and only starts checking signatures once an
//! anchor (or a previously verified certificate) is reached.

extern crate alloc;

use alloc::boxed::Box;
use alloc::format;
use async_recursion::async_recursion;
use core::time::Duration;
use futures::channel::oneshot;
use futures::future::{select, Either};

use crate::certificate::{digest_sha256_identity, Certificate};
use crate::crypto_backend::CryptoBackend;
use crate::error::{Defect, Error, Result, ValidationError, ValidationErrorCode};
use crate::name::Name;
use crate::packet::{Data, Interest, SignedInterestFormat};
use crate::time::Time;
use crate::validation::fetcher::CertificateFetcher;
use crate::validation::policy::{
    CertificateRequest, PacketRef, PolicyDecision, ValidationContext, ValidationPolicy,
};
use crate::validation::state::OriginalPacket;
use crate::validation::storage::{CertificateCache, TrustAnchorContainer};
use crate::validation::verification;
use crate::validation::ValidationState;

/// Validator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Most certificates retrieved for one validation
    pub max_depth: usize,
    /// Reject retrieved certificates outside their validity period
    pub check_validity_period: bool,
    /// How long a certificate stays trusted after its chain was verified
    pub verified_cache_lifetime: Duration,
    /// How long a retrieved, not yet verified certificate is kept
    pub unverified_cache_lifetime: Duration,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            max_depth: 25,
            check_validity_period: !cfg!(feature = "no-time-check"),
            verified_cache_lifetime: Duration::from_secs(3600),
            unverified_cache_lifetime: Duration::from_secs(300),
        }
    }
}

impl ValidatorOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Skip validity period checking (for testing purposes)
    pub fn skip_validity_period_check(mut self) -> Self {
        self.check_validity_period = false;
        self
    }

    pub fn with_verified_cache_lifetime(mut self, lifetime: Duration) -> Self {
        self.verified_cache_lifetime = lifetime;
        self
    }

    pub fn with_unverified_cache_lifetime(mut self, lifetime: Duration) -> Self {
        self.unverified_cache_lifetime = lifetime;
        self
    }
}

/// Key that produced the signature of the packet being checked
#[derive(Debug, Clone)]
enum Signer {
    Digest,
    Certificate(Certificate),
}

/// Validates packets against a policy chain and a set of trust anchors.
///
/// The validator owns the chain. Policies reach back into it only through
/// the [`ValidationContext`] argument of each check.
pub struct Validator<F, B> {
    policy: Box<dyn ValidationPolicy>,
    fetcher: F,
    backend: B,
    anchors: TrustAnchorContainer,
    verified: CertificateCache,
    unverified: CertificateCache,
    options: ValidatorOptions,
}

#[cfg(feature = "ring-backend")]
impl<F: CertificateFetcher> Validator<F, crate::crypto_backend::RingBackend> {
    /// Validator checking signatures with `ring`
    pub fn new(policy: Box<dyn ValidationPolicy>, fetcher: F) -> Self {
        Self::with_backend(policy, fetcher, crate::crypto_backend::RingBackend)
    }
}

impl<F, B> Validator<F, B>
where
    F: CertificateFetcher,
    B: CryptoBackend,
{
    pub fn with_backend(policy: Box<dyn ValidationPolicy>, fetcher: F, backend: B) -> Self {
        let options = ValidatorOptions::default();
        Self {
            policy,
            fetcher,
            backend,
            anchors: TrustAnchorContainer::new(),
            verified: CertificateCache::new(options.verified_cache_lifetime),
            unverified: CertificateCache::new(options.unverified_cache_lifetime),
            options,
        }
    }

    /// Replace the options; certificate caches are emptied
    pub fn with_options(mut self, options: ValidatorOptions) -> Self {
        self.verified = CertificateCache::new(options.verified_cache_lifetime);
        self.unverified = CertificateCache::new(options.unverified_cache_lifetime);
        self.options = options;
        self
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    pub fn policy(&self) -> &dyn ValidationPolicy {
        self.policy.as_ref()
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Configure a trust anchor
    pub fn load_anchor(&self, cert: Certificate) {
        self.anchors.insert(cert);
    }

    pub fn anchors(&self) -> &TrustAnchorContainer {
        &self.anchors
    }

    pub fn verified_cache(&self) -> &CertificateCache {
        &self.verified
    }

    pub fn unverified_cache(&self) -> &CertificateCache {
        &self.unverified
    }

    /// Validate a Data packet
    pub async fn validate_data(&self, data: Data) -> Result<()> {
        let mut state = ValidationState::for_data(data);
        self.validate(&mut state).await
    }

    /// Validate a signed Interest
    pub async fn validate_interest(&self, interest: Interest) -> Result<()> {
        let mut state = ValidationState::for_interest(interest);
        self.validate(&mut state).await
    }

    /// Validate the packet held by `state` and record the outcome on it.
    ///
    /// Validation failures are both recorded and returned. Defects are only
    /// returned, and leave the state without an outcome.
    pub async fn validate(&self, state: &mut ValidationState) -> Result<()> {
        if state.is_finished() {
            return Err(Defect::OutcomeAlreadySet.into());
        }
        let result = self.validate_original(state).await;
        Self::finish(state, result)
    }

    /// Validate `data` and send the result to `sender`.
    ///
    /// Dropping the receiver cancels the validation, including an ongoing
    /// certificate retrieval; nothing is sent in that case.
    pub async fn validate_data_into(&self, data: Data, sender: oneshot::Sender<Result<()>>) {
        let mut state = ValidationState::for_data(data);
        self.validate_into(&mut state, sender).await
    }

    /// Validate `interest` and send the result to `sender`, see
    /// [`validate_data_into`](Self::validate_data_into)
    pub async fn validate_interest_into(&self, interest: Interest, sender: oneshot::Sender<Result<()>>) {
        let mut state = ValidationState::for_interest(interest);
        self.validate_into(&mut state, sender).await
    }

    async fn validate_into(&self, state: &mut ValidationState, mut sender: oneshot::Sender<Result<()>>) {
        let name = state.original().name().clone();
        let outcome = {
            let validation = self.validate(state);
            let cancelled = sender.cancellation();
            futures::pin_mut!(validation, cancelled);
            match select(validation, cancelled).await {
                Either::Left((result, _)) => Some(result),
                Either::Right(_) => None,
            }
        };

        match outcome {
            Some(result) => {
                if sender.send(result).is_err() {
                    log::debug!("result for {} dropped by the receiver", name);
                }
            }
            None => log::debug!("validation of {} cancelled", name),
        }
    }

    fn finish(state: &mut ValidationState, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => {
                state.succeed()?;
                Ok(())
            }
            Err(Error::Validation(e)) => {
                state.fail(e.clone())?;
                Err(Error::Validation(e))
            }
            Err(other) => Err(other),
        }
    }

    /// Current time, `None` when no clock is available
    fn clock(&self) -> Option<Duration> {
        self.now().ok()
    }

    async fn validate_original(&self, state: &mut ValidationState) -> Result<()> {
        let original = state.original_handle();
        let packet = match original.as_ref() {
            OriginalPacket::Data(data) => {
                if data.signature_info.is_none() || data.signature_value.is_none() {
                    return Err(ValidationError::no_signature(format!(
                        "Data `{}` is not signed",
                        data.name
                    ))
                    .into());
                }
                PacketRef::Data(data)
            }
            OriginalPacket::Interest(interest) => {
                let format = interest.signed_format();
                if format == SignedInterestFormat::V03 && interest.signature_value.is_none() {
                    return Err(ValidationError::no_signature(format!(
                        "Interest `{}` lacks InterestSignatureValue",
                        interest.name
                    ))
                    .into());
                }
                state.set_tag(format);
                PacketRef::Interest(interest)
            }
        };

        let signer = match self.policy.check_policy(packet, state, self)? {
            PolicyDecision::Bypass => {
                log::trace!("{} accepted without signature check", packet.name());
                return Ok(());
            }
            PolicyDecision::Fetch(request) => self.request_certificate(request, state).await?,
        };

        self.verify_original(&original, &signer, state)
    }

    /// Resolve `request` to the certificate signing the link below it,
    /// descending towards a trust anchor as needed
    #[async_recursion]
    async fn request_certificate(
        &self,
        request: CertificateRequest,
        state: &mut ValidationState,
    ) -> Result<Signer> {
        let name = request.name().clone();

        if state.depth() >= self.options.max_depth {
            return Err(ValidationError::new(
                ValidationErrorCode::ExceededDepthLimit,
                format!("Exceeded validation depth limit ({})", self.options.max_depth),
            )
            .into());
        }

        if name == digest_sha256_identity() {
            if let Some(cert) = state.chain().last() {
                return Err(ValidationError::invalid_key_locator(format!(
                    "Certificate `{}` cannot be signed by a digest",
                    cert.name()
                ))
                .into());
            }
            return Ok(Signer::Digest);
        }

        if state.has_seen_certificate_name(&name) {
            return Err(ValidationError::new(
                ValidationErrorCode::LoopDetected,
                format!("Validation loop detected for certificate `{}`", name),
            )
            .into());
        }

        let now = self.clock();
        if let Some(trusted) = self.find_trusted_certificate(&name, now) {
            log::trace!("{} is trusted, verifying {} link(s)", trusted.name(), state.depth());
            let verified = &self.verified;
            let signer = state.verify_certificate_chain(&trusted, &self.backend, |cert| {
                verified.insert(cert.clone(), now)
            })?;
            return Ok(Signer::Certificate(signer));
        }

        let cert = match self.unverified.find(&name, now) {
            Some(cert) => {
                log::trace!("{} found in the unverified cache", cert.name());
                cert
            }
            None => self.fetcher.fetch(&request, state).await?,
        };
        if !name.is_prefix_of(cert.name()) {
            let error = ValidationError::cannot_retrieve_cert(format!(
                "Retrieved certificate `{}` does not match requested key `{}`",
                cert.name(),
                name
            ));
            log::error!("{}", error);
            return Err(error.into());
        }
        self.unverified.insert(cert.clone(), now);

        if self.options.check_validity_period {
            let now = Time::from_unix_duration(self.now()?)?;
            if !cert.is_valid_at(&now) {
                return Err(ValidationError::new(
                    ValidationErrorCode::ExpiredOrNotYetValidCert,
                    format!("Retrieved certificate is not yet valid or expired `{}`", cert.name()),
                )
                .into());
            }
        }

        match self.policy.check_policy(PacketRef::Certificate(&cert), state, self)? {
            PolicyDecision::Bypass => Err(ValidationError::policy_rejected(format!(
                "Validation policy is not allowed to designate `{}` as a trust anchor",
                cert.name()
            ))
            .into()),
            PolicyDecision::Fetch(next) => {
                state.add_certificate(cert);
                self.request_certificate(next, state).await
            }
        }
    }

    fn find_trusted_certificate(&self, name: &Name, now: Option<Duration>) -> Option<Certificate> {
        self.anchors
            .find(name)
            .or_else(|| self.verified.find(name, now))
    }

    fn verify_original(&self, original: &OriginalPacket, signer: &Signer, state: &ValidationState) -> Result<()> {
        let verified = match original {
            OriginalPacket::Data(data) => match signer {
                Signer::Digest => verification::verify_digest_data(data),
                Signer::Certificate(cert) => verification::verify_data_signature(data, cert, &self.backend),
            },
            OriginalPacket::Interest(interest) => {
                let format = state
                    .tag::<SignedInterestFormat>()
                    .copied()
                    .unwrap_or_else(|| interest.signed_format());
                match signer {
                    Signer::Digest => verification::verify_digest_interest(interest, format),
                    Signer::Certificate(cert) => {
                        verification::verify_interest_signature(interest, format, cert, &self.backend)
                    }
                }
            }
        };

        if verified {
            return Ok(());
        }
        let kind = match original {
            OriginalPacket::Data(_) => "data",
            OriginalPacket::Interest(_) => "interest",
        };
        let error = ValidationError::signature_mismatch(format!(
            "Invalid signature of {} `{}`",
            kind,
            original.name()
        ));
        log::error!("{}", error);
        Err(error.into())
    }
}

impl<F, B> ValidationContext for Validator<F, B>
where
    F: CertificateFetcher,
    B: CryptoBackend,
{
}

impl<F, B> core::fmt::Debug for Validator<F, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Validator")
            .field("policy", &self.policy.policy_name())
            .field("anchors", &self.anchors)
            .field("options", &self.options)
            .finish()
    }
}
