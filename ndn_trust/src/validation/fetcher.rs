// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Certificate retrieval.
//!
//! Retrieval is the only step of a validation that may suspend. The
//! validator awaits the fetcher; dropping the validation future drops the
//! fetch with it.

extern crate alloc;

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use async_trait::async_trait;
use core::time::Duration;

use crate::certificate::Certificate;
use crate::error::{ValidationError, ValidationErrorCode};
use crate::packet::{Data, Interest};
use crate::validation::policy::CertificateRequest;
use crate::validation::ValidationState;

/// Resolves a certificate request that no local store could satisfy
#[async_trait]
pub trait CertificateFetcher: Send + Sync {
    async fn fetch(
        &self,
        request: &CertificateRequest,
        state: &ValidationState,
    ) -> Result<Certificate, ValidationError>;
}

#[async_trait]
impl<T: CertificateFetcher + ?Sized> CertificateFetcher for alloc::sync::Arc<T> {
    async fn fetch(
        &self,
        request: &CertificateRequest,
        state: &ValidationState,
    ) -> Result<Certificate, ValidationError> {
        (**self).fetch(request, state).await
    }
}

/// Never retrieves anything: only anchors and cached certificates are used
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineFetcher;

#[async_trait]
impl CertificateFetcher for OfflineFetcher {
    async fn fetch(
        &self,
        request: &CertificateRequest,
        _state: &ValidationState,
    ) -> Result<Certificate, ValidationError> {
        Err(ValidationError::cannot_retrieve_cert(format!(
            "Cannot retrieve certificate `{}` in offline mode",
            request.name()
        )))
    }
}

/// Result of expressing one Interest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retrieval {
    Data(Data),
    /// Negative acknowledgement with its reason
    Nack(String),
    Timeout,
}

/// Sends an Interest and waits for the answer
#[async_trait]
pub trait CertificateRetriever: Send + Sync {
    async fn express_interest(&self, interest: &Interest) -> Retrieval;
}

#[async_trait]
impl<T: CertificateRetriever + ?Sized> CertificateRetriever for alloc::sync::Arc<T> {
    async fn express_interest(&self, interest: &Interest) -> Retrieval {
        (**self).express_interest(interest).await
    }
}

/// Tuning of [`NetworkFetcher`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkFetcherOptions {
    /// Attempts after the first one when the answer is a Nack or a timeout
    pub max_retries: usize,
    /// Lifetime of each certificate Interest
    pub interest_lifetime: Duration,
}

impl Default for NetworkFetcherOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            interest_lifetime: Duration::from_secs(4),
        }
    }
}

impl NetworkFetcherOptions {
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_interest_lifetime(mut self, lifetime: Duration) -> Self {
        self.interest_lifetime = lifetime;
        self
    }
}

/// Fetches certificates by expressing Interests through a retriever
#[derive(Debug)]
pub struct NetworkFetcher<R> {
    retriever: R,
    options: NetworkFetcherOptions,
}

impl<R: CertificateRetriever> NetworkFetcher<R> {
    pub fn new(retriever: R) -> Self {
        Self::with_options(retriever, NetworkFetcherOptions::default())
    }

    pub fn with_options(retriever: R, options: NetworkFetcherOptions) -> Self {
        Self { retriever, options }
    }

    pub fn retriever(&self) -> &R {
        &self.retriever
    }

    pub fn options(&self) -> &NetworkFetcherOptions {
        &self.options
    }
}

#[async_trait]
impl<R: CertificateRetriever> CertificateFetcher for NetworkFetcher<R> {
    async fn fetch(
        &self,
        request: &CertificateRequest,
        state: &ValidationState,
    ) -> Result<Certificate, ValidationError> {
        let interest = request
            .interest()
            .clone()
            .with_must_be_fresh(true)
            .with_lifetime(self.options.interest_lifetime);

        for attempt in 0..=self.options.max_retries {
            log::trace!(
                "fetching {} for {} (attempt {})",
                request.name(),
                state.original().name(),
                attempt + 1
            );
            match self.retriever.express_interest(&interest).await {
                Retrieval::Data(data) => {
                    let name = data.name.clone();
                    return Certificate::from_data(data).map_err(|e| {
                        ValidationError::new(
                            ValidationErrorCode::MalformedCert,
                            format!("Fetched a malformed certificate `{}` ({})", name, e.info()),
                        )
                    });
                }
                Retrieval::Nack(reason) => {
                    log::debug!("Nack ({}) while fetching {}", reason, request.name());
                }
                Retrieval::Timeout => {
                    log::debug!("timeout while fetching {}", request.name());
                }
            }
        }

        Err(ValidationError::cannot_retrieve_cert(format!(
            "Cannot fetch certificate after all retries `{}`",
            request.name()
        )))
    }
}
