// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Certificate retrievers standing in for the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use ndn_trust::validation::{CertificateRetriever, Retrieval};
use ndn_trust::{Certificate, Interest, Name};
use spin::Mutex;

/// Serves certificates from memory and records every Interest it sees
#[derive(Debug, Default)]
pub struct InMemoryRetriever {
    certificates: Mutex<Vec<Certificate>>,
    requests: Mutex<Vec<Name>>,
}

impl InMemoryRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_certificates<I: IntoIterator<Item = Certificate>>(certs: I) -> Self {
        let retriever = Self::new();
        for cert in certs {
            retriever.publish(cert);
        }
        retriever
    }

    /// Make `cert` retrievable, replacing one with the same name
    pub fn publish(&self, cert: Certificate) {
        let mut certificates = self.certificates.lock();
        certificates.retain(|c| c.name() != cert.name());
        certificates.push(cert);
    }

    /// Names of all Interests expressed so far
    pub fn requests(&self) -> Vec<Name> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl CertificateRetriever for InMemoryRetriever {
    async fn express_interest(&self, interest: &Interest) -> Retrieval {
        log::trace!("retriever got Interest {}", interest.name);
        self.requests.lock().push(interest.name.clone());
        let found = self
            .certificates
            .lock()
            .iter()
            .find(|cert| interest.name.is_prefix_of(cert.name()))
            .cloned();
        match found {
            Some(cert) => Retrieval::Data(cert.into_data()),
            None => Retrieval::Nack("NoRoute".into()),
        }
    }
}

/// Answers every Interest with the same certificate, whatever was asked
#[derive(Debug)]
pub struct FixedRetriever {
    certificate: Certificate,
    requests: Mutex<Vec<Name>>,
}

impl FixedRetriever {
    pub fn new(certificate: Certificate) -> Self {
        Self {
            certificate,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Name> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl CertificateRetriever for FixedRetriever {
    async fn express_interest(&self, interest: &Interest) -> Retrieval {
        self.requests.lock().push(interest.name.clone());
        Retrieval::Data(self.certificate.clone().into_data())
    }
}

/// Counts drops of in-flight retrievals
#[derive(Debug, Default)]
pub struct DropCounter {
    started: AtomicUsize,
    dropped: AtomicUsize,
}

impl DropCounter {
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::SeqCst)
    }
}

struct InFlight(Arc<DropCounter>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.dropped.fetch_add(1, Ordering::SeqCst);
    }
}

/// Never answers; records when its retrievals start and are abandoned
#[derive(Debug, Default)]
pub struct PendingRetriever {
    counter: Arc<DropCounter>,
}

impl PendingRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self) -> Arc<DropCounter> {
        self.counter.clone()
    }
}

#[async_trait]
impl CertificateRetriever for PendingRetriever {
    async fn express_interest(&self, interest: &Interest) -> Retrieval {
        log::trace!("holding Interest {} forever", interest.name);
        self.counter.started.fetch_add(1, Ordering::SeqCst);
        let _in_flight = InFlight(self.counter.clone());
        futures::future::pending::<Retrieval>().await
    }
}
