// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! In-memory trust anchors and certificate caches.
//!
//! Both stores are keyed by certificate name and looked up by key-locator
//! name, which is usually a prefix of the certificate name (`/a/KEY/k1`
//! finds `/a/KEY/k1/self/v=1`). Concurrent inserts of the same name are
//! last-writer-wins.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::time::Duration;
use spin::{Mutex, RwLock};

use crate::certificate::Certificate;
use crate::name::Name;

/// First entry whose name equals `name` or starts with it
fn find_by_prefix<'a, V>(map: &'a BTreeMap<Name, V>, name: &Name) -> Option<(&'a Name, &'a V)> {
    // canonical order puts a name right before every name it is a prefix of
    map.range::<Name, _>(name..)
        .next()
        .filter(|(candidate, _)| name.is_prefix_of(candidate))
}

/// The configured trust anchors
#[derive(Debug, Default)]
pub struct TrustAnchorContainer {
    anchors: RwLock<BTreeMap<Name, Certificate>>,
}

impl TrustAnchorContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an anchor
    pub fn insert(&self, cert: Certificate) {
        log::trace!("trust anchor {} loaded", cert.name());
        self.anchors.write().insert(cert.name().clone(), cert);
    }

    pub fn remove(&self, name: &Name) -> Option<Certificate> {
        self.anchors.write().remove(name)
    }

    /// Anchor named `name`, or the first one under it
    pub fn find(&self, name: &Name) -> Option<Certificate> {
        let anchors = self.anchors.read();
        find_by_prefix(&anchors, name).map(|(_, cert)| cert.clone())
    }

    pub fn names(&self) -> Vec<Name> {
        self.anchors.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.anchors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.read().is_empty()
    }

    pub fn clear(&self) {
        self.anchors.write().clear();
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    cert: Certificate,
    /// Unix time after which the entry is dropped; `None` never expires
    expires_at: Option<Duration>,
}

impl CacheEntry {
    fn is_live(&self, now: Option<Duration>) -> bool {
        match (self.expires_at, now) {
            (Some(expires_at), Some(now)) => now < expires_at,
            _ => true,
        }
    }
}

/// Certificates kept for a limited time.
///
/// An entry lives for the cache lifetime, but never past the NotAfter of
/// its certificate. Without a clock (`now` is `None`) entries do not expire.
#[derive(Debug)]
pub struct CertificateCache {
    lifetime: Duration,
    entries: Mutex<BTreeMap<Name, CacheEntry>>,
}

impl CertificateCache {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Add or refresh a certificate
    pub fn insert(&self, cert: Certificate, now: Option<Duration>) {
        let expires_at = now.map(|now| {
            let until = now.saturating_add(self.lifetime);
            until.min(cert.validity_period().not_after.unix_duration())
        });
        log::trace!("caching {} (expires {:?})", cert.name(), expires_at);
        self.entries
            .lock()
            .insert(cert.name().clone(), CacheEntry { cert, expires_at });
    }

    /// Live certificate named `name`, or the first live one under it
    pub fn find(&self, name: &Name, now: Option<Duration>) -> Option<Certificate> {
        let mut entries = self.entries.lock();
        entries.retain(|_, entry| entry.is_live(now));
        find_by_prefix(&entries, name).map(|(_, entry)| entry.cert.clone())
    }

    pub fn remove(&self, name: &Name) -> Option<Certificate> {
        self.entries.lock().remove(name).map(|entry| entry.cert)
    }

    /// Number of entries, expired ones included until the next lookup
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
