// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Digest and signature verification stages.

extern crate alloc;

use alloc::vec::Vec;
use ring::digest;

use crate::crypto_backend::{CryptoBackend, SignatureAlgorithm};
use crate::error::{Defect, Error, Result};
use crate::transform::Transform;

/// Streaming SHA-256; writes the 32-byte digest downstream on `end`
pub struct DigestFilter<T: Transform> {
    ctx: Option<digest::Context>,
    next: T,
}

impl<T: Transform> DigestFilter<T> {
    pub fn new(next: T) -> Self {
        Self {
            ctx: Some(digest::Context::new(&digest::SHA256)),
            next,
        }
    }

    pub fn into_inner(self) -> T {
        self.next
    }
}

impl<T: Transform> Transform for DigestFilter<T> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let ctx = self.ctx.as_mut().ok_or(Defect::WriteAfterEnd)?;
        ctx.update(buf);
        Ok(buf.len())
    }

    fn end(&mut self) -> Result<()> {
        let ctx = self.ctx.take().ok_or(Defect::EndAfterEnd)?;
        let digest = ctx.finish();
        self.next.write(digest.as_ref())?;
        self.next.end()
    }
}

/// Terminal stage checking a signature over everything written to it.
///
/// The backend verifies one contiguous message, so the signed portion is
/// accumulated and handed over on `end`. The outcome is read back with
/// [`is_verified`](VerifierFilter::is_verified).
pub struct VerifierFilter<'a, B: CryptoBackend + ?Sized> {
    backend: &'a B,
    algorithm: SignatureAlgorithm,
    public_key: &'a [u8],
    signature: &'a [u8],
    signed: Vec<u8>,
    verified: Option<bool>,
}

impl<'a, B: CryptoBackend + ?Sized> VerifierFilter<'a, B> {
    pub fn new(
        backend: &'a B,
        algorithm: SignatureAlgorithm,
        public_key: &'a [u8],
        signature: &'a [u8],
    ) -> Self {
        Self {
            backend,
            algorithm,
            public_key,
            signature,
            signed: Vec::new(),
            verified: None,
        }
    }

    /// `true` only after `end` and a successful check
    pub fn is_verified(&self) -> bool {
        self.verified == Some(true)
    }
}

impl<'a, B: CryptoBackend + ?Sized> Transform for VerifierFilter<'a, B> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if self.verified.is_some() {
            return Err(Defect::WriteAfterEnd.into());
        }
        self.signed.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn end(&mut self) -> Result<()> {
        if self.verified.is_some() {
            return Err(Defect::EndAfterEnd.into());
        }
        let outcome = self.backend.verify_signature(
            self.algorithm,
            &self.signed,
            self.signature,
            self.public_key,
        );
        match outcome {
            Ok(()) => self.verified = Some(true),
            Err(Error::Crypto(_)) => self.verified = Some(false),
            Err(e) => return Err(e),
        }
        Ok(())
    }
}
