// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Signature checks for packets and certificates.
//!
//! The signed portion of a packet is re-serialized straight into a
//! [`StepSource`] feeding either a [`VerifierFilter`] (public-key
//! signatures) or a [`DigestFilter`] (DigestSha256). A check that cannot be
//! carried out, because of an unsupported key or a malformed signature, is
//! reported as a failed check.

extern crate alloc;

use alloc::vec::Vec;

use crate::certificate::Certificate;
use crate::crypto_backend::{CryptoBackend, PublicKey, SignatureAlgorithm};
use crate::error::Result;
use crate::packet::{Data, Interest, SignatureInfo, SignatureType, SignedInterestFormat};
use crate::transform::{BufferSink, DigestFilter, StepSource, Transform, VerifierFilter};

fn verify_with_key<B, W>(
    info: &SignatureInfo,
    signature: &[u8],
    key: &PublicKey,
    backend: &B,
    write_signed_portion: W,
) -> bool
where
    B: CryptoBackend + ?Sized,
    W: FnOnce(&mut dyn Transform) -> Result<()>,
{
    let algorithm = match SignatureAlgorithm::from_signature_type(info.signature_type, key) {
        Ok(algorithm) => algorithm,
        Err(e) => {
            log::error!("cannot verify signature: {}", e);
            return false;
        }
    };

    let mut source = StepSource::new(VerifierFilter::new(
        backend,
        algorithm,
        &key.key_bytes,
        signature,
    ));
    let streamed = write_signed_portion(&mut source).and_then(|_| source.end());
    if let Err(e) = streamed {
        log::error!("cannot stream signed portion: {}", e);
        return false;
    }
    log::trace!("streamed {} signed bytes", source.bytes_written());
    source.next_stage().is_verified()
}

fn verify_digest<W>(info: &SignatureInfo, signature: &[u8], write_signed_portion: W) -> bool
where
    W: FnOnce(&mut dyn Transform) -> Result<()>,
{
    if info.signature_type != SignatureType::DigestSha256 {
        log::error!("expected DigestSha256, found {}", info.signature_type);
        return false;
    }

    let mut source = StepSource::new(DigestFilter::new(BufferSink::new()));
    let streamed = write_signed_portion(&mut source).and_then(|_| source.end());
    if let Err(e) = streamed {
        log::error!("cannot stream signed portion: {}", e);
        return false;
    }
    source.into_inner().into_inner().as_bytes() == signature
}

fn signer_key(signer: &Certificate) -> Option<PublicKey> {
    match signer.public_key() {
        Ok(key) => Some(key),
        Err(e) => {
            log::error!("unusable public key in `{}`: {}", signer.name(), e);
            None
        }
    }
}

/// Check a Data signature with the key in `signer`
pub fn verify_data_signature<B: CryptoBackend + ?Sized>(
    data: &Data,
    signer: &Certificate,
    backend: &B,
) -> bool {
    let (Some(info), Some(signature)) = (&data.signature_info, &data.signature_value) else {
        return false;
    };
    let Some(key) = signer_key(signer) else {
        return false;
    };
    verify_with_key(info, signature, &key, backend, |sink| {
        data.write_signed_portion(sink)
    })
}

/// Check a certificate signature with the key in `signer`
pub fn verify_certificate_signature<B: CryptoBackend + ?Sized>(
    cert: &Certificate,
    signer: &Certificate,
    backend: &B,
) -> bool {
    verify_data_signature(cert.data(), signer, backend)
}

/// Signature metadata and bits of an Interest in the given format
fn interest_signature(
    interest: &Interest,
    format: SignedInterestFormat,
) -> Option<(SignatureInfo, Vec<u8>)> {
    match format {
        SignedInterestFormat::V03 => Some((
            interest.signature_info.clone()?,
            interest.signature_value.clone()?,
        )),
        SignedInterestFormat::V02 => Some((
            interest.signature_info_v02().ok()?,
            interest.signature_value_v02().ok()?,
        )),
    }
}

fn write_interest_portion(
    interest: &Interest,
    format: SignedInterestFormat,
    sink: &mut dyn Transform,
) -> Result<()> {
    match format {
        SignedInterestFormat::V03 => interest.write_signed_portion_v03(sink),
        SignedInterestFormat::V02 => interest.write_signed_portion_v02(sink),
    }
}

/// Check an Interest signature with the key in `signer`
pub fn verify_interest_signature<B: CryptoBackend + ?Sized>(
    interest: &Interest,
    format: SignedInterestFormat,
    signer: &Certificate,
    backend: &B,
) -> bool {
    let Some((info, signature)) = interest_signature(interest, format) else {
        return false;
    };
    let Some(key) = signer_key(signer) else {
        return false;
    };
    verify_with_key(&info, &signature, &key, backend, |sink| {
        write_interest_portion(interest, format, sink)
    })
}

/// Check a DigestSha256 Data signature
pub fn verify_digest_data(data: &Data) -> bool {
    let (Some(info), Some(signature)) = (&data.signature_info, &data.signature_value) else {
        return false;
    };
    verify_digest(info, signature, |sink| data.write_signed_portion(sink))
}

/// Check a DigestSha256 Interest signature
pub fn verify_digest_interest(interest: &Interest, format: SignedInterestFormat) -> bool {
    let Some((info, signature)) = interest_signature(interest, format) else {
        return false;
    };
    verify_digest(&info, &signature, |sink| {
        write_interest_portion(interest, format, sink)
    })
}
