// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

use std::sync::Arc;

use futures::channel::oneshot;
use futures::executor::block_on;
use ndn_trust::packet::{SignatureInfo, SignatureType};
use ndn_trust::validation::{NetworkFetcher, SignedByPolicy, SimpleHierarchyPolicy, ValidationPolicy, ValidationState};
use ndn_trust::{Data, Error, Name, ValidationErrorCode, Validator};
use ndn_trust_test::common::chain::{current_validity, issue_certificate, self_signed, signed_data};
use ndn_trust_test::common::keys::TestKey;
use ndn_trust_test::common::retriever::{InMemoryRetriever, PendingRetriever};
use ring::digest;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn digest_signed(name: &str) -> Data {
    let data = Data::new(Name::from_uri(name).unwrap())
        .with_content(&b"reading"[..])
        .with_signature_info(SignatureInfo::new(SignatureType::DigestSha256));
    let signed = data.signed_portion().unwrap();
    let value = digest::digest(&digest::SHA256, &signed).as_ref().to_vec();
    data.with_signature_value(value)
}

#[test]
fn test_digest_signature_needs_no_fetch() {
    init_logger();
    let retriever = Arc::new(InMemoryRetriever::new());
    let validator = Validator::new(Box::new(SignedByPolicy::digest()), NetworkFetcher::new(retriever.clone()));

    let mut state = ValidationState::for_data(digest_signed("/local/sensor/1"));
    let result = block_on(validator.validate(&mut state));
    assert!(result.is_ok(), "validation failed: {:?}", result.err());
    assert_eq!(state.depth(), 0);
    assert_eq!(retriever.request_count(), 0);
}

#[test]
fn test_digest_mismatch() {
    init_logger();
    let retriever = Arc::new(InMemoryRetriever::new());
    let validator = Validator::new(Box::new(SignedByPolicy::digest()), NetworkFetcher::new(retriever.clone()));

    let mut data = digest_signed("/local/sensor/1");
    data.name = Name::from_uri("/local/sensor/2").unwrap();
    match block_on(validator.validate_data(data)) {
        Err(Error::Validation(e)) => assert_eq!(e.code(), ValidationErrorCode::SignatureMismatch),
        other => panic!("expected SIGNATURE_MISMATCH, got {:?}", other),
    }
    assert_eq!(retriever.request_count(), 0);
}

#[test]
fn test_digest_and_key_signatures_in_one_chain() {
    init_logger();
    let root = TestKey::generate("/org");
    let dev = TestKey::generate("/org/dev");
    let retriever = Arc::new(InMemoryRetriever::with_certificates([issue_certificate(
        &dev,
        &root,
        current_validity(),
    )]));

    let mut policy = SignedByPolicy::digest();
    policy
        .set_inner_policy(Some(Box::new(SimpleHierarchyPolicy::new())))
        .expect("inner policy");
    let validator = Validator::new(Box::new(policy), NetworkFetcher::new(retriever.clone()));
    validator.load_anchor(self_signed(&root));

    assert!(block_on(validator.validate_data(digest_signed("/org/dev/local"))).is_ok());
    assert_eq!(retriever.request_count(), 0);

    let result = block_on(validator.validate_data(signed_data("/org/dev/reading", &dev)));
    assert!(result.is_ok(), "validation failed: {:?}", result.err());
    assert_eq!(retriever.request_count(), 1);
}

#[test]
fn test_result_delivered_once() {
    init_logger();
    let root = TestKey::generate("/org");
    let validator = Validator::new(
        Box::new(SimpleHierarchyPolicy::new()),
        NetworkFetcher::new(InMemoryRetriever::new()),
    );
    validator.load_anchor(self_signed(&root));

    let (sender, receiver) = oneshot::channel();
    block_on(validator.validate_data_into(signed_data("/org/news", &root), sender));
    assert_eq!(block_on(receiver), Ok(Ok(())));
}

#[test]
fn test_dropped_receiver_cancels_fetch() {
    init_logger();
    let retriever = PendingRetriever::new();
    let counter = retriever.counter();
    let validator = Validator::new(Box::new(SimpleHierarchyPolicy::new()), NetworkFetcher::new(retriever));
    let dev = TestKey::generate("/org/dev");

    let (sender, receiver) = oneshot::channel();
    drop(receiver);
    block_on(validator.validate_data_into(signed_data("/org/dev/reading", &dev), sender));

    assert_eq!(counter.started(), 1);
    assert_eq!(counter.dropped(), 1);
    assert!(validator.unverified_cache().is_empty());
}
