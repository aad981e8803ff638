// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

use std::sync::Arc;

use futures::executor::block_on;
use ndn_trust::packet::{SignatureInfo, SignedInterestFormat};
use ndn_trust::validation::{
    CommandInterestPolicy, NetworkFetcher, SimpleHierarchyPolicy, ValidationPolicy, ValidationState,
};
use ndn_trust::{Component, Error, Interest, Name, ValidationErrorCode, Validator};
use ndn_trust_test::common::chain::{
    command_interest_v02, current_validity, issue_certificate, now_millis, self_signed, signed_interest_v03,
};
use ndn_trust_test::common::keys::TestKey;
use ndn_trust_test::common::retriever::InMemoryRetriever;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn code_of(result: ndn_trust::Result<()>) -> ValidationErrorCode {
    match result {
        Err(Error::Validation(e)) => e.code(),
        other => panic!("expected a validation failure, got {:?}", other),
    }
}

#[test]
fn test_short_v02_name_is_malformed() {
    init_logger();
    let retriever = Arc::new(InMemoryRetriever::new());
    let validator = Validator::new(
        Box::new(SimpleHierarchyPolicy::new()),
        NetworkFetcher::new(retriever.clone()),
    );

    let mut state = ValidationState::for_interest(Interest::new(Name::from_uri("/x").unwrap()));
    let result = block_on(validator.validate(&mut state));
    match result {
        Err(Error::Validation(e)) => {
            assert_eq!(e.code(), ValidationErrorCode::MalformedSignature);
            assert_eq!(e.info(), "Interest name too short `/x`");
        }
        other => panic!("expected MALFORMED_SIGNATURE, got {:?}", other),
    }
    assert_eq!(state.tag::<SignedInterestFormat>(), Some(&SignedInterestFormat::V02));
    assert_eq!(retriever.request_count(), 0);
}

#[test]
fn test_garbage_v02_signature_info_is_malformed() {
    init_logger();
    let validator = Validator::new(
        Box::new(SimpleHierarchyPolicy::new()),
        NetworkFetcher::new(InMemoryRetriever::new()),
    );
    let interest = Interest::new(Name::from_uri("/app/cmd/not-a-tlv/sig").unwrap());
    let result = block_on(validator.validate_interest(interest));
    assert_eq!(code_of(result), ValidationErrorCode::MalformedSignature);
}

#[test]
fn test_v03_without_signature_value() {
    init_logger();
    let key = TestKey::generate("/app");
    let validator = Validator::new(
        Box::new(SimpleHierarchyPolicy::new()),
        NetworkFetcher::new(InMemoryRetriever::new()),
    );
    let interest = Interest::new(Name::from_uri("/app/cmd").unwrap())
        .with_signature_info(SignatureInfo::new(key.signature_type()).with_key_locator(key.key_name().clone()));
    let result = block_on(validator.validate_interest(interest));
    assert_eq!(code_of(result), ValidationErrorCode::NoSignature);
}

/// Command validator for `/org/dev` commands signed by a device key
/// certified by the `/org` anchor
fn command_setup() -> (Validator<NetworkFetcher<Arc<InMemoryRetriever>>, ndn_trust::crypto_backend::RingBackend>, TestKey) {
    let root = TestKey::generate("/org");
    let dev = TestKey::generate("/org/dev");
    let retriever = Arc::new(InMemoryRetriever::with_certificates([issue_certificate(
        &dev,
        &root,
        current_validity(),
    )]));

    let mut policy = CommandInterestPolicy::default();
    policy
        .set_inner_policy(Some(Box::new(SimpleHierarchyPolicy::new())))
        .expect("inner policy");
    let validator = Validator::new(Box::new(policy), NetworkFetcher::new(retriever));
    validator.load_anchor(self_signed(&root));
    (validator, dev)
}

#[test]
fn test_v02_command_interest() {
    init_logger();
    let (validator, dev) = command_setup();
    let now = now_millis();

    let command = command_interest_v02("/org/dev/reboot", &dev, now);
    let result = block_on(validator.validate_interest(command.clone()));
    assert!(result.is_ok(), "validation failed: {:?}", result.err());

    // the same command again is a replay
    assert_eq!(
        code_of(block_on(validator.validate_interest(command))),
        ValidationErrorCode::PolicyRejected
    );

    let later = command_interest_v02("/org/dev/reboot", &dev, now + 1);
    assert!(block_on(validator.validate_interest(later)).is_ok());
}

#[test]
fn test_v03_command_interest() {
    init_logger();
    let (validator, dev) = command_setup();
    let now = now_millis();

    assert!(block_on(validator.validate_interest(signed_interest_v03("/org/dev/start", &dev, now))).is_ok());
    assert_eq!(
        code_of(block_on(validator.validate_interest(signed_interest_v03("/org/dev/start", &dev, now - 10)))),
        ValidationErrorCode::PolicyRejected
    );

    let stale = now - 10 * 60 * 1000;
    assert_eq!(
        code_of(block_on(validator.validate_interest(signed_interest_v03("/org/dev/stop", &dev, stale)))),
        ValidationErrorCode::PolicyRejected
    );
}

#[test]
fn test_failed_command_does_not_advance_timestamp() {
    init_logger();
    let (validator, dev) = command_setup();
    let now = now_millis();

    // correct timestamp, broken signature
    let genuine = command_interest_v02("/org/dev/reboot", &dev, now);
    let mut signature = genuine.name.get(-1).expect("signature component").value().to_vec();
    if let Some(last) = signature.last_mut() {
        *last ^= 0x01;
    }
    let forged = Interest::new(genuine.name.prefix(-1).append(Component::generic(signature)));
    let result = block_on(validator.validate_interest(forged));
    assert_eq!(code_of(result), ValidationErrorCode::SignatureMismatch);

    assert!(block_on(validator.validate_interest(genuine)).is_ok());
}
