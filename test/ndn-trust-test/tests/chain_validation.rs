// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

use std::sync::Arc;

use futures::executor::block_on;
use ndn_trust::validation::{
    NetworkFetcher, NetworkFetcherOptions, Outcome, PrefixPolicy, SimpleHierarchyPolicy, ValidationState,
};
use ndn_trust::packet::SignatureInfo;
use ndn_trust::{Certificate, Data, Error, Name, ValidationErrorCode, Validator, ValidatorOptions};
use ndn_trust_test::common::chain::{
    current_validity, expired_validity, issue_certificate, self_signed, sign_data, signed_data,
    signed_interest_v03, now_millis,
};
use ndn_trust_test::common::keys::TestKey;
use ndn_trust_test::common::retriever::{FixedRetriever, InMemoryRetriever};

type TestValidator = Validator<NetworkFetcher<Arc<InMemoryRetriever>>, ndn_trust::crypto_backend::RingBackend>;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Anchor `/org`, intermediate `/org/site`, leaf `/org/site/dev`
struct Hierarchy {
    root: TestKey,
    mid: TestKey,
    leaf: TestKey,
    mid_cert: Certificate,
    leaf_cert: Certificate,
}

impl Hierarchy {
    fn new() -> Self {
        let root = TestKey::generate("/org");
        let mid = TestKey::generate("/org/site");
        let leaf = TestKey::generate("/org/site/dev");
        let mid_cert = issue_certificate(&mid, &root, current_validity());
        let leaf_cert = issue_certificate(&leaf, &mid, current_validity());
        Self {
            root,
            mid,
            leaf,
            mid_cert,
            leaf_cert,
        }
    }
}

fn validator_with(retriever: &Arc<InMemoryRetriever>, anchor: Certificate) -> TestValidator {
    let fetcher = NetworkFetcher::with_options(retriever.clone(), NetworkFetcherOptions::default().with_max_retries(0));
    let validator = Validator::new(Box::new(SimpleHierarchyPolicy::new()), fetcher);
    validator.load_anchor(anchor);
    validator
}

fn error_info(result: ndn_trust::Result<()>) -> (ValidationErrorCode, String) {
    match result {
        Err(Error::Validation(e)) => (e.code(), e.info().to_string()),
        other => panic!("expected a validation failure, got {:?}", other),
    }
}

#[test]
fn test_two_link_chain_validates() {
    init_logger();
    let h = Hierarchy::new();
    let retriever = Arc::new(InMemoryRetriever::with_certificates([
        h.mid_cert.clone(),
        h.leaf_cert.clone(),
    ]));
    let validator = validator_with(&retriever, self_signed(&h.root));

    let mut state = ValidationState::for_data(signed_data("/org/site/dev/temp/1", &h.leaf));
    let result = block_on(validator.validate(&mut state));
    assert!(result.is_ok(), "validation failed: {:?}", result.err());
    assert_eq!(state.outcome(), Some(&Outcome::Success));
    assert_eq!(state.depth(), 2);
    assert_eq!(
        state.seen_certificate_names(),
        &[h.leaf_cert.name().clone(), h.mid_cert.name().clone()]
    );
    assert_eq!(
        retriever.requests(),
        vec![h.leaf.key_name().clone(), h.mid.key_name().clone()]
    );
    assert_eq!(validator.verified_cache().len(), 2);
}

#[test]
fn test_verified_certificates_are_reused() {
    init_logger();
    let h = Hierarchy::new();
    let retriever = Arc::new(InMemoryRetriever::with_certificates([
        h.mid_cert.clone(),
        h.leaf_cert.clone(),
    ]));
    let validator = validator_with(&retriever, self_signed(&h.root));

    assert!(block_on(validator.validate_data(signed_data("/org/site/dev/a", &h.leaf))).is_ok());
    assert_eq!(retriever.request_count(), 2);

    let mut state = ValidationState::for_data(signed_data("/org/site/dev/b", &h.leaf));
    assert!(block_on(validator.validate(&mut state)).is_ok());
    assert_eq!(retriever.request_count(), 2);
    assert_eq!(state.depth(), 0);
}

#[test]
fn test_flipped_middle_signature_is_mismatch() {
    init_logger();
    let h = Hierarchy::new();
    let mut tampered = h.mid_cert.clone().into_data();
    if let Some(signature) = tampered.signature_value.as_mut() {
        signature[0] ^= 0x01;
    }
    let tampered = Certificate::from_data(tampered).expect("still a certificate");

    let retriever = Arc::new(InMemoryRetriever::with_certificates([tampered, h.leaf_cert.clone()]));
    let validator = validator_with(&retriever, self_signed(&h.root));

    let (code, info) = error_info(block_on(validator.validate_data(signed_data("/org/site/dev/temp", &h.leaf))));
    assert_eq!(code, ValidationErrorCode::SignatureMismatch);
    assert_eq!(info, format!("Invalid signature of certificate `{}`", h.mid_cert.name()));
    assert!(validator.verified_cache().is_empty());
}

#[test]
fn test_forged_data_signature_is_mismatch() {
    init_logger();
    let h = Hierarchy::new();
    let retriever = Arc::new(InMemoryRetriever::with_certificates([
        h.mid_cert.clone(),
        h.leaf_cert.clone(),
    ]));
    let validator = validator_with(&retriever, self_signed(&h.root));

    let mut data: Data = signed_data("/org/site/dev/temp", &h.leaf);
    data.content = b"forged".to_vec();
    let (code, info) = error_info(block_on(validator.validate_data(data)));
    assert_eq!(code, ValidationErrorCode::SignatureMismatch);
    assert_eq!(info, "Invalid signature of data `/org/site/dev/temp`");
}

#[test]
fn test_expired_intermediate() {
    init_logger();
    let h = Hierarchy::new();
    let expired_mid = issue_certificate(&h.mid, &h.root, expired_validity());
    let retriever = Arc::new(InMemoryRetriever::with_certificates([expired_mid.clone(), h.leaf_cert.clone()]));
    let validator = validator_with(&retriever, self_signed(&h.root));

    let (code, info) = error_info(block_on(validator.validate_data(signed_data("/org/site/dev/temp", &h.leaf))));
    assert_eq!(code, ValidationErrorCode::ExpiredOrNotYetValidCert);
    assert_eq!(
        info,
        format!("Retrieved certificate is not yet valid or expired `{}`", expired_mid.name())
    );

    // with the check disabled the signatures alone decide
    let validator = validator_with(&retriever, self_signed(&h.root))
        .with_options(ValidatorOptions::default().skip_validity_period_check());
    assert!(block_on(validator.validate_data(signed_data("/org/site/dev/temp", &h.leaf))).is_ok());
}

#[test]
fn test_hierarchy_violation_in_chain() {
    init_logger();
    let h = Hierarchy::new();
    // a key of another site tries to certify a device of this one
    let rogue = TestKey::generate("/org/other");
    let rogue_leaf = issue_certificate(&h.leaf, &rogue, current_validity());
    let retriever = Arc::new(InMemoryRetriever::with_certificates([rogue_leaf]));
    let validator = validator_with(&retriever, self_signed(&h.root));

    let (code, _) = error_info(block_on(validator.validate_data(signed_data("/org/site/dev/temp", &h.leaf))));
    assert_eq!(code, ValidationErrorCode::PolicyRejected);
    assert_eq!(retriever.request_count(), 1);
}

/// Keys `/org/l1`, `/org/l1/l2`, ... each certified by the one above, the
/// first by the anchor `/org`
fn deep_chain(levels: usize) -> (TestKey, Vec<Certificate>, TestKey) {
    let root = TestKey::generate("/org");
    let mut certs = Vec::new();
    let mut identity = String::from("/org");
    let mut issuer: Option<TestKey> = None;
    for level in 1..=levels {
        identity.push_str(&format!("/l{}", level));
        let key = TestKey::generate(&identity);
        certs.push(issue_certificate(&key, issuer.as_ref().unwrap_or(&root), current_validity()));
        issuer = Some(key);
    }
    (root, certs, issuer.expect("at least one level"))
}

fn validate_deep_chain(levels: usize, max_depth: usize) -> (ndn_trust::Result<()>, ValidationState, usize) {
    let (root, certs, leaf) = deep_chain(levels);
    let retriever = Arc::new(InMemoryRetriever::with_certificates(certs));
    let validator = validator_with(&retriever, self_signed(&root))
        .with_options(ValidatorOptions::default().with_max_depth(max_depth));
    let data_name = format!("{}/data", leaf.identity());
    let mut state = ValidationState::for_data(signed_data(&data_name, &leaf));
    let result = block_on(validator.validate(&mut state));
    (result, state, retriever.request_count())
}

#[test]
fn test_depth_limit() {
    init_logger();
    let (result, state, fetched) = validate_deep_chain(4, 5);
    assert!(result.is_ok(), "4 retrieved certificates must pass: {:?}", result.err());
    assert_eq!(state.depth(), 4);
    assert_eq!(fetched, 4);

    let (result, state, fetched) = validate_deep_chain(5, 5);
    let (code, _) = error_info(result);
    assert_eq!(code, ValidationErrorCode::ExceededDepthLimit);
    assert_eq!(state.depth(), 5);
    assert_eq!(fetched, 5);
}

#[test]
fn test_loop_detected_before_refetch() {
    init_logger();
    let a = TestKey::generate("/x");
    let b = TestKey::generate("/y");
    let cert_a = issue_certificate(&a, &b, current_validity());
    let cert_b = issue_certificate(&b, &a, current_validity());
    let retriever = Arc::new(InMemoryRetriever::with_certificates([cert_a, cert_b]));

    let fetcher = NetworkFetcher::new(retriever.clone());
    let validator = Validator::new(Box::new(PrefixPolicy::new(Name::new(), Name::new())), fetcher);
    validator.load_anchor(self_signed(&TestKey::generate("/anchor")));

    let (code, info) = error_info(block_on(validator.validate_data(signed_data("/x/data", &a))));
    assert_eq!(code, ValidationErrorCode::LoopDetected);
    assert!(info.contains(&a.key_name().to_uri()), "{}", info);
    assert_eq!(retriever.requests(), vec![a.key_name().clone(), b.key_name().clone()]);
}

#[test]
fn test_self_signed_non_anchor_is_loop() {
    init_logger();
    let stranger = TestKey::generate("/org/site/dev");
    let retriever = Arc::new(InMemoryRetriever::with_certificates([self_signed(&stranger)]));
    let validator = validator_with(&retriever, self_signed(&TestKey::generate("/org")));

    let (code, _) = error_info(block_on(
        validator.validate_data(signed_data("/org/site/dev/temp", &stranger)),
    ));
    assert_eq!(code, ValidationErrorCode::LoopDetected);
    assert_eq!(retriever.request_count(), 1);
}

#[test]
fn test_signed_interest_v03_chain() {
    init_logger();
    let h = Hierarchy::new();
    let retriever = Arc::new(InMemoryRetriever::with_certificates([
        h.mid_cert.clone(),
        h.leaf_cert.clone(),
    ]));
    let validator = validator_with(&retriever, self_signed(&h.root));

    let interest = signed_interest_v03("/org/site/dev/cmd/start", &h.leaf, now_millis());
    let result = block_on(validator.validate_interest(interest));
    assert!(result.is_ok(), "validation failed: {:?}", result.err());
}

#[test]
fn test_anchor_signs_data_directly() {
    init_logger();
    let root = TestKey::generate("/org");
    let retriever = Arc::new(InMemoryRetriever::new());
    let validator = validator_with(&retriever, self_signed(&root));

    let mut state = ValidationState::for_data(signed_data("/org/notice", &root));
    assert!(block_on(validator.validate(&mut state)).is_ok());
    assert_eq!(state.depth(), 0);
    assert_eq!(retriever.request_count(), 0);
}

#[test]
fn test_certificate_of_another_key_is_rejected() {
    init_logger();
    let root = TestKey::generate("/org");
    let site = TestKey::generate("/org/site");
    let evil = TestKey::generate("/org/evil");
    let evil_cert = issue_certificate(&evil, &root, current_validity());
    let retriever = Arc::new(FixedRetriever::new(evil_cert.clone()));

    let validator = Validator::new(
        Box::new(SimpleHierarchyPolicy::new()),
        NetworkFetcher::with_options(retriever.clone(), NetworkFetcherOptions::default().with_max_retries(0)),
    );
    validator.load_anchor(self_signed(&root));

    // claims the /org/site key, signed with the /org/evil key
    let info = SignatureInfo::new(evil.signature_type()).with_key_locator(site.key_name().clone());
    let data = sign_data(
        Data::new(Name::from_uri("/org/site/temp").unwrap()).with_content(&b"reading"[..]),
        &evil,
        info,
    );

    let mut state = ValidationState::for_data(data);
    let (code, info) = error_info(block_on(validator.validate(&mut state)));
    assert_eq!(code, ValidationErrorCode::CannotRetrieveCert);
    assert_eq!(
        info,
        format!(
            "Retrieved certificate `{}` does not match requested key `{}`",
            evil_cert.name(),
            site.key_name()
        )
    );
    assert!(state.chain().is_empty());
    assert!(validator.unverified_cache().is_empty());
    assert_eq!(retriever.requests(), vec![site.key_name().clone()]);
}
