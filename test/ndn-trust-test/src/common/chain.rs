// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Certificate issuing and packet signing.

use std::time::Duration;

use ndn_trust::certificate::construct_certificate_name;
use ndn_trust::packet::{command_interest, content_type, SignatureInfo};
use ndn_trust::time::{current_time, Time, ValidityPeriod};
use ndn_trust::tlv::{make_tlv, types};
use ndn_trust::{Certificate, Component, Data, Interest, Name};

use super::keys::TestKey;

const DAY: Duration = Duration::from_secs(86_400);

/// From yesterday to a year from now
pub fn current_validity() -> ValidityPeriod {
    let now = current_time().expect("system clock");
    ValidityPeriod::new(
        now.checked_sub(DAY).expect("validity start"),
        now.checked_add(DAY * 365).expect("validity end"),
    )
}

/// A period that ended a day ago
pub fn expired_validity() -> ValidityPeriod {
    let now = current_time().expect("system clock");
    ValidityPeriod::new(
        now.checked_sub(DAY * 30).expect("validity start"),
        now.checked_sub(DAY).expect("validity end"),
    )
}

/// Fixed period covering the whole century
pub fn wide_validity() -> ValidityPeriod {
    ValidityPeriod::new(
        Time::parse_iso("20000101T000000").expect("time"),
        Time::parse_iso("20991231T235959").expect("time"),
    )
}

/// Certificate for `subject` signed by `issuer`
pub fn issue_certificate(subject: &TestKey, issuer: &TestKey, validity: ValidityPeriod) -> Certificate {
    let issuer_id = if subject.key_name() == issuer.key_name() {
        "self"
    } else {
        "issuer"
    };
    let name = construct_certificate_name(subject.key_name(), Component::generic(issuer_id.as_bytes()), 1);
    let info = SignatureInfo::new(issuer.signature_type())
        .with_key_locator(issuer.key_name().clone())
        .with_validity_period(validity);
    let data = Data::new(name)
        .with_content_type(content_type::KEY)
        .with_freshness_period(3_600_000)
        .with_content(subject.public_key_spki());
    Certificate::from_data(sign_data(data, issuer, info)).expect("well-formed certificate")
}

/// Self-signed certificate of `key`, usable as a trust anchor
pub fn self_signed(key: &TestKey) -> Certificate {
    issue_certificate(key, key, wide_validity())
}

/// Sign `data` with `signer` using `info` as SignatureInfo
pub fn sign_data(data: Data, signer: &TestKey, info: SignatureInfo) -> Data {
    let data = data.with_signature_info(info);
    let signed = data.signed_portion().expect("signed portion");
    let signature = signer.sign(&signed);
    data.with_signature_value(signature)
}

/// Data named `name` signed by `signer` with a KeyLocator of its key name
pub fn signed_data(name: &str, signer: &TestKey) -> Data {
    let data = Data::new(Name::from_uri(name).expect("data URI")).with_content(&b"payload"[..]);
    let info = SignatureInfo::new(signer.signature_type()).with_key_locator(signer.key_name().clone());
    sign_data(data, signer, info)
}

/// Current Unix time in milliseconds
pub fn now_millis() -> u64 {
    current_time().expect("system clock").unix_duration().as_millis() as u64
}

/// v0.3 signed Interest carrying `signature_time`
pub fn signed_interest_v03(name: &str, signer: &TestKey, signature_time: u64) -> Interest {
    let info = SignatureInfo::new(signer.signature_type())
        .with_key_locator(signer.key_name().clone())
        .with_signature_time(signature_time);
    let interest = Interest::new(Name::from_uri(name).expect("interest URI"))
        .with_app_parameters(&b"args"[..])
        .with_signature_info(info);
    let signed = interest.signed_portion().expect("signed portion");
    let signature = signer.sign(&signed);
    interest.with_signature_value(signature)
}

/// v0.2 command Interest `/<name>/<timestamp>/<random>/<SignatureInfo>/<SignatureValue>`
pub fn command_interest_v02(name: &str, signer: &TestKey, timestamp: u64) -> Interest {
    let info = SignatureInfo::new(signer.signature_type()).with_key_locator(signer.key_name().clone());
    let unsigned = Name::from_uri(name)
        .expect("interest URI")
        .append_number(timestamp)
        .append_number(0x5eed)
        .append(Component::generic(info.to_data_wire()));
    assert!(unsigned.len() + 1 >= command_interest::MIN_SIZE);

    let signed: Vec<u8> = unsigned.iter().flat_map(|c| c.to_wire()).collect();
    let signature = signer.sign(&signed);
    let name = unsigned.append(Component::generic(make_tlv(types::SIGNATURE_VALUE, &signature)));
    Interest::new(name)
}
