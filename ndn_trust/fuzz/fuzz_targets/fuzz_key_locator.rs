// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

#![no_main]

use libfuzzer_sys::fuzz_target;

use ndn_trust::validation::key_locator::{
    extract_identity_from_key_locator, has_key_component, signature_info_of_interest,
};
use ndn_trust::validation::ValidationState;
use ndn_trust::{Interest, Name};

fuzz_target!(|wire: &[u8]| {
    let Ok(name) = Name::from_wire(wire) else {
        return;
    };

    // extraction may only fail on names the screen rejects
    if has_key_component(&name) {
        assert!(extract_identity_from_key_locator(&name).is_ok());
    }

    let interest = Interest::new(name);
    let state = ValidationState::for_interest(interest.clone());
    let _ = signature_info_of_interest(&interest, &state);
});
