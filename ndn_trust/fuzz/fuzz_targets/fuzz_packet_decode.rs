// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

#![no_main]

use libfuzzer_sys::fuzz_target;

use ndn_trust::packet::{Data, Interest, SignatureInfo};
use ndn_trust::Certificate;

fuzz_target!(|wire: &[u8]| {
    // Exercise every decoder reachable from untrusted packets
    if let Ok(data) = Data::from_wire(wire) {
        let _ = data.signed_portion();
        let _ = Certificate::from_data(data);
    }

    if let Ok(interest) = Interest::from_wire(wire) {
        let _ = interest.signed_portion();
        let _ = interest.signature_info_v02();
        let _ = interest.signature_value_v02();
    }

    let _ = SignatureInfo::from_wire(wire);
    let _ = Certificate::from_wire(wire);
});
