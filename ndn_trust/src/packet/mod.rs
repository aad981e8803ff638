// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Signed packet types: Data, Interest and their signature metadata.

mod data;
mod interest;
mod signature_info;

pub use data::{content_type, Data};
pub use interest::{command_interest, signed_interest, Interest, SignedInterestFormat};
pub use signature_info::{KeyLocator, SignatureInfo, SignatureType};
