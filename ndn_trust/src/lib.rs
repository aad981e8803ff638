// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! NDN Trust Validation
//!
//! A no_std-compatible validator for signed Named Data Networking packets.
//! Packets are checked against a chain of validation policies, their signing
//! certificates are resolved up to a configured trust anchor, and every link
//! is verified with a pluggable crypto backend.
//!
//! # Features
//! - Data and signed Interest packets (v0.2 and v0.3 formats)
//! - Composable validation policies (hierarchy, fixed signer, prefix rules,
//!   command Interest replay protection)
//! - Asynchronous certificate retrieval with retries and cancellation
//! - Streaming signature verification over the re-serialized signed portion
//!
//! # Example
//! ```no_run
//! use ndn_trust::prelude::*;
//!
//! # async fn example(anchor: Certificate, data: Data) -> ndn_trust::Result<()> {
//! let validator = Validator::new(Box::new(SimpleHierarchyPolicy::new()), OfflineFetcher);
//! validator.load_anchor(anchor);
//! validator.validate_data(data).await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod certificate;
pub mod crypto_backend;
pub mod error;
pub mod name;
pub mod packet;
pub mod time;
pub mod tlv;
pub mod transform;
pub mod validation;

pub use certificate::Certificate;
pub use error::{Defect, Error, Result, ValidationError, ValidationErrorCode};
pub use name::{Component, Name};
pub use packet::{Data, Interest, KeyLocator, SignatureInfo, SignatureType, SignedInterestFormat};
pub use validation::{ValidationPolicy, ValidationState, Validator, ValidatorOptions};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::validation::{
        AcceptAllPolicy, CertificateFetcher, CommandInterestPolicy, NetworkFetcher, OfflineFetcher,
        PrefixPolicy, SignedByPolicy, SimpleHierarchyPolicy, ValidationPolicy, Validator,
    };
    pub use crate::{Certificate, Data, Error, Interest, Name, Result};
}
