// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Error types for packet validation
//!
//! Two classes of failure are kept apart:
//! - [`ValidationError`]: the packet (or something it points at) cannot be
//!   trusted. These come from untrusted input and are recorded on the
//!   [`ValidationState`](crate::validation::ValidationState).
//! - [`Defect`]: the library was driven incorrectly. These indicate a bug in
//!   the calling code and are never recorded as a validation outcome.

extern crate alloc;

use alloc::string::{String, ToString};
use core::fmt;

use crate::name::Name;

/// Result type alias for validation operations
pub type Result<T> = core::result::Result<T, Error>;

/// Top-level error type
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The packet failed validation
    Validation(ValidationError),

    /// The API was misused
    Defect(Defect),

    /// TLV decoding or encoding failed
    Tlv(TlvError),

    /// Cryptographic backend errors
    Crypto(CryptoError),

    /// Time conversion errors
    Time(TimeError),
}

/// Category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorCode {
    /// KeyLocator missing, of the wrong type, or not permitted here
    InvalidKeyLocator,
    /// Signature metadata cannot be parsed
    MalformedSignature,
    /// Packet carries no signature at all
    NoSignature,
    /// Certificate could not be found locally nor retrieved
    CannotRetrieveCert,
    /// Certificate chain is deeper than allowed
    ExceededDepthLimit,
    /// Certificate chain revisits a certificate
    LoopDetected,
    /// A policy refused the packet
    PolicyRejected,
    /// Certificate validity period does not cover the current time
    ExpiredOrNotYetValidCert,
    /// Cryptographic verification failed
    SignatureMismatch,
    /// Retrieved Data is not a well-formed certificate
    MalformedCert,
}

impl ValidationErrorCode {
    /// Stable upper-case identifier of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorCode::InvalidKeyLocator => "INVALID_KEY_LOCATOR",
            ValidationErrorCode::MalformedSignature => "MALFORMED_SIGNATURE",
            ValidationErrorCode::NoSignature => "NO_SIGNATURE",
            ValidationErrorCode::CannotRetrieveCert => "CANNOT_RETRIEVE_CERT",
            ValidationErrorCode::ExceededDepthLimit => "EXCEEDED_DEPTH_LIMIT",
            ValidationErrorCode::LoopDetected => "LOOP_DETECTED",
            ValidationErrorCode::PolicyRejected => "POLICY_REJECTED",
            ValidationErrorCode::ExpiredOrNotYetValidCert => "EXPIRED_OR_NOT_YET_VALID_CERT",
            ValidationErrorCode::SignatureMismatch => "SIGNATURE_MISMATCH",
            ValidationErrorCode::MalformedCert => "MALFORMED_CERT",
        }
    }
}

/// A recoverable validation failure: category plus human-readable detail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    code: ValidationErrorCode,
    info: String,
}

impl ValidationError {
    /// Create a validation error
    pub fn new<S: Into<String>>(code: ValidationErrorCode, info: S) -> Self {
        Self {
            code,
            info: info.into(),
        }
    }

    /// Failure category
    pub fn code(&self) -> ValidationErrorCode {
        self.code
    }

    /// Detail string identifying the failing link and check
    pub fn info(&self) -> &str {
        &self.info
    }
}

/// Programmer errors.
///
/// Returned when the calling code breaks an API contract. None of these can
/// be triggered by the content of an untrusted packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Defect {
    /// `set_inner_policy` was given no policy
    NullInnerPolicy,

    /// A delegating policy has no inner policy to delegate to
    MissingInnerPolicy,

    /// A validation outcome was set on a state that already had one
    OutcomeAlreadySet,

    /// A key-locator name expected to follow the key naming convention does not
    KeyLocatorNamingViolation(Name),

    /// `write` was called on a source after `end`
    WriteAfterEnd,

    /// `end` was called twice
    EndAfterEnd,
}

/// Errors from the TLV codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlvError {
    /// Input ended before the element was complete
    UnexpectedEof,

    /// A VAR-NUMBER or non-negative integer has an invalid width
    InvalidNumber,

    /// Element of type `found` where `expected` was required
    UnexpectedType { expected: u64, found: u64 },

    /// A required element is absent
    MissingElement(&'static str),

    /// Element value is out of range or inconsistent
    InvalidValue(String),

    /// Bytes remain after the outermost element
    TrailingData(usize),
}

/// Errors related to keys and signature algorithms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Public key cannot be parsed
    InvalidPublicKey(String),

    /// Signature type and key type cannot be combined
    UnsupportedAlgorithm(String),

    /// Signature does not match the signed bytes and key
    VerificationFailed,

    /// No backend has been compiled in
    NoBackend,
}

/// Errors related to timestamps
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// Timestamp text is not `YYYYMMDDThhmmss`
    InvalidFormat(String),

    /// Date or time field out of range
    OutOfRange,

    /// No clock is available on this target
    ClockUnavailable,
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(e) => write!(f, "Validation failed: {}", e),
            Error::Defect(e) => write!(f, "API misuse: {}", e),
            Error::Tlv(e) => write!(f, "TLV error: {}", e),
            Error::Crypto(e) => write!(f, "Crypto error: {}", e),
            Error::Time(e) => write!(f, "Time error: {}", e),
        }
    }
}

impl fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.info.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} ({})", self.code, self.info)
        }
    }
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Defect::NullInnerPolicy => write!(f, "Inner policy argument cannot be empty"),
            Defect::MissingInnerPolicy => write!(f, "Policy has no inner policy to delegate to"),
            Defect::OutcomeAlreadySet => write!(f, "Validation outcome has already been set"),
            Defect::KeyLocatorNamingViolation(name) => {
                write!(f, "KeyLocator `{}` does not respect the naming conventions", name)
            }
            Defect::WriteAfterEnd => write!(f, "Cannot write after the input has been closed"),
            Defect::EndAfterEnd => write!(f, "Input has already been closed"),
        }
    }
}

impl fmt::Display for TlvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TlvError::UnexpectedEof => write!(f, "Unexpected end of input"),
            TlvError::InvalidNumber => write!(f, "Invalid number encoding"),
            TlvError::UnexpectedType { expected, found } => {
                write!(f, "Expected TLV-TYPE {}, found {}", expected, found)
            }
            TlvError::MissingElement(what) => write!(f, "Missing required element: {}", what),
            TlvError::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
            TlvError::TrailingData(n) => write!(f, "{} trailing bytes after element", n),
        }
    }
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::InvalidPublicKey(msg) => write!(f, "Invalid public key: {}", msg),
            CryptoError::UnsupportedAlgorithm(msg) => write!(f, "Unsupported algorithm: {}", msg),
            CryptoError::VerificationFailed => write!(f, "Signature verification failed"),
            CryptoError::NoBackend => write!(f, "No crypto backend available"),
        }
    }
}

impl fmt::Display for TimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeError::InvalidFormat(s) => write!(f, "Invalid timestamp `{}`", s),
            TimeError::OutOfRange => write!(f, "Timestamp out of range"),
            TimeError::ClockUnavailable => write!(f, "No clock available"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ValidationError {}

#[cfg(feature = "std")]
impl std::error::Error for Defect {}

// ============================================================================
// Conversions
// ============================================================================

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Validation(err)
    }
}

impl From<Defect> for Error {
    fn from(err: Defect) -> Self {
        Error::Defect(err)
    }
}

impl From<TlvError> for Error {
    fn from(err: TlvError) -> Self {
        Error::Tlv(err)
    }
}

impl From<CryptoError> for Error {
    fn from(err: CryptoError) -> Self {
        Error::Crypto(err)
    }
}

impl From<TimeError> for Error {
    fn from(err: TimeError) -> Self {
        Error::Time(err)
    }
}

/// Convert from der crate errors (used for key parsing)
impl From<der::Error> for CryptoError {
    fn from(err: der::Error) -> Self {
        CryptoError::InvalidPublicKey(err.to_string())
    }
}

// ============================================================================
// Helper constructors
// ============================================================================

impl ValidationError {
    /// KeyLocator missing or unusable
    pub fn invalid_key_locator<S: Into<String>>(msg: S) -> Self {
        Self::new(ValidationErrorCode::InvalidKeyLocator, msg)
    }

    /// Signature metadata cannot be parsed
    pub fn malformed_signature<S: Into<String>>(msg: S) -> Self {
        Self::new(ValidationErrorCode::MalformedSignature, msg)
    }

    /// Packet is unsigned
    pub fn no_signature<S: Into<String>>(msg: S) -> Self {
        Self::new(ValidationErrorCode::NoSignature, msg)
    }

    /// Certificate not found nor retrievable
    pub fn cannot_retrieve_cert<S: Into<String>>(msg: S) -> Self {
        Self::new(ValidationErrorCode::CannotRetrieveCert, msg)
    }

    /// Refused by policy
    pub fn policy_rejected<S: Into<String>>(msg: S) -> Self {
        Self::new(ValidationErrorCode::PolicyRejected, msg)
    }

    /// Cryptographic check failed
    pub fn signature_mismatch<S: Into<String>>(msg: S) -> Self {
        Self::new(ValidationErrorCode::SignatureMismatch, msg)
    }
}

impl Error {
    /// Validation failure category, if this is a validation failure
    pub fn validation_code(&self) -> Option<ValidationErrorCode> {
        match self {
            Error::Validation(e) => Some(e.code()),
            _ => None,
        }
    }

    /// Whether this error signals a bug in the caller
    pub fn is_defect(&self) -> bool {
        matches!(self, Error::Defect(_))
    }
}

// ============================================================================
// Tests
// ============================================================================
