// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Time utilities for certificate validity checking.
//!
//! NDN certificates carry their validity period as a pair of ISO 8601
//! basic-format timestamps (`YYYYMMDDThhmmss`, UTC). Calendar arithmetic is
//! delegated to `der::DateTime`.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use bytes::BytesMut;
use core::cmp::Ordering;
use core::time::Duration;
use der::DateTime;

use crate::error::{TimeError, TlvError};
use crate::tlv::{self, types, Element};

/// A UTC timestamp with one-second resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Time(DateTime);

impl Time {
    /// Timestamp `d` after the Unix epoch
    pub fn from_unix_duration(d: Duration) -> Result<Self, TimeError> {
        DateTime::from_unix_duration(Duration::from_secs(d.as_secs()))
            .map(Time)
            .map_err(|_| TimeError::OutOfRange)
    }

    /// Timestamp `secs` seconds after the Unix epoch
    pub fn from_unix_secs(secs: u64) -> Result<Self, TimeError> {
        Self::from_unix_duration(Duration::from_secs(secs))
    }

    /// Duration since the Unix epoch
    pub fn unix_duration(&self) -> Duration {
        self.0.unix_duration()
    }

    /// Parse `YYYYMMDDThhmmss`; a trailing fractional part is accepted and dropped
    pub fn parse_iso(text: &str) -> Result<Self, TimeError> {
        let invalid = || TimeError::InvalidFormat(text.to_string());
        let main = text.split_once('.').map_or(text, |(main, _)| main);
        if main.len() != 15 || main.as_bytes()[8] != b'T' {
            return Err(invalid());
        }
        let field = |range: core::ops::Range<usize>| -> Result<u16, TimeError> {
            let s = main.get(range).ok_or_else(invalid)?;
            if !s.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            s.parse::<u16>().map_err(|_| invalid())
        };
        let year = field(0..4)?;
        let month = field(4..6)? as u8;
        let day = field(6..8)? as u8;
        let hour = field(9..11)? as u8;
        let minute = field(11..13)? as u8;
        let second = field(13..15)? as u8;
        DateTime::new(year, month, day, hour, minute, second)
            .map(Time)
            .map_err(|_| TimeError::OutOfRange)
    }

    /// Format as `YYYYMMDDThhmmss`
    pub fn to_iso(&self) -> String {
        format!(
            "{:04}{:02}{:02}T{:02}{:02}{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day(),
            self.0.hour(),
            self.0.minutes(),
            self.0.seconds()
        )
    }

    /// This time shifted forward by `d`
    pub fn checked_add(&self, d: Duration) -> Option<Time> {
        let total = self.unix_duration().checked_add(d)?;
        Time::from_unix_duration(total).ok()
    }

    /// This time shifted backward by `d`
    pub fn checked_sub(&self, d: Duration) -> Option<Time> {
        let total = self.unix_duration().checked_sub(d)?;
        Time::from_unix_duration(total).ok()
    }

    /// Absolute distance between two times
    pub fn abs_diff(&self, other: &Time) -> Duration {
        let a = self.unix_duration();
        let b = other.unix_duration();
        if a > b {
            a - b
        } else {
            b - a
        }
    }

    /// Checks if this time is before another time.
    pub fn is_before(&self, other: &Time) -> bool {
        self.unix_duration() < other.unix_duration()
    }

    /// Checks if this time is after another time.
    pub fn is_after(&self, other: &Time) -> bool {
        self.unix_duration() > other.unix_duration()
    }
}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Time {
    fn cmp(&self, other: &Self) -> Ordering {
        self.unix_duration().cmp(&other.unix_duration())
    }
}

impl core::fmt::Display for Time {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.to_iso())
    }
}

/// Certificate validity period.
///
/// ```text
/// ValidityPeriod = VALIDITY-PERIOD-TYPE TLV-LENGTH
///                    NotBefore
///                    NotAfter
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityPeriod {
    /// The time before which the certificate is not valid.
    pub not_before: Time,
    /// The time after which the certificate is not valid.
    pub not_after: Time,
}

impl ValidityPeriod {
    /// Creates a new validity period.
    pub const fn new(not_before: Time, not_after: Time) -> Self {
        ValidityPeriod {
            not_before,
            not_after,
        }
    }

    /// Checks if the certificate is valid at the given time (both ends inclusive).
    pub fn is_valid_at(&self, check_time: &Time) -> bool {
        !check_time.is_before(&self.not_before) && !check_time.is_after(&self.not_after)
    }

    /// Checks if the validity period is well-formed.
    pub fn is_well_formed(&self) -> bool {
        !self.not_after.is_before(&self.not_before)
    }

    /// Append the ValidityPeriod TLV to `buf`
    pub fn encode_into(&self, buf: &mut BytesMut) {
        let mut value = BytesMut::new();
        tlv::encode_tlv(&mut value, types::NOT_BEFORE, self.not_before.to_iso().as_bytes());
        tlv::encode_tlv(&mut value, types::NOT_AFTER, self.not_after.to_iso().as_bytes());
        tlv::encode_tlv(buf, types::VALIDITY_PERIOD, &value);
    }

    /// Decode from a ValidityPeriod element
    pub fn from_element(element: &Element<'_>) -> Result<Self, TlvError> {
        element.expect_type(types::VALIDITY_PERIOD)?;
        let mut children = element.children();
        let not_before = children
            .next_if(types::NOT_BEFORE)?
            .ok_or(TlvError::MissingElement("NotBefore"))?;
        let not_after = children
            .next_if(types::NOT_AFTER)?
            .ok_or(TlvError::MissingElement("NotAfter"))?;
        Ok(Self {
            not_before: parse_time_value(not_before.value)?,
            not_after: parse_time_value(not_after.value)?,
        })
    }
}

fn parse_time_value(value: &[u8]) -> Result<Time, TlvError> {
    let text = core::str::from_utf8(value)
        .map_err(|_| TlvError::InvalidValue("timestamp is not ASCII".to_string()))?;
    Time::parse_iso(text).map_err(|e| TlvError::InvalidValue(e.to_string()))
}

/// Time elapsed since the Unix epoch, read from the system clock
pub fn unix_now() -> Result<Duration, TimeError> {
    #[cfg(feature = "std")]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|_| TimeError::OutOfRange)
    }

    #[cfg(not(feature = "std"))]
    {
        Err(TimeError::ClockUnavailable)
    }
}

/// Gets the current time.
pub fn current_time() -> Result<Time, TimeError> {
    Time::from_unix_duration(unix_now()?)
}
