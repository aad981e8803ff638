// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Replay protection for signed command Interests.
//!
//! A command Interest carries the time it was signed, either as name
//! component -4 (v0.2) or as the SignatureTime of its InterestSignatureInfo
//! (v0.3). It is accepted only if that time is within the grace period of
//! the local clock and strictly later than the last command accepted from
//! the same key. The timestamp is reserved for its key when the check
//! passes, under the same lock as the comparison, so two validations of
//! one command cannot both pass it. The reservation becomes the last-seen
//! timestamp once the whole validation succeeds; a validation that fails,
//! is cancelled or is dropped gives it back and leaves no trace.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::time::Duration;
use spin::Mutex;

use super::{InnerPolicy, PacketRef, PolicyDecision, ValidationContext, ValidationPolicy};
use crate::error::{Result, ValidationError};
use crate::name::Name;
use crate::packet::{command_interest, Interest, SignedInterestFormat};
use crate::validation::key_locator::key_locator_name_of;
use crate::validation::ValidationState;

/// Tuning of [`CommandInterestPolicy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInterestOptions {
    /// Largest accepted distance between the command timestamp and now
    pub grace_period: Duration,
    /// Most signing keys tracked at once; the least recently refreshed is
    /// evicted first. Zero disables tracking.
    pub max_records: usize,
    /// How long a key is tracked after its last accepted command
    pub record_lifetime: Duration,
}

impl Default for CommandInterestOptions {
    fn default() -> Self {
        Self {
            grace_period: Duration::from_secs(120),
            max_records: 1000,
            record_lifetime: Duration::from_secs(3600),
        }
    }
}

impl CommandInterestOptions {
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }

    pub fn with_record_lifetime(mut self, record_lifetime: Duration) -> Self {
        self.record_lifetime = record_lifetime;
        self
    }
}

/// Timestamps of one signing key, in milliseconds since the Unix epoch
#[derive(Debug, Clone)]
struct Record {
    /// Last command accepted by a completed validation
    accepted: Option<u64>,
    /// Commands still being validated
    pending: Vec<u64>,
    last_refreshed: Duration,
}

impl Record {
    fn latest(&self) -> Option<u64> {
        self.pending.iter().copied().chain(self.accepted).max()
    }
}

type RecordTable = Arc<Mutex<BTreeMap<Name, Record>>>;

/// Checks command timestamps, then hands the packet to the inner policy.
///
/// Data packets and certificates go to the inner policy untouched. An inner
/// policy is required.
#[derive(Debug)]
pub struct CommandInterestPolicy {
    options: CommandInterestOptions,
    records: RecordTable,
    inner: InnerPolicy,
}

impl Default for CommandInterestPolicy {
    fn default() -> Self {
        Self::new(CommandInterestOptions::default())
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl CommandInterestPolicy {
    pub fn new(options: CommandInterestOptions) -> Self {
        Self {
            options,
            records: Arc::new(Mutex::new(BTreeMap::new())),
            inner: InnerPolicy::new(),
        }
    }

    pub fn options(&self) -> &CommandInterestOptions {
        &self.options
    }

    /// Number of signing keys currently tracked
    pub fn record_count(&self) -> usize {
        self.records.lock().len()
    }

    /// Last accepted timestamp of `key_locator`, in milliseconds
    pub fn last_timestamp(&self, key_locator: &Name) -> Option<u64> {
        self.records.lock().get(key_locator).and_then(|r| r.accepted)
    }

    fn command_timestamp(&self, interest: &Interest, state: &ValidationState) -> Result<u64> {
        let format = state
            .tag::<SignedInterestFormat>()
            .copied()
            .unwrap_or_else(|| interest.signed_format());
        let name = &interest.name;

        match format {
            SignedInterestFormat::V02 => {
                if name.len() < command_interest::MIN_SIZE {
                    return Err(ValidationError::malformed_signature(format!(
                        "Command Interest name too short `{}`",
                        name
                    ))
                    .into());
                }
                name.get(command_interest::POS_TIMESTAMP)
                    .and_then(|c| c.to_number().ok())
                    .ok_or_else(|| {
                        ValidationError::policy_rejected(format!(
                            "Command Interest `{}` doesn't include timestamp component",
                            name
                        ))
                        .into()
                    })
            }
            SignedInterestFormat::V03 => interest
                .signature_info
                .as_ref()
                .and_then(|info| info.signature_time)
                .ok_or_else(|| {
                    ValidationError::policy_rejected(format!(
                        "Signed Interest `{}` lacks required SignatureTime element",
                        name
                    ))
                    .into()
                }),
        }
    }

    fn cleanup(&self, now: Duration) {
        let lifetime = self.options.record_lifetime;
        self.records
            .lock()
            .retain(|_, record| !record.pending.is_empty() || now.saturating_sub(record.last_refreshed) < lifetime);
    }

    fn check_timestamp(
        &self,
        key_locator: Name,
        timestamp: u64,
        now: Duration,
        state: &mut ValidationState,
    ) -> Result<()> {
        self.cleanup(now);

        if timestamp.abs_diff(millis(now)) > millis(self.options.grace_period) {
            return Err(ValidationError::policy_rejected(format!(
                "Timestamp is outside the grace period for key `{}`",
                key_locator
            ))
            .into());
        }

        let max_records = self.options.max_records;
        if max_records == 0 {
            return Ok(());
        }

        {
            let mut records = self.records.lock();
            let record = records.entry(key_locator.clone()).or_insert_with(|| Record {
                accepted: None,
                pending: Vec::new(),
                last_refreshed: now,
            });
            if record.latest().is_some_and(|latest| timestamp <= latest) {
                return Err(ValidationError::policy_rejected(format!(
                    "Timestamp is reordered for key `{}`",
                    key_locator
                ))
                .into());
            }
            record.pending.push(timestamp);
        }
        log::trace!("command timestamp {} reserved for {}", timestamp, key_locator);

        let reservation = Reservation {
            records: self.records.clone(),
            key_locator,
            timestamp,
            now,
            max_records,
            committed: false,
        };
        state.add_after_success(move || reservation.commit());
        Ok(())
    }
}

/// A command timestamp claimed while its validation is in flight.
///
/// Dropped without [`commit`](Self::commit), it releases the claim.
struct Reservation {
    records: RecordTable,
    key_locator: Name,
    timestamp: u64,
    now: Duration,
    max_records: usize,
    committed: bool,
}

impl Reservation {
    fn commit(mut self) {
        self.committed = true;
        let mut records = self.records.lock();
        let record = records.entry(self.key_locator.clone()).or_insert_with(|| Record {
            accepted: None,
            pending: Vec::new(),
            last_refreshed: self.now,
        });
        record.pending.retain(|t| *t != self.timestamp);
        record.accepted = Some(record.accepted.map_or(self.timestamp, |a| a.max(self.timestamp)));
        record.last_refreshed = self.now;
        log::trace!("command timestamp {} recorded for {}", self.timestamp, self.key_locator);

        while records.len() > self.max_records {
            let oldest = records
                .iter()
                .filter(|(_, record)| record.pending.is_empty())
                .min_by_key(|(_, record)| record.last_refreshed)
                .map(|(name, _)| name.clone());
            match oldest {
                Some(name) => {
                    records.remove(&name);
                }
                None => break,
            }
        }
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        let mut records = self.records.lock();
        let unused = match records.get_mut(&self.key_locator) {
            Some(record) => {
                record.pending.retain(|t| *t != self.timestamp);
                record.accepted.is_none() && record.pending.is_empty()
            }
            None => false,
        };
        if unused {
            records.remove(&self.key_locator);
        }
        log::trace!("command timestamp {} released for {}", self.timestamp, self.key_locator);
    }
}

impl ValidationPolicy for CommandInterestPolicy {
    fn policy_name(&self) -> &'static str {
        "CommandInterestPolicy"
    }

    fn check_policy(
        &self,
        packet: PacketRef<'_>,
        state: &mut ValidationState,
        ctx: &dyn ValidationContext,
    ) -> Result<PolicyDecision> {
        if let PacketRef::Interest(interest) = packet {
            let timestamp = self.command_timestamp(interest, state)?;
            let key_locator = key_locator_name_of(packet, state)?;
            self.check_timestamp(key_locator, timestamp, ctx.now()?, state)?;
        }
        self.check_inner(packet, state, ctx)
    }

    fn inner_slot(&self) -> &InnerPolicy {
        &self.inner
    }

    fn inner_slot_mut(&mut self) -> &mut InnerPolicy {
        &mut self.inner
    }
}
