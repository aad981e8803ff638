// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Explicitly driven pipeline source.

use crate::error::{Defect, Result};
use crate::transform::Transform;

/// Head of a pipeline that is fed on demand.
///
/// Nothing flows when the source is built. Bytes enter only through
/// [`write`](StepSource::write) and the stream closes only through
/// [`end`](StepSource::end); after that both calls are refused.
///
/// ```
/// use ndn_trust::transform::{BufferSink, StepSource, Transform};
///
/// let mut source = StepSource::new(BufferSink::new());
/// source.write(b"signed ").unwrap();
/// source.write(b"portion").unwrap();
/// source.end().unwrap();
/// assert_eq!(source.into_inner().as_bytes(), b"signed portion");
/// ```
#[derive(Debug)]
pub struct StepSource<T: Transform> {
    next: T,
    bytes_written: usize,
    ended: bool,
}

impl<T: Transform> StepSource<T> {
    /// Attach a source in front of `next`
    pub fn new(next: T) -> Self {
        Self {
            next,
            bytes_written: 0,
            ended: false,
        }
    }

    /// Forward `buf` downstream; returns the number of bytes the next stage took
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if self.ended {
            return Err(Defect::WriteAfterEnd.into());
        }
        let n = self.next.write(buf)?;
        self.bytes_written += n;
        log::trace!("step source forwarded {} bytes ({} total)", n, self.bytes_written);
        Ok(n)
    }

    /// Close the stream and notify the next stage
    pub fn end(&mut self) -> Result<()> {
        if self.ended {
            return Err(Defect::EndAfterEnd.into());
        }
        self.ended = true;
        self.next.end()
    }

    /// Bytes accepted downstream so far
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// The next stage
    pub fn next_stage(&self) -> &T {
        &self.next
    }

    /// Detach and return the next stage
    pub fn into_inner(self) -> T {
        self.next
    }
}

impl<T: Transform> Transform for StepSource<T> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        StepSource::write(self, buf)
    }

    fn end(&mut self) -> Result<()> {
        StepSource::end(self)
    }
}
