// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Byte-stream transformation stages.
//!
//! A pipeline is a chain of [`Transform`] stages, each owning the next one:
//!
//! ```text
//! StepSource -> DigestFilter -> BufferSink
//! StepSource -> VerifierFilter
//! ```
//!
//! Data is pushed in with `write` and the stream is closed with `end`. A
//! stage must refuse `write` or `end` once it has been ended.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::{Defect, Result};

mod filters;
mod step_source;

pub use filters::{DigestFilter, VerifierFilter};
pub use step_source::StepSource;

/// One stage of a streaming pipeline
pub trait Transform {
    /// Consume `buf`, returning how many bytes were accepted
    fn write(&mut self, buf: &[u8]) -> Result<usize>;

    /// Signal end of input
    fn end(&mut self) -> Result<()>;
}

impl<T: Transform + ?Sized> Transform for &mut T {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        (**self).write(buf)
    }

    fn end(&mut self) -> Result<()> {
        (**self).end()
    }
}

impl<T: Transform + ?Sized> Transform for Box<T> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        (**self).write(buf)
    }

    fn end(&mut self) -> Result<()> {
        (**self).end()
    }
}

/// Terminal stage collecting everything written into memory
#[derive(Debug, Default, Clone)]
pub struct BufferSink {
    buf: Vec<u8>,
    ended: bool,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl Transform for BufferSink {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if self.ended {
            return Err(Defect::WriteAfterEnd.into());
        }
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn end(&mut self) -> Result<()> {
        if self.ended {
            return Err(Defect::EndAfterEnd.into());
        }
        self.ended = true;
        Ok(())
    }
}

/// Terminal stage that only counts bytes
#[derive(Debug, Default, Clone, Copy)]
pub struct CountingSink {
    count: usize,
    ended: bool,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bytes received
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl Transform for CountingSink {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if self.ended {
            return Err(Defect::WriteAfterEnd.into());
        }
        self.count += buf.len();
        Ok(buf.len())
    }

    fn end(&mut self) -> Result<()> {
        if self.ended {
            return Err(Defect::EndAfterEnd.into());
        }
        self.ended = true;
        Ok(())
    }
}
