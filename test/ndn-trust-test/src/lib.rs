// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Helpers shared by the end-to-end validation suites.

#![forbid(unsafe_code)]

pub mod common;
