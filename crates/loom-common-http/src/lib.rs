// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for Loom.
//!
//! Every outbound client carries the same User-Agent so upstream services
//! (flag providers included) can identify Loom traffic.

mod client;

pub use client::new_client;
